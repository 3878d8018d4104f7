use image::{imageops, Rgb, RgbImage};

/// Smallest rectangle `(x, y, w, h)` holding every pixel that differs from
/// `background`, grown by `pad` on each side and clipped to the image.
/// `None` for a blank image.
pub fn tight_bbox(img: &RgbImage, background: Rgb<u8>, pad: u32) -> Option<(u32, u32, u32, u32)> {
    let (width, height) = img.dimensions();
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, px) in img.enumerate_pixels() {
        if *px != background {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x == u32::MAX {
        return None;
    }

    let x0 = min_x.saturating_sub(pad);
    let y0 = min_y.saturating_sub(pad);
    let x1 = max_x.saturating_add(pad).min(width - 1);
    let y1 = max_y.saturating_add(pad).min(height - 1);
    Some((x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Crop away the background border. Blank images come back unchanged.
pub fn crop_tight(img: RgbImage, background: Rgb<u8>, pad: u32) -> RgbImage {
    match tight_bbox(&img, background, pad) {
        Some((x, y, w, h)) => imageops::crop_imm(&img, x, y, w, h).to_image(),
        None => img,
    }
}
