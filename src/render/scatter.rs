use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::PlotStyle;
use crate::color::{self, CALLOUT_FILL};
use crate::data::model::{Labels, Projection};
use crate::error::{Result, VizError};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const ARROW_HEAD_LEN: f64 = 8.0;
const ARROW_HEAD_HALF_WIDTH: f64 = 3.5;

fn render_err(e: impl std::fmt::Display) -> VizError {
    VizError::Render(e.to_string())
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

/// Draw the projection (and its callouts, when labels are given) into an
/// uncropped RGB image of `style.width` × `style.height`.
pub fn render(
    projection: &Projection,
    labels: Option<&Labels>,
    style: &PlotStyle,
) -> Result<RgbImage> {
    let bounds = projection
        .bounds(0.05)
        .ok_or_else(|| VizError::Render("nothing to plot".into()))?;

    let (w, h) = (style.width, style.height);
    let mut buffer = vec![0u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let font = ("sans-serif", style.font_size).into_font().color(&BLACK);
        let (reserve_x, reserve_y) = match labels {
            Some(labels) => label_reserve(&root, labels, &font, style)?,
            None => (0, 0),
        };

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .margin_left(20 + reserve_x)
            .margin_top(20 + reserve_y)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(bounds.x.0..bounds.x.1, bounds.y.0..bounds.y.1)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .draw()
            .map_err(render_err)?;

        let radius = style.marker_radius();
        let colors = color::marker_colors(projection.len(), style.color_by_rank);
        chart
            .draw_series(
                projection
                    .points()
                    .iter()
                    .zip(colors)
                    .map(|(p, c)| Circle::new((p[0], p[1]), radius, c.filled())),
            )
            .map_err(render_err)?;

        if let Some(labels) = labels {
            for (label, p) in labels.iter().zip(projection.points()) {
                let anchor = chart.backend_coord(&(p[0], p[1]));
                draw_callout(&root, label, anchor, &font, style)?;
            }
        }

        root.present().map_err(render_err)?;
    }

    RgbImage::from_raw(w, h, buffer)
        .ok_or_else(|| VizError::Render("pixel buffer does not match the canvas size".into()))
}

/// Extra room above and left of the chart so callouts of edge points stay
/// on the canvas. Capped at a third of the canvas.
fn label_reserve(
    root: &Area<'_>,
    labels: &Labels,
    font: &TextStyle,
    style: &PlotStyle,
) -> Result<(u32, u32)> {
    let mut max_w = 0u32;
    let mut max_h = 0u32;
    for label in labels.iter().filter(|l| !l.is_empty()) {
        let (tw, th) = root.estimate_text_size(label, font).map_err(render_err)?;
        max_w = max_w.max(tw);
        max_h = max_h.max(th);
    }
    if max_w == 0 {
        return Ok((0, 0));
    }
    let pad = 2 * style.callout_pad();
    let [dx, dy] = style.label_offset;
    let x = (max_w as i32 + pad - dx).max(0) as u32;
    let y = (max_h as i32 + pad + dy).max(0) as u32;
    Ok((x.min(style.width / 3), y.min(style.height / 3)))
}

// ---------------------------------------------------------------------------
// Callouts
// ---------------------------------------------------------------------------

/// Label in a translucent box, offset from the point, with a `->` arrow back
/// to the point. The offset is in pixels with y pointing up; the text's
/// bottom-right corner sits on the offset position.
fn draw_callout(
    root: &Area<'_>,
    text: &str,
    point: (i32, i32),
    font: &TextStyle,
    style: &PlotStyle,
) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let (tw, th) = root.estimate_text_size(text, font).map_err(render_err)?;
    let pad = style.callout_pad();
    let [dx, dy] = style.label_offset;

    let corner = (point.0 + dx, point.1 - dy);
    let text_pos = (corner.0 - tw as i32, corner.1 - th as i32);
    let box_tl = (text_pos.0 - pad, text_pos.1 - pad);
    let box_br = (corner.0 + pad, corner.1 + pad);

    let alpha = style.callout_alpha;
    root.draw(&Rectangle::new([box_tl, box_br], CALLOUT_FILL.mix(alpha).filled()))
        .map_err(render_err)?;
    root.draw(&Rectangle::new([box_tl, box_br], BLACK.mix(alpha).stroke_width(1)))
        .map_err(render_err)?;
    root.draw(&Text::new(text.to_string(), text_pos, font.clone()))
        .map_err(render_err)?;

    // Arrow leaves the box at the boundary point closest to the marker.
    let start = (
        point.0.clamp(box_tl.0, box_br.0),
        point.1.clamp(box_tl.1, box_br.1),
    );
    if let Some((shaft, head)) = arrow_geometry(start, point, style.marker_radius() + 1) {
        root.draw(&PathElement::new(shaft, BLACK.stroke_width(1)))
            .map_err(render_err)?;
        root.draw(&PathElement::new(head, BLACK.stroke_width(1)))
            .map_err(render_err)?;
    }
    Ok(())
}

type Polyline = Vec<(i32, i32)>;

/// Shaft and open arrowhead from `start` towards `end`, stopping `gap`
/// pixels short of `end`. `None` when the two are too close for an arrow.
fn arrow_geometry(start: (i32, i32), end: (i32, i32), gap: i32) -> Option<(Polyline, Polyline)> {
    let dx = f64::from(end.0 - start.0);
    let dy = f64::from(end.1 - start.1);
    let len = dx.hypot(dy);
    let reach = len - f64::from(gap);
    if reach < ARROW_HEAD_LEN {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let tip = (
        f64::from(start.0) + ux * reach,
        f64::from(start.1) + uy * reach,
    );
    let base = (tip.0 - ux * ARROW_HEAD_LEN, tip.1 - uy * ARROW_HEAD_LEN);
    let px = |x: f64, y: f64| (x.round() as i32, y.round() as i32);
    let tip_px = px(tip.0, tip.1);
    let left = px(base.0 - uy * ARROW_HEAD_HALF_WIDTH, base.1 + ux * ARROW_HEAD_HALF_WIDTH);
    let right = px(base.0 + uy * ARROW_HEAD_HALF_WIDTH, base.1 - ux * ARROW_HEAD_HALF_WIDTH);
    Some((vec![start, tip_px], vec![left, tip_px, right]))
}
