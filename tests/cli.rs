//! End-to-end runs of the `vocab-tsne` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vocab-tsne"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn run(args: &[&Path]) -> Output {
    bin().args(args).output().expect("failed to launch vocab-tsne")
}

fn write_vocab(dir: &Path, rows: &[[f64; 4]]) -> PathBuf {
    let mut text = format!("{} 4 real\n", rows.len());
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    let path = dir.join("vocab.txt");
    fs::write(&path, text).unwrap();
    path
}

fn five_rows() -> Vec<[f64; 4]> {
    vec![
        [0.1, 0.2, 0.3, 0.4],
        [0.2, 0.1, 0.4, 0.3],
        [5.0, 5.1, 4.9, 5.2],
        [5.2, 4.8, 5.1, 5.0],
        [-3.0, 2.5, 0.0, 1.0],
    ]
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn annotated_five_points_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = write_vocab(dir.path(), &five_rows());
    let labels = dir.path().join("labels.txt");
    fs::write(&labels, "the\nof\ncat\ndog\nrun\n").unwrap();
    let output = dir.path().join("out.png");

    let out = run(&[vocab.as_path(), labels.as_path(), output.as_path(), Path::new("5")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let bytes = fs::read(&output).unwrap();
    assert!(!bytes.is_empty());
    assert_eq!(&bytes[..4], b"\x89PNG");
    assert_eq!(fs::read_to_string(&labels).unwrap(), "the\nof\ncat\ndog\nrun\n");
}

#[test]
fn plain_form_takes_three_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = write_vocab(dir.path(), &five_rows());
    let output = dir.path().join("plain.png");

    let out = run(&[vocab.as_path(), output.as_path(), Path::new("4")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(fs::metadata(&output).unwrap().len() > 0);
}

#[test]
fn two_arguments_print_usage_and_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = write_vocab(dir.path(), &five_rows());
    let output = dir.path().join("out.png");

    let out = run(&[vocab.as_path(), output.as_path()]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Usage"), "stderr: {}", stderr(&out));
    assert!(!output.exists());
}

#[test]
fn non_numeric_point_count_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = write_vocab(dir.path(), &five_rows());
    let output = dir.path().join("out.png");

    let out = run(&[vocab.as_path(), output.as_path(), Path::new("lots")]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("lots"));
    assert!(!output.exists());
}

#[test]
fn short_label_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = write_vocab(dir.path(), &five_rows());
    let labels = dir.path().join("labels.txt");
    fs::write(&labels, "the\nof\n").unwrap();
    let output = dir.path().join("out.png");

    let out = run(&[vocab.as_path(), labels.as_path(), output.as_path(), Path::new("5")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("only 2 labels"), "stderr: {}", stderr(&out));
    assert!(!output.exists());
}

#[test]
fn malformed_matrix_names_line() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = dir.path().join("vocab.txt");
    fs::write(&vocab, "2 4 real\n1 2 3 4\n1 2 x 4\n").unwrap();
    let output = dir.path().join("out.png");

    let out = run(&[vocab.as_path(), output.as_path(), Path::new("2")]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains(":3:") && err.contains("'x'"), "stderr: {err}");
    assert!(!output.exists());
}

#[test]
fn strict_flag_rejects_oversized_point_count() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = write_vocab(dir.path(), &five_rows());
    let output = dir.path().join("out.png");

    let out = bin()
        .args([vocab.as_os_str(), output.as_os_str()])
        .args(["50", "--strict"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("only has 5 rows"), "stderr: {}", stderr(&out));

    let out = run(&[vocab.as_path(), output.as_path(), Path::new("50")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(output.exists());
}

#[test]
fn generated_sample_plots_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = dir.path().join("vocab.txt");
    let labels = dir.path().join("labels.txt");
    let out = Command::new(env!("CARGO_BIN_EXE_generate_sample"))
        .args([vocab.as_os_str(), labels.as_os_str()])
        .args(["--seed", "7"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let header = fs::read_to_string(&vocab).unwrap();
    assert!(header.starts_with("48 50 real\n"));
    assert_eq!(fs::read_to_string(&labels).unwrap().lines().count(), 48);

    let output = dir.path().join("sample.png");
    let out = run(&[vocab.as_path(), labels.as_path(), output.as_path(), Path::new("12")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(output.exists());
}
