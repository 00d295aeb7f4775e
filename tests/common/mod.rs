use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tetl::Record;

/// Write a plain-text dump, one row per line.
pub fn write_lines(path: &Path, lines: &[String]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write a zstd-compressed dump with the same rows.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// One well-formed CSV row in the canonical six-field layout.
pub fn csv_row(id: &str, author: &str, ts: &str, text: &str, lat: &str, lng: &str) -> String {
    format!("{id},{author},{ts},{text},{lat},{lng}")
}

/// Construct a record directly, for store-level tests that skip parsing.
pub fn rec(id: &str, author: &str, ts: &str, text: &str, lat: &str, lng: &str) -> Record {
    Record {
        id: id.to_string(),
        author_id: author.to_string(),
        timestamp: ts.to_string(),
        text: text.to_string(),
        geo_lat: lat.to_string(),
        geo_lng: lng.to_string(),
    }
}

/// A tiny valid dump: five posts by three authors across a two-hour window,
/// with hashtags and London-ish noisy coordinates.
pub fn basic_rows() -> Vec<String> {
    vec![
        csv_row("1", "alice", "2019-03-01 10:00:00", "good morning #rust", "51.5074N", "-0.1278W"),
        csv_row("2", "alice", "2019-03-01 10:30:00", "still hacking #rust #etl", "51.5080", "-0.1290"),
        csv_row("3", "bob", "2019-03-01 11:00:00", "lunch break", "48.8566", "2.3522"),
        csv_row("4", "carol", "2019-03-01 11:30:00", "a a b", "51.5100N", "-0.1300W"),
        csv_row("5", "bob", "2019-03-01 12:00:00", "a b c", "48.8570", "2.3530"),
    ]
}

/// Tempdir that lives for the duration of the test.
pub fn scratch_dir() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}
