#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// The smallest byte sequence `imagesize` accepts as a PNG: the signature
/// plus an IHDR chunk carrying the dimensions.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, png_bytes(width, height)).expect("write png file");
}

/// Write `<stem>.png` with the given size and, when `label` is set, a
/// sibling `<stem>.txt`.
pub fn write_sample(dir: &Path, stem: &str, width: u32, height: u32, label: Option<&str>) {
    write_png(&dir.join(format!("{stem}.png")), width, height);
    if let Some(label) = label {
        fs::write(dir.join(format!("{stem}.txt")), label).expect("write label file");
    }
}

pub fn write_labels(root: &Path, names: &[&str]) {
    let mut content = names.join("\n");
    content.push('\n');
    fs::write(root.join("labels.txt"), content).expect("write labels file");
}

pub fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}
