//! Fuzz target for parsing one YOLO label row.
//!
//! Run with:
//!   cargo +nightly fuzz run yolo_label_line_parse

#![no_main]

use detprep::ir::io_yolo::fuzz_parse_label_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = fuzz_parse_label_line(line);
    }
});
