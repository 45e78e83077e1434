//! Fuzz target for whole YOLO label files.
//!
//! A successful parse never yields more rows than the input has lines.

#![no_main]

use std::path::Path;

use detprep::ir::io_yolo::from_label_str;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(rows) = from_label_str(content, Path::new("<fuzz>")) {
        assert!(rows.len() <= content.lines().count());
        assert!(rows.windows(2).all(|pair| pair[0].line < pair[1].line));
    }
});
