//! Fuzz target for VOC XML parsing.
//!
//! Anything that parses must survive a write/parse cycle unchanged.
//!
//! Run with:
//!   cargo +nightly fuzz run voc_xml_parse fuzz/corpus/voc_xml_parse/

#![no_main]

use detprep::ir::io_voc_xml::{from_voc_xml_slice, to_voc_xml_string};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4 * 1024 * 1024 {
        return;
    }

    if let Ok(document) = from_voc_xml_slice(data) {
        let xml = to_voc_xml_string(&document);
        let reparsed = from_voc_xml_slice(xml.as_bytes()).expect("reparse written VOC XML");
        assert_eq!(reparsed, document);
    }
});
