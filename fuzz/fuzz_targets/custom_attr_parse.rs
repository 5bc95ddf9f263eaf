//! Fuzz target for the Transkribus `custom` attribute parser.

#![no_main]

use libfuzzer_sys::fuzz_target;
use transkribus_iiif::page::custom::{entity_tags, parse_custom_attr, DEFAULT_ENTITY_TAGS};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(entries) = parse_custom_attr(raw) {
        let kinds: Vec<String> = DEFAULT_ENTITY_TAGS.iter().map(|s| s.to_string()).collect();
        let _ = entity_tags(&entries, &kinds);
    }
});
