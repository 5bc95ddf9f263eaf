//! Fuzz target for decoding Wikidata SPARQL responses.

#![no_main]

use libfuzzer_sys::fuzz_target;
use transkribus_iiif::resolve::wikidata::entity_from_json;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(json) = std::str::from_utf8(data) {
        let _ = entity_from_json("http://www.wikidata.org/entity/Q727", json);
    }
});
