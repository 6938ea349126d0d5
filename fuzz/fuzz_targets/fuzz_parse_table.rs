//! Fuzz target for the marker table reader

#![no_main]

use ferro_liftover::liftover::{translate, ChromStyle};
use ferro_liftover::marker::MarkerReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(dataset) = MarkerReader::default().parse(data, "fuzz.tsv") {
        let _ = translate(&dataset, ChromStyle::Ucsc);
    }
});
