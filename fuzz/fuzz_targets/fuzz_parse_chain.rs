//! Fuzz target for the chain parser
//!
//! Feeds arbitrary bytes as a chain file (UCSC or rule table) and maps a few
//! fixed positions through whatever loads.

#![no_main]

use ferro_liftover::coords::OneBasedPos;
use ferro_liftover::liftover::{AmbiguityPolicy, ChainFile, Liftover, OverlapPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed input must come back as an error, never a panic
    for policy in [OverlapPolicy::Ambiguous, OverlapPolicy::Reject] {
        let Ok(chain) = ChainFile::parse(data, "fuzz.chain", policy) else {
            continue;
        };

        let names: Vec<String> = chain.contig_names().map(String::from).collect();
        let liftover = Liftover::new(chain, AmbiguityPolicy::HighestScore);
        for name in &names {
            for pos in [1u64, 100, 10_000, 1_000_000] {
                if let Some(pos) = OneBasedPos::try_new(pos) {
                    let _ = liftover.lift_position(name, pos);
                }
            }
        }
    }
});
