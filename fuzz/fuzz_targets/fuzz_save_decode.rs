#![no_main]

use conscript_save::{decode_json, decode_world_json};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = decode_json(input);
        let _ = decode_world_json(input);
    }
});
