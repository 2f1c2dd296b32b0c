#![no_main]

use conscript_core::{Command, ScriptReader, ScriptSource, WorldData};
use libfuzzer_sys::fuzz_target;

struct FuzzSource<'a>(&'a str);

impl ScriptSource for FuzzSource<'_> {
    fn extract_file(&self, path: &str) -> Option<String> {
        if path == "fuzz.con" { Some(self.0.to_string()) } else { None }
    }
}

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = Command::parse(input);

        let mut world = WorldData::new();
        let source = FuzzSource(input);
        let mut reader = ScriptReader::new(&mut world, Some(&source));
        reader.read("fuzz.con");
        let _ = reader.into_diagnostics();
    }
});
