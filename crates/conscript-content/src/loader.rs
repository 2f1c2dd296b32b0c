//! Filesystem-side conventions the interpreter itself stays agnostic to:
//! walking a mod's `Objects` tree and locating a level's three bootstrap
//! scripts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use conscript_core::{Diagnostic, ScriptReader, ScriptSource, WorldData};

/// Recursively walks `base/Objects`, reading every `*.con` file (in sorted
/// order, for deterministic diagnostics) into `world`. If `level` is given,
/// also reads that level's `Init.con`, `Conquest.con`, and
/// `StaticObjects.con` — the last with `as_static` set so every instance it
/// creates lands in `world.static_objects` too. Each of the three level
/// scripts is invoked with `v_arg1 = "host"`, per the dialect's convention
/// for server-side bootstrap. Returns every per-line diagnostic collected
/// along the way; a missing directory or file is not fatal to the walk.
pub fn read_all_scripts(
    world: &mut WorldData,
    base: &Path,
    level: Option<&str>,
    source: Option<&dyn ScriptSource>,
) -> Result<Vec<Diagnostic>> {
    let objects_dir = base.join("Objects");
    let mut con_files = Vec::new();
    collect_con_files(&objects_dir, &mut con_files)
        .with_context(|| format!("walking {}", objects_dir.display()))?;
    con_files.sort();

    let mut diagnostics = Vec::new();
    for file in &con_files {
        let mut reader = ScriptReader::new(world, source);
        reader.read(&file.to_string_lossy());
        diagnostics.extend(reader.into_diagnostics());
    }

    if let Some(level) = level {
        let level_dir = base.join("Bf1942").join("Levels").join(level);
        let host_arg = vec!["host".to_string()];
        for (name, as_static) in [("Init.con", false), ("Conquest.con", false), ("StaticObjects.con", true)] {
            let path = level_dir.join(name);
            let mut reader = ScriptReader::new(world, source).as_static(as_static).with_args(&host_arg);
            reader.read(&path.to_string_lossy());
            diagnostics.extend(reader.into_diagnostics());
        }
    }

    Ok(diagnostics)
}

fn collect_con_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_con_files(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("con")) {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nested_objects_tree_in_sorted_order() {
        let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join("minimal_mod");
        let mut world = WorldData::new();
        let diagnostics = read_all_scripts(&mut world, &base, None, None).expect("fixture should read");
        assert!(diagnostics.is_empty());
        assert!(world.templates.id_by_name("tree").is_some());
        assert!(world.geometries.id_by_name("m_tree").is_some());
    }

    #[test]
    fn reads_level_bootstrap_scripts_as_static() {
        let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join("minimal_mod");
        let mut world = WorldData::new();
        let diagnostics =
            read_all_scripts(&mut world, &base, Some("demo"), None).expect("fixture should read");
        assert!(diagnostics.is_empty());
        assert_eq!(world.static_objects.len(), 1);
        assert_eq!(world.game.map_id, "demo_map");
    }
}
