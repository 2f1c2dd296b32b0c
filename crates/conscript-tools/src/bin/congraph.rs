//! congraph: scene-graph and save-file inspection for a linked mod.
//!
//! `walk` prints the close/far LOD geometry emissions reachable from a
//! named object template. `save` and `emit` round-trip a mod through the
//! `conscript-save` JSON envelope, the latter re-emitting the static
//! object text block the dialect itself reads back in.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conscript_core::scene;
use conscript_core::WorldData;

#[derive(Parser)]
#[command(name = "congraph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walks the scene graph rooted at a template and lists its geometry.
    Walk {
        /// Root of the mod.
        path: PathBuf,
        /// Level directory name under `Bf1942/Levels/`.
        #[arg(short, long)]
        level: Option<String>,
        /// Name of the object template to walk from.
        template: String,
    },
    /// Reads a mod and writes a `conscript-save` JSON document.
    Save {
        /// Root of the mod.
        path: PathBuf,
        #[arg(short, long)]
        level: Option<String>,
        /// Where to write the JSON envelope.
        out: PathBuf,
    },
    /// Reads a `conscript-save` JSON document and re-emits its static
    /// objects as `.con` text.
    Emit {
        /// Path to a previously saved JSON envelope.
        save: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Walk { path, level, template } => walk(&path, level.as_deref(), &template),
        Commands::Save { path, level, out } => save(&path, level.as_deref(), &out),
        Commands::Emit { save } => emit(&save),
    }
}

fn load_world(path: &std::path::Path, level: Option<&str>) -> Result<WorldData> {
    let mut world = WorldData::new();
    let diagnostics = conscript_content::read_all_scripts(&mut world, path, level, None)?;
    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }
    world.link();
    Ok(world)
}

fn walk(path: &std::path::Path, level: Option<&str>, template: &str) -> Result<()> {
    let world = load_world(path, level)?;
    let id = world
        .templates
        .id_by_name(template)
        .ok_or_else(|| anyhow::anyhow!("no template named {template}"))?;
    let result = scene::walk(&world, id.into());

    println!("close ({}):", result.close.len());
    for emission in &result.close {
        println!("  {} {} at {}", emission.kind, emission.file, emission.position.to_canonical_string());
    }
    println!("far ({}):", result.far.len());
    for emission in &result.far {
        println!("  {} {} at {}", emission.kind, emission.file, emission.position.to_canonical_string());
    }

    Ok(())
}

fn save(path: &std::path::Path, level: Option<&str>, out: &std::path::Path) -> Result<()> {
    let world = load_world(path, level)?;
    let json = conscript_save::encode_json(&world)?;
    fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
    println!("wrote {}", out.display());
    Ok(())
}

fn emit(save: &std::path::Path) -> Result<()> {
    let raw = fs::read_to_string(save).with_context(|| format!("reading {}", save.display()))?;
    let world = conscript_save::decode_world_json(&raw)?;
    let text = conscript_content::write_static_objects(&world, &world.static_objects.clone());
    print!("{text}");
    Ok(())
}
