//! conlint: walks a mod's `Objects` tree (and, optionally, one level's
//! bootstrap scripts), links the result, and reports every per-line
//! diagnostic plus a summary of what got created.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use conscript_content::read_all_scripts;
use conscript_core::WorldData;

#[derive(Parser)]
#[command(name = "conlint")]
#[command(about = "Lints a mod's .con script tree and reports unresolved references")]
struct Cli {
    /// Root of the mod (the directory containing `Objects/` and `Bf1942/`).
    path: PathBuf,
    /// Level directory name under `Bf1942/Levels/` to also bootstrap.
    #[arg(short, long)]
    level: Option<String>,
    /// Exit non-zero if any diagnostic was reported or any reference
    /// failed to link.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut world = WorldData::new();
    let diagnostics = read_all_scripts(&mut world, &cli.path, cli.level.as_deref(), None)?;
    world.link();

    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }

    let unresolved_templates = world.templates.iter().filter(|t| !t.geometry.is_linked() && t.geometry.unresolved_name().is_some_and(|n| !n.is_empty())).count();
    let unresolved_instances = world.objects.iter().filter(|o| !o.template.is_linked()).count();

    println!(
        "{} templates, {} geometries, {} instances ({} static)",
        world.templates.len(),
        world.geometries.len(),
        world.objects.len(),
        world.static_objects.len()
    );
    println!(
        "{} diagnostics, {} templates with an unlinked geometry, {} instances with an unlinked template",
        diagnostics.len(),
        unresolved_templates,
        unresolved_instances
    );

    if cli.strict && (!diagnostics.is_empty() || unresolved_templates > 0 || unresolved_instances > 0) {
        anyhow::bail!("lint failed under --strict");
    }

    Ok(())
}
