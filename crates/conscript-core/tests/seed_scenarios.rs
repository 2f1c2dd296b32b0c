use std::collections::HashMap;

use conscript_core::{Diagnostic, ScriptReader, ScriptSource, WorldData};

struct MapSource(HashMap<&'static str, &'static str>);

impl ScriptSource for MapSource {
    fn extract_file(&self, path: &str) -> Option<String> {
        self.0.get(path).map(|s| s.to_string())
    }
}

fn run(files: &[(&'static str, &'static str)], entry: &str) -> (WorldData, Vec<Diagnostic>) {
    let mut world = WorldData::new();
    let source = MapSource(files.iter().copied().collect());
    let diagnostics = {
        let mut reader = ScriptReader::new(&mut world, Some(&source));
        reader.read(entry);
        reader.into_diagnostics()
    };
    (world, diagnostics)
}

#[test]
fn s1_template_create_and_geometry_link() {
    let (mut world, diagnostics) = run(
        &[(
            "s1.con",
            "geometryTemplate.create StandardMesh m_tree\n\
             geometryTemplate.file trees/oak.sm\n\
             objectTemplate.create SimpleObject tree\n\
             objectTemplate.geometry m_tree\n",
        )],
        "s1.con",
    );
    assert!(diagnostics.is_empty());
    world.link();

    let tree_id = world.templates.id_by_name("tree").expect("tree template");
    let tree = world.templates.get(tree_id).unwrap();
    let geometry_id = tree.geometry.resolved().expect("geometry should be linked");
    let geometry = world.geometries.get(geometry_id.into()).unwrap();
    assert_eq!(geometry.file.as_deref(), Some("trees/oak.sm"));
}

#[test]
fn s2_if_elseif_else_selects_one_branch() {
    let script = "if v_arg1 == host\n\
                  console.worldSize 1024\n\
                  elseif v_arg1 == client\n\
                  console.worldSize 512\n\
                  else\n\
                  console.worldSize 256\n\
                  endif\n";

    for (arg, expected) in [("host", 1024), ("client", 512), ("other", 256)] {
        let mut world = WorldData::new();
        let source = MapSource(HashMap::from([("s2.con", script)]));
        let mut reader = ScriptReader::new(&mut world, Some(&source)).with_args(&[arg.to_string()]);
        reader.read("s2.con");
        assert_eq!(world.console_world_size, expected, "v_arg1={arg}");
    }
}

#[test]
fn s3_object_create_feeds_static_objects_pre_and_post_link() {
    let (mut world, diagnostics) = run(
        &[(
            "s3.con",
            "objectTemplate.create SimpleObject tree\n\
             object.create tree\n\
             object.absolutePosition 10/0/20\n",
        )],
        "s3.con",
    );
    assert!(diagnostics.is_empty());

    assert_eq!(world.objects.len(), 1);
    assert_eq!(world.static_objects.len(), 1);
    assert_eq!(world.static_objects[0], world.objects[0].id);
    assert_eq!(world.objects[0].template.unresolved_name(), Some("tree"));

    world.link();
    assert!(world.objects[0].template.is_linked());
}

#[test]
fn s4_lod_object_close_far_and_skips_destroyed() {
    let (mut world, diagnostics) = run(
        &[(
            "s4.con",
            "geometryTemplate.create BundledMesh m_close\n\
             geometryTemplate.file close.sm\n\
             geometryTemplate.create BundledMesh m_far\n\
             geometryTemplate.file far.sm\n\
             geometryTemplate.create BundledMesh m_destroyed\n\
             geometryTemplate.file destroyed.sm\n\
             objectTemplate.create SimpleObject close\n\
             objectTemplate.geometry m_close\n\
             objectTemplate.create SimpleObject far\n\
             objectTemplate.geometry m_far\n\
             objectTemplate.create SimpleObject destroyed\n\
             objectTemplate.geometry m_destroyed\n\
             objectTemplate.create lodObject tree_lod\n\
             objectTemplate.addTemplate close\n\
             objectTemplate.addTemplate far\n\
             objectTemplate.addTemplate destroyed\n",
        )],
        "s4.con",
    );
    assert!(diagnostics.is_empty());
    world.link();

    let root = world.templates.id_by_name("tree_lod").unwrap();
    let result = conscript_core::scene::walk(&world, root.into());
    assert_eq!(result.close.len(), 1);
    assert_eq!(result.close[0].file, "close.sm");
    assert_eq!(result.far.len(), 1);
    assert_eq!(result.far[0].file, "far.sm");
}

#[test]
fn s5_run_scopes_v_arg_to_child_script_only() {
    let (world, diagnostics) = run(
        &[("a.con", "run b.con value1\n"), ("b.con", "var v_x\nv_x = v_arg1\n")],
        "a.con",
    );
    assert!(diagnostics.is_empty());
    assert_eq!(world.variables.get("v_x").map(String::as_str), Some("value1"));
    assert!(!world.variables.contains_key("v_arg1"));
}

#[test]
fn s6_quoted_argument_with_spaces() {
    let (world, diagnostics) = run(
        &[("s6.con", "game.customGameName \"Desert Combat\"\n")],
        "s6.con",
    );
    assert!(diagnostics.is_empty());
    assert_eq!(world.game.custom_game_name, "Desert Combat");
}
