//! The textual static-object writer: the inverse of `StaticObjects.con`,
//! emitting one block per instance in the format the dialect itself reads.

use conscript_core::model::ObjectTemplateId;
use conscript_core::{scene, Ref, WorldData};

/// Emits one `object.create` / `object.absolutePosition` / `object.rotation`
/// block per id in `ids`, blank-line separated, in the order given.
/// `object.geometry.scale 1` is appended to a block only when the
/// instance's template reaches a close-LOD `treeMesh` geometry in the scene
/// walk — the one piece of writer logic this dialect leans on to compensate
/// for trees authored at the wrong base scale.
pub fn write_static_objects(world: &WorldData, ids: &[conscript_core::model::ObjectInstanceId]) -> String {
    let mut out = String::new();
    for id in ids {
        let Some(instance) = world.objects.iter().find(|o| o.id == *id) else {
            continue;
        };
        let template_name = resolve_template_name(world, &instance.template);
        out.push_str(&format!("object.create {template_name}\n"));
        out.push_str(&format!(
            "object.absolutePosition {}\n",
            instance.absolute_position.to_canonical_string()
        ));
        out.push_str(&format!("object.rotation {}\n", instance.rotation.to_canonical_string()));
        if has_close_tree_mesh(world, &instance.template) {
            out.push_str("object.geometry.scale 1\n");
        }
        out.push('\n');
    }
    out
}

fn resolve_template_name(world: &WorldData, template: &Ref<ObjectTemplateId>) -> String {
    match template {
        Ref::Resolved(id) => world.templates.get((*id).into()).map(|t| t.name.clone()).unwrap_or_default(),
        Ref::Unresolved(name) => name.clone(),
    }
}

fn has_close_tree_mesh(world: &WorldData, template: &Ref<ObjectTemplateId>) -> bool {
    let Ref::Resolved(id) = template else {
        return false;
    };
    scene::walk(world, *id).close.iter().any(|emission| emission.kind.eq_ignore_ascii_case("treeMesh"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use conscript_core::ScriptReader;
    use std::collections::HashMap;

    struct MapSource(HashMap<&'static str, &'static str>);
    impl conscript_core::ScriptSource for MapSource {
        fn extract_file(&self, path: &str) -> Option<String> {
            self.0.get(path).map(|s| s.to_string())
        }
    }

    #[test]
    fn writes_scale_line_only_for_tree_mesh_geometry() {
        let mut world = WorldData::new();
        let files = HashMap::from([(
            "s.con",
            "geometryTemplate.create treeMesh m_oak\n\
             geometryTemplate.file trees/oak.sm\n\
             objectTemplate.create SimpleObject oak\n\
             objectTemplate.geometry m_oak\n\
             object.create oak\n\
             object.absolutePosition 1/2/3\n",
        )]);
        let source = MapSource(files);
        ScriptReader::new(&mut world, Some(&source)).read("s.con");
        world.link();

        let id = world.objects[0].id;
        let text = write_static_objects(&world, &[id]);
        assert!(text.contains("object.create oak"));
        assert!(text.contains("object.geometry.scale 1"));
    }
}
