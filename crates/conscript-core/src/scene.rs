//! Recursive LOD-aware traversal of a linked [`ObjectTemplate`] tree,
//! accumulating position/rotation transforms down to each leaf geometry.

use crate::model::{GeometryTemplateId, ObjectTemplateId};
use crate::vec3::Vec3;
use crate::world::WorldData;

/// One leaf geometry reached by the walk, with its fully accumulated
/// world-space transform.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryEmission {
    pub geometry: GeometryTemplateId,
    pub file: String,
    pub kind: String,
    pub position: Vec3,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneWalk {
    pub close: Vec<GeometryEmission>,
    pub far: Vec<GeometryEmission>,
}

/// Walks `root` (must already be linked — see [`WorldData::link`]) and
/// returns the close- and far-LOD geometry emissions it reaches.
pub fn walk(world: &WorldData, root: ObjectTemplateId) -> SceneWalk {
    let mut walk = SceneWalk::default();
    walk_into(world, root, Vec3::ZERO, Vec3::ZERO, false, &mut walk);
    walk
}

fn walk_into(
    world: &WorldData,
    template_id: ObjectTemplateId,
    position: Vec3,
    rotation: Vec3,
    far_lod: bool,
    out: &mut SceneWalk,
) {
    let Some(template) = world.templates.get(template_id.into()) else {
        return;
    };

    if let Some(geometry_id) = template.geometry.resolved() {
        if let Some(geometry) = world.geometries.get(geometry_id.into()) {
            if let Some(file) = geometry.file.as_ref().filter(|f| !f.is_empty()) {
                let emission = GeometryEmission {
                    geometry: geometry_id,
                    file: file.clone(),
                    kind: geometry.kind.clone(),
                    position,
                    rotation,
                };
                if far_lod { out.far.push(emission) } else { out.close.push(emission) }
            }
        }
    }

    let is_lod_object = template.kind.eq_ignore_ascii_case("lodObject");
    if is_lod_object && !(2..=3).contains(&template.children.len()) {
        eprintln!(
            "lodObject '{}' has {} children, expected 2 or 3",
            template.name,
            template.children.len()
        );
    }

    for (index, child) in template.children.iter().enumerate() {
        let Some(child_id) = child.template.resolved() else {
            continue;
        };
        let mut child_far_lod = far_lod;
        if is_lod_object {
            if index == 1 {
                child_far_lod = true;
            }
            if index == 2 {
                break;
            }
        }
        let child_position = position.add(child.set_position.rotate(rotation));
        // Componentwise, not quaternion/matrix composition — matches the
        // dialect's own accumulation and can drift at large nested angles.
        let child_rotation = rotation.add(child.set_rotation);
        walk_into(world, child_id, child_position, child_rotation, child_far_lod, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_geometry(world: &mut WorldData, kind: &str, name: &str, file: &str) {
        world.create_geometry_template(kind, name);
        world.dispatch_geometry_template("file", &[file.to_string()]).unwrap().unwrap();
    }

    #[test]
    fn lod_object_routes_children_to_close_far_and_skips_destroyed() {
        let mut world = WorldData::new();
        link_geometry(&mut world, "bundledMesh", "m_close", "close.sm");
        link_geometry(&mut world, "bundledMesh", "m_far", "far.sm");
        link_geometry(&mut world, "bundledMesh", "m_destroyed", "destroyed.sm");

        world.create_object_template("SimpleObject", "close");
        world.dispatch_object_template("geometry", &["m_close".to_string()]).unwrap().unwrap();
        world.create_object_template("SimpleObject", "far");
        world.dispatch_object_template("geometry", &["m_far".to_string()]).unwrap().unwrap();
        world.create_object_template("SimpleObject", "destroyed");
        world.dispatch_object_template("geometry", &["m_destroyed".to_string()]).unwrap().unwrap();

        world.create_object_template("lodObject", "tree_lod");
        for name in ["close", "far", "destroyed"] {
            world.dispatch_object_template("addTemplate", &[name.to_string()]).unwrap().unwrap();
        }

        world.link();

        let root = world.templates.id_by_name("tree_lod").unwrap();
        let result = walk(&world, root.into());
        assert_eq!(result.close.len(), 1);
        assert_eq!(result.far.len(), 1);
        assert_eq!(result.close[0].file, "close.sm");
        assert_eq!(result.far[0].file, "far.sm");
    }

    #[test]
    fn child_transforms_accumulate_through_rotation() {
        // root --(rotation 90 about yaw)--> mid --(offset 1/0/0)--> leaf
        // the leaf's local offset is rotated by the accumulated rotation
        // it inherits from `mid`, the same way Vec3::rotate's own test
        // rotates (1,0,0) by a 90 degree yaw into (0,0,-1).
        let mut world = WorldData::new();
        link_geometry(&mut world, "bundledMesh", "m_leaf", "leaf.sm");
        world.create_object_template("SimpleObject", "leaf");
        world.dispatch_object_template("geometry", &["m_leaf".to_string()]).unwrap().unwrap();

        world.create_object_template("SimpleObject", "mid");
        world.dispatch_object_template("addTemplate", &["leaf".to_string()]).unwrap().unwrap();
        world.dispatch_object_template("position", &["1/0/0".to_string()]).unwrap().unwrap();

        world.create_object_template("SimpleObject", "root");
        world.dispatch_object_template("addTemplate", &["mid".to_string()]).unwrap().unwrap();
        world.dispatch_object_template("rotation", &["90/0/0".to_string()]).unwrap().unwrap();

        world.link();

        let root = world.templates.id_by_name("root").unwrap();
        let result = walk(&world, root.into());
        assert_eq!(result.close.len(), 1);
        let emission = &result.close[0];
        assert!((emission.position.x - 0.0).abs() < 1e-9);
        assert!((emission.position.z - (-1.0)).abs() < 1e-9);
        assert_eq!(emission.rotation, Vec3::new(90.0, 0.0, 0.0));
    }

    #[test]
    fn missing_geometry_file_produces_no_emission() {
        let mut world = WorldData::new();
        world.create_object_template("SimpleObject", "empty");
        world.link();
        let root = world.templates.id_by_name("empty").unwrap();
        let result = walk(&world, root.into());
        assert!(result.close.is_empty() && result.far.is_empty());
    }
}
