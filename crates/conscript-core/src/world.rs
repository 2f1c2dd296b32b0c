//! The data store a [`crate::interpreter::ScriptReader`] mutates: template,
//! geometry, and networkable-info registries, placed object instances, the
//! per-kind "active" selectors command dispatch targets, and the variable
//! and constant substitution tables.

use std::collections::HashMap;

use crate::dispatch::parse_i32;
use crate::error::ScriptError;
use crate::model::{
    game_config, geometry_template, networkable_info, object_template, GameConfig,
    GeometryTemplate, GeometryTemplateId, NetworkableInfo, NetworkableInfoId, ObjectInstance,
    ObjectInstanceId, ObjectTemplate, ObjectTemplateId,
};
use crate::refs::Ref;
use crate::registry::Registry;

#[derive(Debug, Default)]
pub struct WorldData {
    pub templates: Registry<ObjectTemplate>,
    pub geometries: Registry<GeometryTemplate>,
    pub infos: Registry<NetworkableInfo>,
    pub objects: Vec<ObjectInstance>,
    pub static_objects: Vec<ObjectInstanceId>,

    pub active_template: Option<ObjectTemplateId>,
    pub active_geometry: Option<GeometryTemplateId>,
    pub active_info: Option<NetworkableInfoId>,
    pub active_object: Option<ObjectInstanceId>,

    pub texture_alternative_paths: Vec<String>,
    pub console_world_size: i32,
    pub game: GameConfig,

    pub variables: HashMap<String, String>,
    pub constants: HashMap<String, String>,

    next_instance_id: u32,
}

impl std::fmt::Debug for Registry<ObjectTemplate> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Registry<ObjectTemplate>(len={})", self.len())
    }
}
impl std::fmt::Debug for Registry<GeometryTemplate> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Registry<GeometryTemplate>(len={})", self.len())
    }
}
impl std::fmt::Debug for Registry<NetworkableInfo> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Registry<NetworkableInfo>(len={})", self.len())
    }
}

impl WorldData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `constants.txt`'s `name value` lines into the constant table.
    /// Filesystem access to locate that file is the caller's concern — see
    /// `conscript-content`'s loader.
    pub fn load_constants_text(&mut self, text: &str) {
        for line in text.lines() {
            let mut parts = line.split_whitespace();
            let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
                continue;
            };
            self.constants.insert(name.to_string(), value.to_string());
        }
    }

    // -- object templates ---------------------------------------------

    pub fn create_object_template(&mut self, kind: &str, name: &str) -> Option<ObjectTemplateId> {
        let id = self
            .templates
            .create_if_absent(name, |id| ObjectTemplate::new(ObjectTemplateId::from(id), kind, name))?;
        let id = ObjectTemplateId::from(id);
        self.active_template = Some(id);
        Some(id)
    }

    pub fn set_active_object_template(&mut self, name: &str) -> bool {
        match self.templates.id_by_name(name) {
            Some(id) => {
                self.active_template = Some(id.into());
                true
            }
            None => false,
        }
    }

    pub fn dispatch_object_template(
        &mut self,
        method: &str,
        args: &[String],
    ) -> Option<Result<Option<String>, ScriptError>> {
        let id = self.active_template?;
        let template = self.templates.get_mut(id.into())?;
        object_template::method_table().call(template, method, args)
    }

    // -- geometry templates ---------------------------------------------

    pub fn create_geometry_template(&mut self, kind: &str, name: &str) -> Option<GeometryTemplateId> {
        let id = self
            .geometries
            .create_if_absent(name, |id| GeometryTemplate::new(GeometryTemplateId::from(id), kind, name))?;
        let id = GeometryTemplateId::from(id);
        self.active_geometry = Some(id);
        Some(id)
    }

    pub fn set_active_geometry_template(&mut self, name: &str) -> bool {
        match self.geometries.id_by_name(name) {
            Some(id) => {
                self.active_geometry = Some(id.into());
                true
            }
            None => false,
        }
    }

    pub fn dispatch_geometry_template(
        &mut self,
        method: &str,
        args: &[String],
    ) -> Option<Result<Option<String>, ScriptError>> {
        let id = self.active_geometry?;
        let geometry = self.geometries.get_mut(id.into())?;
        geometry_template::method_table().call(geometry, method, args)
    }

    // -- networkable info ---------------------------------------------

    pub fn create_networkable_info(&mut self, kind: &str, name: &str) -> Option<NetworkableInfoId> {
        let id = self
            .infos
            .create_if_absent(name, |id| NetworkableInfo::new(NetworkableInfoId::from(id), kind, name))?;
        let id = NetworkableInfoId::from(id);
        self.active_info = Some(id);
        Some(id)
    }

    pub fn set_active_networkable_info(&mut self, name: &str) -> bool {
        match self.infos.id_by_name(name) {
            Some(id) => {
                self.active_info = Some(id.into());
                true
            }
            None => false,
        }
    }

    pub fn dispatch_networkable_info(
        &mut self,
        method: &str,
        args: &[String],
    ) -> Option<Result<Option<String>, ScriptError>> {
        let id = self.active_info?;
        let info = self.infos.get_mut(id.into())?;
        networkable_info::method_table().call(info, method, args)
    }

    // -- object instances ---------------------------------------------

    /// Repoints the next-id counter past every instance already in
    /// `self.objects` — needed after reconstructing instances directly
    /// (bypassing `create_object_instance`, e.g. `conscript-save`'s
    /// loader) so a later `create_object_instance` doesn't reissue an id
    /// already in use.
    pub fn resync_instance_id_counter(&mut self) {
        self.next_instance_id = self.objects.len() as u32;
    }

    pub fn create_object_instance(&mut self, template_name: &str, as_static: bool) -> ObjectInstanceId {
        let id = ObjectInstanceId(self.next_instance_id);
        self.next_instance_id += 1;
        self.objects.push(ObjectInstance::new(id, template_name));
        if as_static {
            self.static_objects.push(id);
        }
        self.active_object = Some(id);
        id
    }

    pub fn set_active_object(&mut self, name: &str) -> bool {
        match self.get_object(name) {
            Some(obj) => {
                self.active_object = Some(obj.id);
                true
            }
            None => false,
        }
    }

    /// `getObject` in the reference source returns the wrong local variable
    /// and is unreachable; this is the obvious intended semantics instead —
    /// a case-insensitive linear scan, since instance names need not be
    /// unique the way template/geometry/info names are.
    pub fn get_object(&self, name: &str) -> Option<&ObjectInstance> {
        self.objects
            .iter()
            .find(|o| o.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    pub fn dispatch_object_instance(
        &mut self,
        property: &str,
        args: &[String],
    ) -> Option<Result<Option<String>, ScriptError>> {
        let id = self.active_object?;
        let instance = self.objects.iter_mut().find(|o| o.id == id)?;
        crate::model::object_instance::apply_property(instance, property, args)
    }

    // -- misc top-level state -------------------------------------------

    pub fn add_texture_alternative_path(&mut self, path: &str) {
        self.texture_alternative_paths.push(path.to_string());
    }

    pub fn set_console_world_size(&mut self, args: &[String]) -> Result<(), ScriptError> {
        if let Some(v) = args.first() {
            self.console_world_size = parse_i32(v)?;
        }
        Ok(())
    }

    pub fn dispatch_game(
        &mut self,
        method: &str,
        args: &[String],
    ) -> Option<Result<Option<String>, ScriptError>> {
        game_config::method_table().call(&mut self.game, method, args)
    }

    // -- linking ---------------------------------------------------------

    /// Resolves every `Ref::Unresolved` string reference it can find into a
    /// direct handle: instance templates, template children, and each
    /// template's `geometry`/`networkableInfo`. Safe to call repeatedly —
    /// already-resolved refs are left untouched and a child template only
    /// gains a `parents` edge once.
    pub fn link(&mut self) {
        for instance in &mut self.objects {
            if let Some(name) = instance.template.unresolved_name() {
                if let Some(id) = self.templates.id_by_name(name) {
                    instance.template = Ref::Resolved(id.into());
                }
            }
        }

        let mut edges: Vec<(ObjectTemplateId, ObjectTemplateId)> = Vec::new();
        let child_ids: Vec<Vec<Option<ObjectTemplateId>>> = self
            .templates
            .iter()
            .map(|template| {
                template
                    .children
                    .iter()
                    .map(|child| {
                        child
                            .template
                            .unresolved_name()
                            .and_then(|name| self.templates.id_by_name(name))
                            .map(Into::into)
                    })
                    .collect()
            })
            .collect();
        for (template, resolved_children) in self.templates.iter_mut().zip(child_ids) {
            if let Some(name) = template.geometry.unresolved_name() {
                if let Some(id) = self.geometries.id_by_name(name) {
                    template.geometry = Ref::Resolved(id.into());
                }
            }
            if let Some(Some(name)) = template.networkable_info.as_ref().map(Ref::unresolved_name) {
                if let Some(id) = self.infos.id_by_name(name) {
                    template.networkable_info = Some(Ref::Resolved(id.into()));
                }
            }
            for (child, resolved) in template.children.iter_mut().zip(resolved_children) {
                if let Some(child_id) = resolved {
                    child.template = Ref::Resolved(child_id.into());
                    edges.push((template.id, child_id));
                }
            }
        }

        for (parent, child) in edges {
            if let Some(child_template) = self.templates.get_mut(child.into()) {
                if !child_template.parents.contains(&parent) {
                    child_template.parents.push(parent);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_creation_is_idempotent_on_name() {
        let mut world = WorldData::new();
        let first = world.create_object_template("SimpleObject", "tree");
        let second = world.create_object_template("SimpleObject", "Tree");
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(world.templates.len(), 1);
    }

    #[test]
    fn linking_resolves_geometry_and_children() {
        let mut world = WorldData::new();
        world.create_geometry_template("StandardMesh", "m_tree");
        world
            .dispatch_geometry_template("file", &["trees/oak.sm".to_string()])
            .unwrap()
            .unwrap();
        world.create_object_template("SimpleObject", "tree");
        world
            .dispatch_object_template("geometry", &["m_tree".to_string()])
            .unwrap()
            .unwrap();
        world.create_object_template("SimpleObject", "forest");
        world
            .dispatch_object_template("addTemplate", &["tree".to_string()])
            .unwrap()
            .unwrap();

        world.link();

        let tree_id = world.templates.id_by_name("tree").unwrap();
        let tree = world.templates.get(tree_id).unwrap();
        assert!(tree.geometry.is_linked());

        let forest_id = world.templates.id_by_name("forest").unwrap();
        let forest = world.templates.get(forest_id).unwrap();
        assert!(forest.children[0].template.is_linked());
        assert_eq!(tree.parents, vec![forest_id.into()]);
    }

    #[test]
    fn linking_is_idempotent() {
        let mut world = WorldData::new();
        world.create_geometry_template("StandardMesh", "m_tree");
        world.create_object_template("SimpleObject", "tree");
        world
            .dispatch_object_template("geometry", &["m_tree".to_string()])
            .unwrap()
            .unwrap();
        world.create_object_template("SimpleObject", "forest");
        world
            .dispatch_object_template("addTemplate", &["tree".to_string()])
            .unwrap()
            .unwrap();

        world.link();
        world.link();

        let tree_id = world.templates.id_by_name("tree").unwrap();
        let tree = world.templates.get(tree_id).unwrap();
        assert_eq!(tree.parents.len(), 1);
    }

    #[test]
    fn get_object_is_case_insensitive_linear_scan() {
        let mut world = WorldData::new();
        let id = world.create_object_instance("tank", false);
        world
            .dispatch_object_instance("name", &["Alpha".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(world.get_object("ALPHA").map(|o| o.id), Some(id));
    }

    #[test]
    fn static_objects_preserve_insertion_order() {
        let mut world = WorldData::new();
        let a = world.create_object_instance("tank", true);
        let b = world.create_object_instance("jeep", true);
        assert_eq!(world.static_objects, vec![a, b]);
        assert_eq!(world.objects.iter().map(|o| o.id).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn constants_file_parses_whitespace_separated_pairs() {
        let mut world = WorldData::new();
        world.load_constants_text("c_maxPlayers 64\nc_gravity -9.8\n");
        assert_eq!(world.constants.get("c_maxPlayers").map(String::as_str), Some("64"));
        assert_eq!(world.constants.get("c_gravity").map(String::as_str), Some("-9.8"));
    }
}
