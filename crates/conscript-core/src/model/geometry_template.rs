use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::dispatch::{parse_f64, parse_i32, MethodTable};
use crate::error::ScriptError;
use crate::model::ids::GeometryTemplateId;
use crate::registry::Named;
use crate::vec3::Vec3;

/// A mesh/LOD descriptor referenced by one or more [`super::ObjectTemplate`]s.
/// `kind` distinguishes `treeMesh`/`bundledMesh`/`skinnedMesh`/etc, which the
/// scene-graph walker and the static-object writer both inspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryTemplate {
    pub id: GeometryTemplateId,
    pub kind: String,
    pub name: String,
    pub scale: Vec3,
    pub file: Option<String>,
    pub material_size: i32,
    pub world_size: i32,
    pub y_scale: f64,
    pub water_level: f64,
}

impl Named for GeometryTemplate {
    fn name(&self) -> &str {
        &self.name
    }
}

impl GeometryTemplate {
    pub fn new(id: GeometryTemplateId, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
            scale: Vec3::splat(1.0),
            file: None,
            material_size: 0,
            world_size: 0,
            y_scale: 1.0,
            water_level: 0.0,
        }
    }
}

/// Backslashes in a `.con`-authored file path are normalized to forward
/// slashes so downstream path handling doesn't need to special-case them.
fn normalize_path(s: &str) -> String {
    s.replace('\\', "/")
}

fn s_scale(g: &mut GeometryTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.scale = Vec3::parse(v);
    }
    Ok(Some(g.scale.to_canonical_string()))
}

fn s_file(g: &mut GeometryTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.file = Some(normalize_path(v));
    }
    Ok(g.file.clone())
}

fn s_material_size(g: &mut GeometryTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.material_size = parse_i32(v)?;
    }
    Ok(Some(g.material_size.to_string()))
}

fn s_world_size(g: &mut GeometryTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.world_size = parse_i32(v)?;
    }
    Ok(Some(g.world_size.to_string()))
}

fn s_y_scale(g: &mut GeometryTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.y_scale = parse_f64(v)?;
    }
    Ok(Some(g.y_scale.to_string()))
}

fn s_water_level(g: &mut GeometryTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.water_level = parse_f64(v)?;
    }
    Ok(Some(g.water_level.to_string()))
}

pub fn method_table() -> &'static MethodTable<GeometryTemplate> {
    static TABLE: OnceLock<MethodTable<GeometryTemplate>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = MethodTable::new();
        t.register("scale", 0, 1, s_scale);
        t.register("file", 0, 1, s_file);
        t.register("materialsize", 0, 1, s_material_size);
        t.register("worldsize", 0, 1, s_world_size);
        t.register("yscale", 0, 1, s_y_scale);
        t.register("waterlevel", 0, 1, s_water_level);
        t
    })
}
