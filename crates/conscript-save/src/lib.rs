//! Deterministic dump/load of a [`WorldData`] to a portable JSON document.
//! Links (string-or-handle [`Ref`]s) become plain array indices on the way
//! out and are restored on the way in — see [`dump`] and [`load`].

use anyhow::{anyhow, bail, Context, Result};
use conscript_core::model::{
    GeometryTemplate, GeometryTemplateId, ObjectInstance, ObjectInstanceId, ObjectTemplate,
    ObjectTemplateChild, ObjectTemplateId,
};
use conscript_core::{Ref, Vec3, WorldData};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SAVE_VERSION: u32 = 1;

/// Either a resolved array index into the sibling registry, or the
/// original name string for a reference that never linked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefDump {
    Index(u32),
    Name(String),
}

fn dump_ref<T: Copy>(r: &Ref<T>, raw: impl Fn(T) -> u32) -> RefDump {
    match r {
        Ref::Resolved(id) => RefDump::Index(raw(*id)),
        Ref::Unresolved(name) => RefDump::Name(name.clone()),
    }
}

fn load_ref<T>(dump: &RefDump, make: impl Fn(u32) -> T) -> Ref<T> {
    match dump {
        RefDump::Index(i) => Ref::Resolved(make(*i)),
        RefDump::Name(n) => Ref::Unresolved(n.clone()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDump {
    pub template: RefDump,
    pub position: [f64; 3],
    pub rotation: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDump {
    pub kind: String,
    pub name: String,
    pub geometry: RefDump,
    pub trigger_radius: i32,
    pub line_points: Vec<[f64; 3]>,
    pub children: Vec<ChildDump>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDump {
    pub kind: String,
    pub name: String,
    pub scale: [f64; 3],
    pub file: Option<String>,
    pub material_size: i32,
    pub world_size: i32,
    pub y_scale: f64,
    pub water_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceDump {
    pub template: RefDump,
    pub absolute_position: [f64; 3],
    pub rotation: [f64; 3],
    pub geometry_scale: f64,
}

/// The four-part document: templates, geometry templates, instances, and
/// which instance indices are static. Networkable-info links, the game
/// config, and variable/constant tables are session state, not world
/// content, and are deliberately outside this format's scope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldDump {
    pub templates: Vec<TemplateDump>,
    pub geometries: Vec<GeometryDump>,
    pub instances: Vec<InstanceDump>,
    pub static_indices: Vec<u32>,
}

pub fn dump(world: &WorldData) -> WorldDump {
    let templates = world
        .templates
        .iter()
        .map(|t| TemplateDump {
            kind: t.kind.clone(),
            name: t.name.clone(),
            geometry: dump_ref(&t.geometry, |id: GeometryTemplateId| id.0),
            trigger_radius: t.trigger_radius,
            line_points: t.line_points.iter().map(|v| v.to_array()).collect(),
            children: t
                .children
                .iter()
                .map(|c| ChildDump {
                    template: dump_ref(&c.template, |id: ObjectTemplateId| id.0),
                    position: c.set_position.to_array(),
                    rotation: c.set_rotation.to_array(),
                })
                .collect(),
        })
        .collect();

    let geometries = world
        .geometries
        .iter()
        .map(|g| GeometryDump {
            kind: g.kind.clone(),
            name: g.name.clone(),
            scale: g.scale.to_array(),
            file: g.file.clone(),
            material_size: g.material_size,
            world_size: g.world_size,
            y_scale: g.y_scale,
            water_level: g.water_level,
        })
        .collect();

    let instances = world
        .objects
        .iter()
        .map(|o| InstanceDump {
            template: dump_ref(&o.template, |id: ObjectTemplateId| id.0),
            absolute_position: o.absolute_position.to_array(),
            rotation: o.rotation.to_array(),
            geometry_scale: o.geometry_scale,
        })
        .collect();

    let static_indices = world
        .static_objects
        .iter()
        .filter_map(|id| world.objects.iter().position(|o| o.id == *id))
        .map(|i| i as u32)
        .collect();

    WorldDump { templates, geometries, instances, static_indices }
}

pub fn load(document: &WorldDump) -> WorldData {
    let mut world = WorldData::new();

    for t in &document.templates {
        let id = ObjectTemplateId(world.templates.len() as u32);
        let mut template = ObjectTemplate::new(id, t.kind.clone(), t.name.clone());
        template.geometry = load_ref(&t.geometry, GeometryTemplateId);
        template.trigger_radius = t.trigger_radius;
        template.line_points = t.line_points.iter().map(|a| Vec3::from_array(*a)).collect();
        template.children = t
            .children
            .iter()
            .map(|c| ObjectTemplateChild {
                template: load_ref(&c.template, ObjectTemplateId),
                set_position: Vec3::from_array(c.position),
                set_rotation: Vec3::from_array(c.rotation),
            })
            .collect();
        world.templates.push(template);
    }

    for g in &document.geometries {
        let id = GeometryTemplateId(world.geometries.len() as u32);
        let mut geometry = GeometryTemplate::new(id, g.kind.clone(), g.name.clone());
        geometry.scale = Vec3::from_array(g.scale);
        geometry.file = g.file.clone();
        geometry.material_size = g.material_size;
        geometry.world_size = g.world_size;
        geometry.y_scale = g.y_scale;
        geometry.water_level = g.water_level;
        world.geometries.push(geometry);
    }

    for i in &document.instances {
        let id = ObjectInstanceId(world.objects.len() as u32);
        let mut instance = ObjectInstance::new(id, "");
        instance.template = load_ref(&i.template, ObjectTemplateId);
        instance.absolute_position = Vec3::from_array(i.absolute_position);
        instance.rotation = Vec3::from_array(i.rotation);
        instance.geometry_scale = i.geometry_scale;
        world.objects.push(instance);
    }

    world.static_objects = document
        .static_indices
        .iter()
        .filter_map(|&index| world.objects.get(index as usize))
        .map(|o| o.id)
        .collect();
    world.resync_instance_id_counter();

    // Template parents edges and template/geometry/networkableInfo links
    // that weren't already resolved indices are rebuilt the normal way.
    world.link();
    world
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub schema: String,
    pub template_count: usize,
    pub instance_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SaveMetadata {
    fn from_dump(dump: &WorldDump) -> Self {
        Self {
            schema: "conscript-save".to_string(),
            template_count: dump.templates.len(),
            instance_count: dump.instances.len(),
            note: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub payload: Value,
    pub metadata: SaveMetadata,
}

pub trait SaveCodec {
    fn encode(&self, world: &WorldData) -> Result<String>;
    fn decode_envelope(&self, raw: &str) -> Result<SaveEnvelope>;
    fn decode_world(&self, raw: &str) -> Result<WorldData>;
    fn migrate(&self, envelope: SaveEnvelope) -> Result<SaveEnvelope>;
}

#[derive(Debug, Clone, Default)]
pub struct JsonSaveCodec;

impl SaveCodec for JsonSaveCodec {
    fn encode(&self, world: &WorldData) -> Result<String> {
        let document = dump(world);
        let envelope = SaveEnvelope {
            version: SAVE_VERSION,
            payload: serde_json::to_value(&document)?,
            metadata: SaveMetadata::from_dump(&document),
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    fn decode_envelope(&self, raw: &str) -> Result<SaveEnvelope> {
        let parsed = parse_raw_envelope(raw)?;
        self.migrate(parsed)
    }

    fn decode_world(&self, raw: &str) -> Result<WorldData> {
        let envelope = self.decode_envelope(raw)?;
        let document: WorldDump = serde_json::from_value(envelope.payload)
            .context("invalid conscript-save payload")?;
        Ok(load(&document))
    }

    fn migrate(&self, envelope: SaveEnvelope) -> Result<SaveEnvelope> {
        match envelope.version {
            SAVE_VERSION => {
                let document: WorldDump = serde_json::from_value(envelope.payload)
                    .context("invalid v1 conscript-save payload")?;
                Ok(SaveEnvelope {
                    version: SAVE_VERSION,
                    payload: serde_json::to_value(&document)?,
                    metadata: SaveMetadata::from_dump(&document),
                })
            }
            unsupported => bail!("unsupported save schema version: {unsupported}"),
        }
    }
}

pub fn encode_json(world: &WorldData) -> Result<String> {
    JsonSaveCodec.encode(world)
}

pub fn decode_json(raw: &str) -> Result<SaveEnvelope> {
    JsonSaveCodec.decode_envelope(raw)
}

pub fn decode_world_json(raw: &str) -> Result<WorldData> {
    JsonSaveCodec.decode_world(raw)
}

fn parse_raw_envelope(raw: &str) -> Result<SaveEnvelope> {
    if let Ok(envelope) = serde_json::from_str::<SaveEnvelope>(raw) {
        return Ok(envelope);
    }

    if let Ok(document) = serde_json::from_str::<WorldDump>(raw) {
        return Ok(SaveEnvelope {
            version: SAVE_VERSION,
            payload: serde_json::to_value(&document)?,
            metadata: SaveMetadata::from_dump(&document),
        });
    }

    let value: Value = serde_json::from_str(raw).context("invalid save JSON")?;
    let obj = value.as_object().ok_or_else(|| anyhow!("save document must be a JSON object"))?;
    if let Some(payload) = obj.get("payload").cloned() {
        let version = obj
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| anyhow!("save envelope has payload but invalid/missing numeric version"))?
            as u32;
        let metadata = obj
            .get("metadata")
            .cloned()
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or(SaveMetadata {
                schema: "conscript-save-unknown".to_string(),
                template_count: 0,
                instance_count: 0,
                note: Some("envelope had no metadata".to_string()),
            });
        return Ok(SaveEnvelope { version, payload, metadata });
    }

    bail!("could not parse save data as envelope or bare world dump");
}
