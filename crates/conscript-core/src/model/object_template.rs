use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::dispatch::{arg0, parse_bool_int, parse_f64, parse_i32, MethodTable};
use crate::error::ScriptError;
use crate::model::ids::{GeometryTemplateId, NetworkableInfoId, ObjectTemplateId};
use crate::refs::Ref;
use crate::registry::Named;
use crate::vec3::Vec3;

/// A declarative blueprint for a class of game entities — a vehicle, prop,
/// trigger, or spawner. `children` forms the scene graph walked in
/// [`crate::scene`]; `parents` is populated by the linking pass and lets a
/// child template be reached from its owners without an owning pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectTemplate {
    pub id: ObjectTemplateId,
    pub kind: String,
    pub name: String,

    pub networkable_info: Option<Ref<NetworkableInfoId>>,
    pub geometry: Ref<GeometryTemplateId>,

    pub max_hit_points: f64,
    pub min_rotation: Vec3,
    pub max_rotation: Vec3,
    pub max_speed: Vec3,
    pub acceleration: Vec3,
    pub input_to_yaw: i32,
    pub input_to_pitch: i32,
    pub input_to_roll: i32,
    pub automatic_reset: bool,
    pub mag_size: i32,
    pub num_of_mag: i32,
    pub number_of_gears: Option<i32>,
    pub gear_up: f64,
    pub gear_down: f64,
    pub trigger_radius: i32,
    pub line_points: Vec<Vec3>,
    pub control_point_name: String,
    pub team: Option<String>,
    pub unable_to_change_team: Option<String>,

    pub min_spawn_delay: Option<String>,
    pub max_spawn_delay: Option<String>,
    pub spawn_delay_at_start: Option<String>,
    pub time_to_live: Option<String>,
    pub distance: Option<String>,
    pub damage_when_lost: Option<String>,
    pub max_nr_of_object_spawned: Option<String>,
    pub team_on_vehicle: Option<String>,
    /// Numbered spawner-child mapping (`objectTemplate.setObjectTemplate N name`).
    pub object_templates: BTreeMap<u32, String>,

    pub children: Vec<ObjectTemplateChild>,
    pub active_child: Option<usize>,
    pub parents: Vec<ObjectTemplateId>,
}

/// One entry of a template's scene-graph children: a local transform plus
/// a (possibly still unresolved) reference to the child template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectTemplateChild {
    pub template: Ref<ObjectTemplateId>,
    pub set_position: Vec3,
    pub set_rotation: Vec3,
}

impl ObjectTemplateChild {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: Ref::unresolved(template),
            set_position: Vec3::ZERO,
            set_rotation: Vec3::ZERO,
        }
    }
}

impl Named for ObjectTemplate {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ObjectTemplate {
    pub fn new(id: ObjectTemplateId, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
            networkable_info: None,
            geometry: Ref::default(),
            max_hit_points: 10.0,
            min_rotation: Vec3::ZERO,
            max_rotation: Vec3::ZERO,
            max_speed: Vec3::splat(1.0),
            acceleration: Vec3::splat(0.1),
            input_to_yaw: 55,
            input_to_pitch: 55,
            input_to_roll: 55,
            automatic_reset: false,
            mag_size: 30,
            num_of_mag: 3,
            number_of_gears: None,
            gear_up: 0.7,
            gear_down: 0.3,
            trigger_radius: 0,
            line_points: Vec::new(),
            control_point_name: String::new(),
            team: None,
            unable_to_change_team: None,
            min_spawn_delay: None,
            max_spawn_delay: None,
            spawn_delay_at_start: None,
            time_to_live: None,
            distance: None,
            damage_when_lost: None,
            max_nr_of_object_spawned: None,
            team_on_vehicle: None,
            object_templates: BTreeMap::new(),
            children: Vec::new(),
            active_child: None,
            parents: Vec::new(),
        }
    }
}

fn s_network_info(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.networkable_info = Some(Ref::unresolved(v.clone()));
    }
    Ok(t.networkable_info.as_ref().and_then(|r| r.unresolved_name().map(str::to_string)))
}

fn s_geometry(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.geometry = Ref::unresolved(v.clone());
    }
    Ok(t.geometry.unresolved_name().map(str::to_string))
}

fn s_max_hit_points(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.max_hit_points = parse_f64(v)?;
    }
    Ok(Some(t.max_hit_points.to_string()))
}

fn s_min_rotation(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.min_rotation = Vec3::parse(v);
    }
    Ok(Some(t.min_rotation.to_canonical_string()))
}

fn s_max_rotation(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.max_rotation = Vec3::parse(v);
    }
    Ok(Some(t.max_rotation.to_canonical_string()))
}

fn s_max_speed(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.max_speed = Vec3::parse(v);
    }
    Ok(Some(t.max_speed.to_canonical_string()))
}

fn s_acceleration(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.acceleration = Vec3::parse(v);
    }
    Ok(Some(t.acceleration.to_canonical_string()))
}

fn s_input_to_yaw(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.input_to_yaw = parse_i32(v)?;
    }
    Ok(Some(t.input_to_yaw.to_string()))
}

fn s_input_to_pitch(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.input_to_pitch = parse_i32(v)?;
    }
    Ok(Some(t.input_to_pitch.to_string()))
}

fn s_input_to_roll(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.input_to_roll = parse_i32(v)?;
    }
    Ok(Some(t.input_to_roll.to_string()))
}

fn s_automatic_reset(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.automatic_reset = parse_bool_int(v)?;
    }
    Ok(Some(t.automatic_reset.to_string()))
}

fn s_mag_size(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.mag_size = parse_i32(v)?;
    }
    Ok(Some(t.mag_size.to_string()))
}

fn s_num_of_mag(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.num_of_mag = parse_i32(v)?;
    }
    Ok(Some(t.num_of_mag.to_string()))
}

fn s_number_of_gears(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.number_of_gears = Some(parse_i32(v)?);
    }
    Ok(t.number_of_gears.map(|v| v.to_string()))
}

fn s_gear_up(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.gear_up = parse_f64(v)?;
    }
    Ok(Some(t.gear_up.to_string()))
}

fn s_gear_down(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        t.gear_down = parse_f64(v)?;
    }
    Ok(Some(t.gear_down.to_string()))
}

fn s_trigger_radius(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    t.trigger_radius = parse_i32(arg0(args)?)?;
    Ok(None)
}

fn s_add_line_point(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    t.line_points.push(Vec3::parse(arg0(args)?));
    Ok(None)
}

fn s_control_point_name(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    t.control_point_name = arg0(args)?.to_string();
    Ok(None)
}

fn s_team(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    t.team = Some(arg0(args)?.to_string());
    Ok(None)
}

fn s_unable_to_change_team(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    t.unable_to_change_team = Some(arg0(args)?.to_string());
    Ok(None)
}

macro_rules! verbatim_setter {
    ($fn_name:ident, $field:ident) => {
        fn $fn_name(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
            t.$field = Some(arg0(args)?.to_string());
            Ok(None)
        }
    };
}

verbatim_setter!(s_min_spawn_delay, min_spawn_delay);
verbatim_setter!(s_max_spawn_delay, max_spawn_delay);
verbatim_setter!(s_spawn_delay_at_start, spawn_delay_at_start);
verbatim_setter!(s_time_to_live, time_to_live);
verbatim_setter!(s_distance, distance);
verbatim_setter!(s_damage_when_lost, damage_when_lost);
verbatim_setter!(s_max_nr_of_object_spawned, max_nr_of_object_spawned);
verbatim_setter!(s_team_on_vehicle, team_on_vehicle);

fn s_set_object_template(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    if args.len() < 2 {
        return Err(ScriptError::MissingArgument);
    }
    let key = parse_i32(&args[0])?;
    t.object_templates.insert(key as u32, args[1].clone());
    Ok(None)
}

fn s_add_template(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    let child = ObjectTemplateChild::new(arg0(args)?);
    t.children.push(child);
    t.active_child = Some(t.children.len() - 1);
    Ok(None)
}

fn s_set_active_template(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    let index = parse_i32(arg0(args)?)? as usize;
    if index < t.children.len() {
        t.active_child = Some(index);
    }
    Ok(None)
}

fn s_remove_template(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    let index = parse_i32(arg0(args)?)? as usize;
    if index < t.children.len() {
        t.children.remove(index);
        t.active_child = match t.active_child {
            Some(active) if active == index => None,
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
    }
    Ok(None)
}

fn s_position(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    let value = Vec3::parse(arg0(args)?);
    if let Some(active) = t.active_child {
        t.children[active].set_position = value;
    }
    Ok(None)
}

fn s_rotation(t: &mut ObjectTemplate, args: &[String]) -> Result<Option<String>, ScriptError> {
    let value = Vec3::parse(arg0(args)?);
    if let Some(active) = t.active_child {
        t.children[active].set_rotation = value;
    }
    Ok(None)
}

pub fn method_table() -> &'static MethodTable<ObjectTemplate> {
    static TABLE: OnceLock<MethodTable<ObjectTemplate>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = MethodTable::new();
        t.register("networkableinfo", 0, 1, s_network_info);
        t.register("geometry", 0, 1, s_geometry);
        t.register("maxhitpoints", 0, 1, s_max_hit_points);
        t.register("minrotation", 0, 1, s_min_rotation);
        t.register("maxrotation", 0, 1, s_max_rotation);
        t.register("maxspeed", 0, 1, s_max_speed);
        t.register("acceleration", 0, 1, s_acceleration);
        t.register("inputtoyaw", 0, 1, s_input_to_yaw);
        t.register("inputtopitch", 0, 1, s_input_to_pitch);
        t.register("inputtoroll", 0, 1, s_input_to_roll);
        t.register("automaticreset", 0, 1, s_automatic_reset);
        t.register("magsize", 0, 1, s_mag_size);
        t.register("numofmag", 0, 1, s_num_of_mag);
        t.register("numberofgears", 0, 1, s_number_of_gears);
        t.register("gearup", 0, 1, s_gear_up);
        t.register("geardown", 0, 1, s_gear_down);
        t.register("triggerradius", 1, 1, s_trigger_radius);
        t.register("addlinepoint", 1, 1, s_add_line_point);
        t.register("controlpointname", 1, 1, s_control_point_name);
        t.register("team", 1, 1, s_team);
        t.register("unabletochangeteam", 1, 1, s_unable_to_change_team);
        t.register("minspawndelay", 1, 1, s_min_spawn_delay);
        t.register("maxspawndelay", 1, 1, s_max_spawn_delay);
        t.register("spawndelayatstart", 1, 1, s_spawn_delay_at_start);
        t.register("timetolive", 1, 1, s_time_to_live);
        t.register("distance", 1, 1, s_distance);
        t.register("damagewhenlost", 1, 1, s_damage_when_lost);
        t.register("maxnrofobjectspawned", 1, 1, s_max_nr_of_object_spawned);
        t.register("teamonvehicle", 1, 1, s_team_on_vehicle);
        t.register("setobjecttemplate", 2, 2, s_set_object_template);
        t.register("addtemplate", 1, 1, s_add_template);
        t.register("setactivetemplate", 1, 1, s_set_active_template);
        t.register("removetemplate", 1, 1, s_remove_template);
        t.register("position", 1, 1, s_position);
        t.register("rotation", 1, 1, s_rotation);
        t
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ObjectTemplate {
        ObjectTemplate::new(ObjectTemplateId(0), "SimpleObject", "tree")
    }

    #[test]
    fn geometry_setter_is_also_a_getter() {
        let mut t = sample();
        let table = method_table();
        let set = table.call(&mut t, "geometry", &["m_tree".to_string()]).unwrap().unwrap();
        assert_eq!(set.as_deref(), Some("m_tree"));
        let get = table.call(&mut t, "geometry", &[]).unwrap().unwrap();
        assert_eq!(get.as_deref(), Some("m_tree"));
    }

    #[test]
    fn active_child_tracks_position_and_rotation() {
        let mut t = sample();
        let table = method_table();
        table.call(&mut t, "addTemplate", &["child_a".to_string()]).unwrap().unwrap();
        table.call(&mut t, "position", &["1/2/3".to_string()]).unwrap().unwrap();
        table.call(&mut t, "rotation", &["0/90/0".to_string()]).unwrap().unwrap();
        assert_eq!(t.children[0].set_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.children[0].set_rotation, Vec3::new(0.0, 90.0, 0.0));
    }

    #[test]
    fn remove_template_shifts_active_cursor() {
        let mut t = sample();
        let table = method_table();
        table.call(&mut t, "addTemplate", &["a".to_string()]).unwrap().unwrap();
        table.call(&mut t, "addTemplate", &["b".to_string()]).unwrap().unwrap();
        table.call(&mut t, "setActiveTemplate", &["1".to_string()]).unwrap().unwrap();
        table.call(&mut t, "removeTemplate", &["0".to_string()]).unwrap().unwrap();
        assert_eq!(t.children.len(), 1);
        assert_eq!(t.active_child, Some(0));
    }

    #[test]
    fn mandatory_setter_without_argument_errors() {
        let mut t = sample();
        let table = method_table();
        let result = table.call(&mut t, "team", &[]).unwrap();
        assert_eq!(result, Err(ScriptError::MissingArgument));
    }
}
