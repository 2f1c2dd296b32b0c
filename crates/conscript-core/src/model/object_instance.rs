use serde::{Deserialize, Serialize};

use crate::dispatch::{parse_f64, parse_i32};
use crate::error::ScriptError;
use crate::model::ids::{ObjectInstanceId, ObjectTemplateId};
use crate::refs::Ref;
use crate::vec3::Vec3;

/// A placed, world-space instance of an [`super::ObjectTemplate`]. Unlike
/// templates and geometry, instances are addressed by name only loosely —
/// duplicate names are legal, so `object.getObject` falls back to a linear
/// scan rather than a [`crate::registry::Registry`] lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInstance {
    pub id: ObjectInstanceId,
    pub template: Ref<ObjectTemplateId>,
    pub name: Option<String>,
    pub absolute_position: Vec3,
    pub rotation: Vec3,
    pub geometry_scale: f64,
    pub osid: Option<i32>,
    pub team: Option<String>,
}

impl ObjectInstance {
    pub fn new(id: ObjectInstanceId, template: impl Into<String>) -> Self {
        Self {
            id,
            template: Ref::unresolved(template),
            name: None,
            absolute_position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            geometry_scale: 1.0,
            osid: None,
            team: None,
        }
    }
}

/// The instance-level class isn't a fixed enum of method names the way a
/// template's is — properties arrive as dotted method tokens
/// (`object.absolutePosition`, `object.geometry.scale`) — so dispatch is a
/// small hand-written match rather than a [`crate::dispatch::MethodTable`].
/// Returns `None` for a property this dialect doesn't recognize on an
/// instance, which the caller treats as a silent no-op.
///
/// The original's `setProperty` gates its entire body on `len(arguments)
/// == 1` — 0 or 2+ arguments is a complete no-op, nothing mutated, nothing
/// returned. Each arm below enforces that before touching `instance`.
pub fn apply_property(
    instance: &mut ObjectInstance,
    property: &str,
    args: &[String],
) -> Option<Result<Option<String>, ScriptError>> {
    let key = property.to_lowercase();
    let key = key.strip_prefix("set").unwrap_or(&key);
    match key {
        "absoluteposition" => Some((|| {
            let [v] = args else { return Ok(None) };
            instance.absolute_position = Vec3::parse(v);
            Ok(Some(instance.absolute_position.to_canonical_string()))
        })()),
        "rotation" => Some((|| {
            let [v] = args else { return Ok(None) };
            instance.rotation = Vec3::parse(v);
            Ok(Some(instance.rotation.to_canonical_string()))
        })()),
        "geometry.scale" => Some((|| {
            let [v] = args else { return Ok(None) };
            instance.geometry_scale = parse_f64(v)?;
            Ok(Some(instance.geometry_scale.to_string()))
        })()),
        "osid" => Some((|| {
            let [v] = args else { return Ok(None) };
            instance.osid = Some(parse_i32(v)?);
            Ok(instance.osid.map(|v| v.to_string()))
        })()),
        "team" => Some((|| {
            let [v] = args else { return Ok(None) };
            instance.team = Some(v.clone());
            Ok(instance.team.clone())
        })()),
        "name" => Some((|| {
            let [v] = args else { return Ok(None) };
            instance.name = Some(v.clone());
            Ok(instance.name.clone())
        })()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ObjectInstance {
        ObjectInstance::new(ObjectInstanceId(0), "tank")
    }

    #[test]
    fn absolute_position_requires_exactly_one_argument() {
        let mut o = sample();
        apply_property(&mut o, "absolutePosition", &["1/2/3".to_string()]).unwrap().unwrap();
        assert_eq!(o.absolute_position, Vec3::new(1.0, 2.0, 3.0));

        // Neither a 0-arg nor a 2+-arg call mutates anything.
        let zero_arg = apply_property(&mut o, "absolutePosition", &[]).unwrap().unwrap();
        assert_eq!(zero_arg, None);
        let two_arg = apply_property(
            &mut o,
            "absolutePosition",
            &["4/5/6".to_string(), "extra".to_string()],
        )
        .unwrap()
        .unwrap();
        assert_eq!(two_arg, None);
        assert_eq!(o.absolute_position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn geometry_scale_is_dotted_property() {
        let mut o = sample();
        apply_property(&mut o, "geometry.scale", &["2".to_string()]).unwrap().unwrap();
        assert_eq!(o.geometry_scale, 2.0);
    }

    #[test]
    fn unrecognized_property_is_none() {
        let mut o = sample();
        assert!(apply_property(&mut o, "bogus", &[]).is_none());
    }

    #[test]
    fn set_prefix_is_accepted() {
        let mut o = sample();
        apply_property(&mut o, "setTeam", &["1".to_string()]).unwrap().unwrap();
        assert_eq!(o.team.as_deref(), Some("1"));
    }
}
