//! The mixed-type reference pattern: before the linking pass runs, a
//! template/geometry/networkable-info reference is just the raw name
//! string the script wrote; after linking, resolvable names become a
//! direct handle. [`Ref`] makes that state a discriminant covering the
//! dialect's four forward-reference kinds (object template, geometry
//! template, networkable info, and object-to-object `addTemplate`
//! links) instead of an `Any`-typed field.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ref<Id> {
    Unresolved(String),
    Resolved(Id),
}

impl<Id: Copy> Ref<Id> {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Ref::Unresolved(name.into())
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, Ref::Resolved(_))
    }

    pub fn resolved(&self) -> Option<Id> {
        match self {
            Ref::Resolved(id) => Some(*id),
            Ref::Unresolved(_) => None,
        }
    }

    pub fn unresolved_name(&self) -> Option<&str> {
        match self {
            Ref::Unresolved(name) => Some(name.as_str()),
            Ref::Resolved(_) => None,
        }
    }
}

impl<Id> Default for Ref<Id> {
    fn default() -> Self {
        Ref::Unresolved(String::new())
    }
}
