use serde::{Deserialize, Serialize};

use crate::registry::Id;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl From<Id> for $name {
            fn from(id: Id) -> Self {
                $name(id.0)
            }
        }

        impl From<$name> for Id {
            fn from(id: $name) -> Self {
                Id(id.0)
            }
        }
    };
}

entity_id!(ObjectTemplateId);
entity_id!(GeometryTemplateId);
entity_id!(NetworkableInfoId);
entity_id!(ObjectInstanceId);
