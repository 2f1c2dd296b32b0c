//! The entity types the interpreter mutates: templates, geometry, networkable
//! info, placed instances, and the singleton game config.

pub mod game_config;
pub mod geometry_template;
pub mod ids;
pub mod networkable_info;
pub mod object_instance;
pub mod object_template;

pub use game_config::GameConfig;
pub use geometry_template::GeometryTemplate;
pub use ids::{GeometryTemplateId, NetworkableInfoId, ObjectInstanceId, ObjectTemplateId};
pub use networkable_info::{NetworkableInfo, PredictionMode};
pub use object_instance::ObjectInstance;
pub use object_template::{ObjectTemplate, ObjectTemplateChild};
