//! Core data model and interpreter for the Battlefield 1942-style `.con`
//! configuration script dialect: command parsing, per-entity method
//! dispatch, the world data store and its post-parse linking pass, the
//! line-by-line interpreter, and the LOD-aware scene-graph walker.

pub mod command;
pub mod dispatch;
pub mod error;
pub mod interpreter;
pub mod model;
pub mod refs;
pub mod registry;
pub mod scene;
pub mod vec3;
pub mod world;

pub use command::Command;
pub use error::ScriptError;
pub use interpreter::{Diagnostic, ScriptReader, ScriptSource};
pub use refs::Ref;
pub use vec3::Vec3;
pub use world::WorldData;
