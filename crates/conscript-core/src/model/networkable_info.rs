use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::dispatch::{parse_bool_int, parse_f64, MethodTable};
use crate::error::ScriptError;
use crate::model::ids::NetworkableInfoId;
use crate::registry::Named;

/// Mirrors the `PMNone`/`PMLinear`/`PMCubic`/`PMUsePhysics` tokens the
/// reference dialect accepts for `networkableInfo.setPredictionMode`,
/// stored as its enumerated index rather than the raw string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PredictionMode {
    #[default]
    None,
    Linear,
    Cubic,
    UsePhysics,
}

impl PredictionMode {
    pub fn parse(s: &str) -> Result<Self, ScriptError> {
        match s.to_lowercase().as_str() {
            "pmnone" => Ok(PredictionMode::None),
            "pmlinear" => Ok(PredictionMode::Linear),
            "pmcubic" => Ok(PredictionMode::Cubic),
            "pmusephysics" => Ok(PredictionMode::UsePhysics),
            _ => Err(ScriptError::PredictionMode(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMode::None => "PMNone",
            PredictionMode::Linear => "PMLinear",
            PredictionMode::Cubic => "PMCubic",
            PredictionMode::UsePhysics => "PMUsePhysics",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkableInfo {
    pub id: NetworkableInfoId,
    pub kind: String,
    pub name: String,
    pub is_unique: bool,
    pub base_priority: f64,
    pub prediction_mode: PredictionMode,
}

impl Named for NetworkableInfo {
    fn name(&self) -> &str {
        &self.name
    }
}

impl NetworkableInfo {
    pub fn new(id: NetworkableInfoId, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
            is_unique: false,
            base_priority: 1.0,
            prediction_mode: PredictionMode::default(),
        }
    }
}

fn s_is_unique(n: &mut NetworkableInfo, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        n.is_unique = parse_bool_int(v)?;
    }
    Ok(Some(n.is_unique.to_string()))
}

fn s_base_priority(n: &mut NetworkableInfo, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        n.base_priority = parse_f64(v)?;
    }
    Ok(Some(n.base_priority.to_string()))
}

fn s_prediction_mode(n: &mut NetworkableInfo, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        n.prediction_mode = PredictionMode::parse(v)?;
    }
    Ok(Some(n.prediction_mode.as_str().to_string()))
}

pub fn method_table() -> &'static MethodTable<NetworkableInfo> {
    static TABLE: OnceLock<MethodTable<NetworkableInfo>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = MethodTable::new();
        t.register("isunique", 0, 1, s_is_unique);
        t.register("basepriority", 0, 1, s_base_priority);
        t.register("predictionmode", 0, 1, s_prediction_mode);
        t
    })
}
