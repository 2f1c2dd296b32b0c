use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::dispatch::{arg0, parse_i32, MethodTable};
use crate::error::ScriptError;

/// Global, singleton map/session settings. Unlike the other entity kinds
/// there is exactly one `GameConfig` per [`crate::world::WorldData`] — no
/// registry, no active cursor, `game.<method>` always targets it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub map_id: String,
    pub active_combat_area: [i32; 4],
    pub custom_game_name: String,
    pub custom_game_version: String,
    pub objective_briefing: String,
    pub multiplayer_briefing_objectives: String,
    pub mod_paths: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_id: String::new(),
            active_combat_area: [0, 0, 0, 0],
            custom_game_name: String::new(),
            custom_game_version: String::new(),
            objective_briefing: String::new(),
            multiplayer_briefing_objectives: String::new(),
            mod_paths: Vec::new(),
        }
    }
}

fn s_map_id(g: &mut GameConfig, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.map_id = v.clone();
    }
    Ok(Some(g.map_id.clone()))
}

fn s_active_combat_area(g: &mut GameConfig, args: &[String]) -> Result<Option<String>, ScriptError> {
    if args.len() >= 4 {
        let mut parsed = [0i32; 4];
        for (slot, raw) in parsed.iter_mut().zip(args.iter()) {
            *slot = parse_i32(raw)?;
        }
        g.active_combat_area = parsed;
    }
    Ok(Some(
        g.active_combat_area.map(|v| v.to_string()).join("/"),
    ))
}

fn s_custom_game_name(g: &mut GameConfig, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.custom_game_name = v.clone();
    }
    Ok(Some(g.custom_game_name.clone()))
}

fn s_custom_game_version(g: &mut GameConfig, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.custom_game_version = v.clone();
    }
    Ok(Some(g.custom_game_version.clone()))
}

fn s_objective_briefing(g: &mut GameConfig, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.objective_briefing = v.clone();
    }
    Ok(Some(g.objective_briefing.clone()))
}

fn s_multiplayer_briefing_objective(g: &mut GameConfig, args: &[String]) -> Result<Option<String>, ScriptError> {
    if let Some(v) = args.first() {
        g.multiplayer_briefing_objectives = v.clone();
    }
    Ok(Some(g.multiplayer_briefing_objectives.clone()))
}

fn s_add_mod_path(g: &mut GameConfig, args: &[String]) -> Result<Option<String>, ScriptError> {
    let path = arg0(args)?.to_string();
    g.mod_paths.push(path.clone());
    Ok(Some(path))
}

pub fn method_table() -> &'static MethodTable<GameConfig> {
    static TABLE: OnceLock<MethodTable<GameConfig>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = MethodTable::new();
        t.register("mapid", 0, 1, s_map_id);
        t.register("activecombatarea", 0, 4, s_active_combat_area);
        t.register("customgamename", 0, 1, s_custom_game_name);
        t.register("customgameversion", 0, 1, s_custom_game_version);
        t.register("objectivebriefing", 0, 1, s_objective_briefing);
        t.register("multiplayerbriefingobjective", 0, 1, s_multiplayer_briefing_objective);
        t.register("addmodpath", 1, 1, s_add_mod_path);
        t
    })
}
