//! The line-by-line script driver: substitution, block-comments, nested
//! conditionals, and dispatch into [`crate::world::WorldData`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::command::{is_method, Command};
use crate::error::ScriptError;
use crate::world::WorldData;

/// Injected collaborator for reading script text out of a packed archive.
/// `None` (the default) falls back to a plain filesystem read — enumerating
/// *which* files to read is the caller's job, not the interpreter's.
pub trait ScriptSource {
    fn extract_file(&self, path: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IfState {
    False,
    True,
    Consumed,
}

/// One caught dispatch or I/O failure, reported at line granularity.
/// Nothing in [`ScriptReader::read`] is fatal; every line that fails
/// produces one of these and execution continues with the next line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: String,
    pub line: usize,
    pub text: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exception in read(): {} ({}): {}", self.path, self.line, self.text)
    }
}

/// Drives one script-reading pass. `include` recurses within the same
/// reader, sharing `if_stack`/`rem_block`; `run` spawns a fresh reader over
/// the same [`WorldData`] with its own control-flow state and `v_argN`
/// bindings, so argument scoping never leaks back to the caller.
pub struct ScriptReader<'w> {
    world: &'w mut WorldData,
    source: Option<&'w dyn ScriptSource>,
    as_static: bool,
    rem_block: bool,
    if_stack: Vec<IfState>,
    v_args: HashMap<String, String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'w> ScriptReader<'w> {
    pub fn new(world: &'w mut WorldData, source: Option<&'w dyn ScriptSource>) -> Self {
        Self {
            world,
            source,
            as_static: false,
            rem_block: false,
            if_stack: Vec::new(),
            v_args: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Marks every `object.create` processed by this reader (and anything
    /// it `include`s) as also belonging to `static_objects`.
    pub fn as_static(mut self, flag: bool) -> Self {
        self.as_static = flag;
        self
    }

    /// Binds `args[0..]` to `v_arg1..v_argN` for this reader's substitution.
    pub fn with_args(mut self, args: &[String]) -> Self {
        for (i, value) in args.iter().enumerate() {
            self.v_args.insert(format!("v_arg{}", i + 1), value.clone());
        }
        self
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Reads and interprets `path`, trying the archive source first and
    /// falling back to the filesystem. A missing file is reported as a
    /// single diagnostic rather than an error return — per this dialect's
    /// best-effort philosophy, a missing script does not abort the caller.
    pub fn read(&mut self, path: &str) {
        match self.load_text(path) {
            Some(text) => self.execute(path, &text),
            None => self.diagnostics.push(Diagnostic {
                path: path.to_string(),
                line: 0,
                text: "script source not found".to_string(),
            }),
        }
    }

    fn load_text(&self, path: &str) -> Option<String> {
        if let Some(source) = self.source {
            if let Some(text) = source.extract_file(path) {
                return Some(text);
            }
        }
        std::fs::read_to_string(path).ok()
    }

    fn execute(&mut self, path: &str, text: &str) {
        for (index, raw_line) in text.lines().enumerate() {
            self.process_line(path, index + 1, raw_line);
        }
    }

    fn process_line(&mut self, path: &str, line_no: usize, raw_line: &str) {
        let mut command = Command::parse(raw_line);
        let class_lower = command.class_name.as_deref().unwrap_or("").to_lowercase();

        let is_var_or_const = class_lower == "var" || class_lower == "const";
        if !is_var_or_const {
            for arg in &mut command.arguments {
                self.substitute(arg);
            }
        }

        match class_lower.as_str() {
            "beginrem" => self.rem_block = true,
            "endrem" => self.rem_block = false,
            _ => {}
        }

        self.process_conditionals(&class_lower, &command);

        let suppressed =
            self.rem_block || self.if_stack.iter().any(|s| matches!(s, IfState::False | IfState::Consumed));
        if suppressed {
            return;
        }
        if matches!(
            class_lower.as_str(),
            "beginrem" | "endrem" | "rem" | "if" | "elseif" | "else" | "endif"
        ) {
            return;
        }

        if command.method.is_some() {
            match self.dispatch_method(&command) {
                Ok(value) => {
                    // Return-capture (`-> v_target`) only applies to `game.*`
                    // calls today; other classes ignore a target variable.
                    if class_lower == "game" {
                        self.maybe_capture(&command, value);
                    }
                }
                Err(_) => self.diagnostics.push(Diagnostic {
                    path: path.to_string(),
                    line: line_no,
                    text: raw_line.to_string(),
                }),
            }
        } else {
            self.dispatch_directive(path, &command);
        }
    }

    /// `v_` tokens resolve against this reader's own `run` bindings first
    /// (they never leak from a parent reader), then the shared variable
    /// table; `c_` tokens resolve against the shared constant table. Unknown
    /// tokens pass through unchanged.
    fn substitute(&self, token: &mut String) {
        if token.len() < 2 {
            return;
        }
        let prefix = &token[..2];
        if prefix.eq_ignore_ascii_case("v_") {
            if let Some(value) = self.v_args.get(token).or_else(|| self.world.variables.get(token)) {
                *token = value.clone();
            }
        } else if prefix.eq_ignore_ascii_case("c_") {
            if let Some(value) = self.world.constants.get(token) {
                *token = value.clone();
            }
        }
    }

    fn process_conditionals(&mut self, class_lower: &str, command: &Command) {
        match class_lower {
            "if" => {
                let state = if evaluate_condition(command) { IfState::True } else { IfState::False };
                self.if_stack.push(state);
            }
            "elseif" => {
                if let Some(top) = self.if_stack.last_mut() {
                    match top {
                        IfState::False if evaluate_condition(command) => *top = IfState::True,
                        IfState::True => *top = IfState::Consumed,
                        _ => {}
                    }
                }
            }
            "else" => {
                if let Some(top) = self.if_stack.last_mut() {
                    match top {
                        IfState::False => *top = IfState::True,
                        IfState::True => *top = IfState::Consumed,
                        IfState::Consumed => {}
                    }
                }
            }
            "endif" => {
                self.if_stack.pop();
            }
            _ => {}
        }
    }

    fn maybe_capture(&mut self, command: &Command, value: Option<String>) {
        let (Some(target), Some(value)) = (command.target_variable.as_ref(), value) else {
            return;
        };
        if self.world.variables.contains_key(target) {
            self.world.variables.insert(target.clone(), value);
        }
    }

    fn dispatch_method(&mut self, command: &Command) -> Result<Option<String>, ScriptError> {
        let class_name = command.class_name.as_deref().unwrap_or("");
        let method = command.method.as_deref().unwrap_or("");
        let args = &command.arguments;

        if class_name.eq_ignore_ascii_case("objectTemplate") {
            if method.eq_ignore_ascii_case("create") {
                if args.len() >= 2 {
                    self.world.create_object_template(&args[0], &args[1]);
                }
                return Ok(None);
            }
            if method.eq_ignore_ascii_case("active") {
                if let Some(name) = args.first() {
                    self.world.set_active_object_template(name);
                }
                return Ok(None);
            }
            return self.world.dispatch_object_template(method, args).unwrap_or(Ok(None));
        }

        if class_name.eq_ignore_ascii_case("geometryTemplate") {
            if method.eq_ignore_ascii_case("create") {
                if args.len() >= 2 {
                    self.world.create_geometry_template(&args[0], &args[1]);
                }
                return Ok(None);
            }
            if method.eq_ignore_ascii_case("active") {
                if let Some(name) = args.first() {
                    self.world.set_active_geometry_template(name);
                }
                return Ok(None);
            }
            return self.world.dispatch_geometry_template(method, args).unwrap_or(Ok(None));
        }

        if class_name.eq_ignore_ascii_case("networkableInfo") {
            if is_method(method, "createNewInfo") {
                if let Some(name) = args.first() {
                    self.world.create_networkable_info("NetworkableInfo", name);
                }
                return Ok(None);
            }
            if method.eq_ignore_ascii_case("active") {
                if let Some(name) = args.first() {
                    self.world.set_active_networkable_info(name);
                }
                return Ok(None);
            }
            return self.world.dispatch_networkable_info(method, args).unwrap_or(Ok(None));
        }

        if class_name.eq_ignore_ascii_case("object") {
            if method.eq_ignore_ascii_case("create") {
                if let Some(template) = args.first() {
                    self.world.create_object_instance(template, self.as_static);
                }
                return Ok(None);
            }
            if method.eq_ignore_ascii_case("active") {
                if let Some(name) = args.first() {
                    self.world.set_active_object(name);
                }
                return Ok(None);
            }
            // Only the 1-argument property forms are meaningful on an
            // instance; extras are ignored rather than rejected.
            return self.world.dispatch_object_instance(method, args).unwrap_or(Ok(None));
        }

        if class_name.eq_ignore_ascii_case("textureManager") {
            if is_method(method, "alternativePath") {
                if let Some(path) = args.first() {
                    self.world.add_texture_alternative_path(path);
                }
            }
            return Ok(None);
        }

        if class_name.eq_ignore_ascii_case("console") {
            if is_method(method, "worldSize") {
                self.world.set_console_world_size(args)?;
            }
            return Ok(None);
        }

        if class_name.eq_ignore_ascii_case("game") {
            return self.world.dispatch_game(method, args).unwrap_or(Ok(None));
        }

        Ok(None)
    }

    fn dispatch_directive(&mut self, path: &str, command: &Command) {
        let class_name = command.class_name.as_deref().unwrap_or("");
        let lower = class_name.to_lowercase();
        match lower.as_str() {
            "include" => {
                if let Some(target) = command.arguments.first() {
                    let resolved = resolve_relative(path, target);
                    self.read(&resolved);
                }
            }
            "run" => {
                if let Some(target) = command.arguments.first() {
                    let resolved = resolve_relative(path, &ensure_con_extension(target));
                    let run_args = &command.arguments[1..];
                    let mut child = ScriptReader {
                        world: &mut *self.world,
                        source: self.source,
                        as_static: self.as_static,
                        rem_block: false,
                        if_stack: Vec::new(),
                        v_args: HashMap::new(),
                        diagnostics: Vec::new(),
                    }
                    .with_args(run_args);
                    child.read(&resolved);
                    self.diagnostics.extend(child.into_diagnostics());
                }
            }
            "var" => match command.arguments.as_slice() {
                [name, op, value] if op == "=" => {
                    self.world.variables.insert(name.clone(), value.clone());
                }
                [name] => {
                    self.world.variables.entry(name.clone()).or_default();
                }
                _ => {}
            },
            "const" => match command.arguments.as_slice() {
                [name, op, value] if op == "=" => {
                    self.world.constants.insert(name.clone(), value.clone());
                }
                [name] => {
                    self.world.constants.entry(name.clone()).or_default();
                }
                _ => {}
            },
            _ => {
                if command.arguments.len() == 2 {
                    if class_name.len() >= 2 && class_name[..2].eq_ignore_ascii_case("v_") {
                        if self.world.variables.contains_key(class_name) {
                            self.world.variables.insert(class_name.to_string(), command.arguments[1].clone());
                        }
                    } else if class_name.len() >= 2 && class_name[..2].eq_ignore_ascii_case("c_") {
                        if self.world.constants.contains_key(class_name) {
                            self.world.constants.insert(class_name.to_string(), command.arguments[1].clone());
                        }
                    }
                }
            }
        }
    }
}

fn evaluate_condition(command: &Command) -> bool {
    match command.arguments.as_slice() {
        [lhs, op, rhs] if op == "==" => lhs.eq_ignore_ascii_case(rhs),
        _ => false,
    }
}

fn resolve_relative(current_path: &str, target: &str) -> String {
    let parent = Path::new(current_path).parent().unwrap_or_else(|| Path::new(""));
    parent.join(target).to_string_lossy().into_owned()
}

fn ensure_con_extension(target: &str) -> String {
    if Path::new(target).extension().is_some() {
        target.to_string()
    } else {
        format!("{target}.con")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapSource(HashMap<String, String>);
    impl ScriptSource for MapSource {
        fn extract_file(&self, path: &str) -> Option<String> {
            self.0.get(path).cloned()
        }
    }

    #[test]
    fn template_and_geometry_link_after_read() {
        let mut world = WorldData::new();
        let mut files = HashMap::new();
        files.insert(
            "main.con".to_string(),
            [
                "geometryTemplate.create StandardMesh m_tree",
                "geometryTemplate.file trees/oak.sm",
                "objectTemplate.create SimpleObject tree",
                "objectTemplate.geometry m_tree",
            ]
            .join("\n"),
        );
        let source = MapSource(files);
        let mut reader = ScriptReader::new(&mut world, Some(&source));
        reader.read("main.con");
        assert!(reader.diagnostics().is_empty());
        world.link();
        let tree_id = world.templates.id_by_name("tree").unwrap();
        let tree = world.templates.get(tree_id).unwrap();
        assert!(tree.geometry.is_linked());
    }

    #[test]
    fn if_elseif_else_picks_the_matching_branch() {
        let script = [
            "if v_arg1 == host",
            "console.worldSize 1024",
            "elseif v_arg1 == client",
            "console.worldSize 512",
            "else",
            "console.worldSize 256",
            "endif",
        ]
        .join("\n");

        for (arg, expected) in [("host", 1024), ("client", 512), ("other", 256)] {
            let mut world = WorldData::new();
            let mut files = HashMap::new();
            files.insert("script.con".to_string(), script.clone());
            let source = MapSource(files);
            let mut reader =
                ScriptReader::new(&mut world, Some(&source)).with_args(&[arg.to_string()]);
            reader.read("script.con");
            assert_eq!(world.console_world_size, expected, "arg={arg}");
        }
    }

    #[test]
    fn run_scopes_v_arg_bindings_to_the_child_script() {
        let mut world = WorldData::new();
        let mut files = HashMap::new();
        files.insert("a.con".to_string(), "run b.con value1".to_string());
        files.insert(
            "b.con".to_string(),
            "var v_x\nv_x = v_arg1".to_string(),
        );
        let source = MapSource(files);
        let mut reader = ScriptReader::new(&mut world, Some(&source));
        reader.read("a.con");
        assert_eq!(world.variables.get("v_x").map(String::as_str), Some("value1"));
        assert!(!world.variables.contains_key("v_arg1"));
    }

    #[test]
    fn quoted_argument_with_spaces_sets_custom_game_name() {
        let mut world = WorldData::new();
        let mut files = HashMap::new();
        files.insert(
            "script.con".to_string(),
            r#"game.customGameName "Desert Combat""#.to_string(),
        );
        let source = MapSource(files);
        let mut reader = ScriptReader::new(&mut world, Some(&source));
        reader.read("script.con");
        assert_eq!(world.game.custom_game_name, "Desert Combat");
    }

    #[test]
    fn object_create_registers_static_instance() {
        let mut world = WorldData::new();
        let mut files = HashMap::new();
        files.insert(
            "script.con".to_string(),
            "object.create tree\nobject.absolutePosition 10/0/20".to_string(),
        );
        let source = MapSource(files);
        let mut reader = ScriptReader::new(&mut world, Some(&source)).as_static(true);
        reader.read("script.con");
        assert_eq!(world.objects.len(), 1);
        assert_eq!(world.static_objects.len(), 1);
        assert_eq!(world.objects[0].template.unresolved_name(), Some("tree"));
    }

    #[test]
    fn beginrem_endrem_suppresses_dispatch_but_not_conditional_bookkeeping() {
        let mut world = WorldData::new();
        let mut files = HashMap::new();
        files.insert(
            "script.con".to_string(),
            ["beginrem", "if 1 == 1", "console.worldSize 999", "endif", "endrem", "console.worldSize 5"]
                .join("\n"),
        );
        let source = MapSource(files);
        let mut reader = ScriptReader::new(&mut world, Some(&source));
        reader.read("script.con");
        assert_eq!(world.console_world_size, 5);
    }
}
