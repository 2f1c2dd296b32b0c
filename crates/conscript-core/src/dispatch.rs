//! Per-entity-kind method dispatch: a table mapping a normalized method
//! name to a typed setter, replacing the reference dialect's runtime
//! dispatch by introspected method name.

use std::collections::HashMap;

use crate::command::is_method;
use crate::error::ScriptError;

/// A setter/getter for one method on entity type `T`. Receives the raw
/// (already variable-substituted) argument tokens and may return a string
/// value for `-> v_target` capture, mirroring the dialect's "every setter
/// is also a zero-arg getter" convention.
pub type Setter<T> = fn(&mut T, &[String]) -> Result<Option<String>, ScriptError>;

#[derive(Clone, Copy)]
struct MethodEntry<T> {
    setter: Setter<T>,
    min_params: usize,
    max_params: usize,
}

/// Case-insensitive method table for one entity kind. Every registered
/// name is additionally reachable with a `set` prefix.
pub struct MethodTable<T> {
    methods: HashMap<String, MethodEntry<T>>,
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self { methods: HashMap::new() }
    }

    /// Registers `name` (and `set`+`name`) with an inclusive argument-count
    /// range. The range is informational only — the dispatcher does not
    /// reject calls outside it; a setter that truly requires an argument
    /// reports that itself via [`ScriptError::MissingArgument`].
    pub fn register(&mut self, name: &str, min_params: usize, max_params: usize, setter: Setter<T>) {
        let lower = name.to_lowercase();
        self.methods.insert(lower.clone(), MethodEntry { setter, min_params, max_params });
        self.methods.insert(format!("set{lower}"), MethodEntry { setter, min_params, max_params });
    }

    /// Looks up `name` case-insensitively and invokes it. Returns `None`
    /// when the method is unknown (a silent no-op, per the dialect's
    /// tolerance for malformed scripts); otherwise the setter's result.
    pub fn call(&self, obj: &mut T, name: &str, args: &[String]) -> Option<Result<Option<String>, ScriptError>> {
        let entry = self.methods.get(&name.to_lowercase())?;
        Some((entry.setter)(obj, args))
    }

    #[cfg(test)]
    fn arity(&self, name: &str) -> Option<(usize, usize)> {
        self.methods.get(&name.to_lowercase()).map(|e| (e.min_params, e.max_params))
    }
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub fn arg0(args: &[String]) -> Result<&str, ScriptError> {
    args.first().map(String::as_str).ok_or(ScriptError::MissingArgument)
}

pub fn parse_f64(s: &str) -> Result<f64, ScriptError> {
    s.trim().parse().map_err(|_| ScriptError::FloatParse(s.to_string()))
}

pub fn parse_i32(s: &str) -> Result<i32, ScriptError> {
    s.trim().parse().map_err(|_| ScriptError::IntParse(s.to_string()))
}

pub fn parse_bool_int(s: &str) -> Result<bool, ScriptError> {
    let n: i64 = s.trim().parse().map_err(|_| ScriptError::BoolParse(s.to_string()))?;
    Ok(n != 0)
}

/// Resolves `method` (which may carry the accepted `set` prefix) against
/// one of `options`, case-insensitively — used by the small handful of
/// classes (`object`, `texturemanager`, `console`) dispatched with a
/// hand-written `match` rather than a full [`MethodTable`].
pub fn method_is(method: &str, reference: &str) -> bool {
    is_method(method, reference)
}
