//! Parses one line of script text into a structured [`Command`].

/// One parsed line: `className.method arg1 arg2 "quoted arg" -> v_target`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub class_name: Option<String>,
    pub method: Option<String>,
    pub arguments: Vec<String>,
    pub target_variable: Option<String>,
}

impl Command {
    /// Parses a single (already trimmed) line.
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        if line.is_empty() {
            return Command::default();
        }

        let class_end = line.find(['.', ' ', '\t', '\x0c']).unwrap_or(line.len());
        let class_name_raw = &line[..class_end];
        let mut rest = &line[class_end..];

        let mut method = None;
        if let Some(stripped) = rest.strip_prefix('.') {
            let method_end = stripped.find([' ', '\t', '\x0c']).unwrap_or(stripped.len());
            let method_raw = &stripped[..method_end];
            if !method_raw.is_empty() {
                method = Some(method_raw.to_string());
            }
            rest = &stripped[method_end..];
        }

        let class_name =
            if class_name_raw.is_empty() { None } else { Some(class_name_raw.to_string()) };

        let mut arguments = tokenize_arguments(rest.trim_start());
        let mut target_variable = None;
        if arguments.len() > 1 {
            let last = arguments.len() - 1;
            if arguments[last - 1] == "->" && arguments[last].to_lowercase().starts_with("v_") {
                target_variable = Some(arguments.pop().unwrap());
                arguments.pop();
            }
        }

        Command { class_name, method, arguments, target_variable }
    }

    /// Matches this command against a `"Class.Method"` pattern. Either half
    /// may be empty or `*` to act as a wildcard; the method half also
    /// accepts the `set`-prefixed spelling of the reference name.
    pub fn matches(&self, pattern: &str) -> bool {
        let mut parts = pattern.splitn(2, '.');
        let class_part = parts.next().unwrap_or("");
        let method_part = parts.next();

        let class_ok = if class_part.is_empty() || class_part == "*" {
            true
        } else {
            self.class_name.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(class_part))
        };

        let method_ok = match method_part {
            None => true,
            Some(m) if m.is_empty() || m == "*" => true,
            Some(m) => self.method.as_deref().is_some_and(|mm| is_method(mm, m)),
        };

        class_ok && method_ok
    }
}

/// `method` matches `reference` case-insensitively, directly or with the
/// accepted `set` prefix (`"foo"` matches both `"foo"` and `"setfoo"`).
pub fn is_method(method: &str, reference: &str) -> bool {
    method.eq_ignore_ascii_case(reference)
        || method.eq_ignore_ascii_case(&format!("set{reference}"))
}

/// Splits an argument region into tokens: `"..."` spans (greedy to the
/// closing quote, or end-of-line if unterminated) or runs of non-whitespace.
/// Quote characters are stripped from the resulting tokens.
fn tokenize_arguments(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        if chars[i] == '"' {
            i += 1;
            while i < chars.len() && chars[i] != '"' {
                i += 1;
            }
            if i < chars.len() {
                i += 1;
            }
        } else {
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
        }
        let token: String = chars[start..i].iter().collect();
        out.push(token.replace('"', ""));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_method_and_args() {
        let c = Command::parse("objectTemplate.create SimpleObject tree");
        assert_eq!(c.class_name.as_deref(), Some("objectTemplate"));
        assert_eq!(c.method.as_deref(), Some("create"));
        assert_eq!(c.arguments, vec!["SimpleObject", "tree"]);
    }

    #[test]
    fn parses_class_only() {
        let c = Command::parse("include Common.con");
        assert_eq!(c.class_name.as_deref(), Some("include"));
        assert_eq!(c.method, None);
        assert_eq!(c.arguments, vec!["Common.con"]);
    }

    #[test]
    fn quoted_argument_keeps_spaces() {
        let c = Command::parse(r#"game.customGameName "Desert Combat""#);
        assert_eq!(c.arguments, vec!["Desert Combat"]);
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        let c = Command::parse(r#"game.customGameName "Desert Combat"#);
        assert_eq!(c.arguments, vec!["Desert Combat"]);
    }

    #[test]
    fn target_variable_capture() {
        let c = Command::parse("game.customGameName -> v_name");
        assert_eq!(c.arguments, Vec::<String>::new());
        assert_eq!(c.target_variable.as_deref(), Some("v_name"));
    }

    #[test]
    fn target_variable_requires_v_prefix() {
        let c = Command::parse("game.customGameName -> name");
        assert_eq!(c.arguments, vec!["->", "name"]);
        assert_eq!(c.target_variable, None);
    }

    #[test]
    fn blank_line_has_no_class_name() {
        let c = Command::parse("   ");
        assert_eq!(c.class_name, None);
    }

    #[test]
    fn pattern_matching_wildcards_and_set_prefix() {
        let c = Command::parse("objectTemplate.setMaxHitPoints 10");
        assert!(c.matches("objectTemplate.maxHitPoints"));
        assert!(c.matches("*.maxHitPoints"));
        assert!(c.matches("objectTemplate.*"));
        assert!(c.matches("objectTemplate"));
        assert!(!c.matches("geometryTemplate.maxHitPoints"));
    }
}
