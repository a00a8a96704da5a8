use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::blocks::find_immediates;

static JOIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^join\s+(\S+)$").unwrap());

/// Source of script text pulled in by `join` directives.
pub trait ScriptLoader {
    /// Text of the named script, or `None` when it cannot be found.
    fn load_script(&self, name: &str) -> Option<String>;
}

/// Resources for contexts with no search path; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ScriptLoader for NoResources {
    fn load_script(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Immediate statements of a script with its `join`ed scripts appended
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReducedScript {
    pub statements: Vec<String>,
}

impl ReducedScript {
    /// The statements as script text, one `;`-terminated statement per line.
    pub fn text(&self) -> String {
        self.statements
            .iter()
            .map(|s| format!("{s};"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reduce a script to its immediate statements, following `join` directives.
///
/// Joined scripts are reduced the same way and appended in the order their
/// `join` statements are reached. Each script name is followed at most once.
pub fn reduce_script<L: ScriptLoader + ?Sized>(src: &str, loader: &L) -> ReducedScript {
    let mut statements = find_immediates(src);
    let mut joined = HashSet::new();

    let mut i = 0;
    while i < statements.len() {
        let name = JOIN.captures(&statements[i]).map(|caps| caps[1].to_string());
        i += 1;
        let Some(name) = name else { continue };
        if !joined.insert(name.clone()) {
            continue;
        }
        match loader.load_script(&name) {
            Some(text) => {
                let included = find_immediates(&text);
                debug!(script = %name, statements = included.len(), "joined script");
                statements.extend(included);
            }
            None => warn!(script = %name, "can't find joined script"),
        }
    }

    ReducedScript { statements }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapLoader(HashMap<&'static str, &'static str>);

    impl ScriptLoader for MapLoader {
        fn load_script(&self, name: &str) -> Option<String> {
            self.0.get(name).map(|s| s.to_string())
        }
    }

    #[test]
    fn test_reduce_without_joins() {
        let reduced = reduce_script("a;\nif (created) { b; }", &NoResources);
        assert_eq!(reduced.statements, vec!["a", "b"]);
        assert_eq!(reduced.text(), "a;\nb;");
    }

    #[test]
    fn test_join_appends_immediates() {
        let loader = MapLoader(HashMap::from([(
            "lamp",
            "if (created) { drawaslight; }\nif (weapon) { hide; }",
        )]));
        let reduced = reduce_script("join lamp;\nx = 2;", &loader);
        assert_eq!(reduced.statements, vec!["join lamp", "x = 2", "drawaslight"]);
    }

    #[test]
    fn test_nested_and_cyclic_joins() {
        let loader = MapLoader(HashMap::from([
            ("a", "join b;\nfrom_a;"),
            ("b", "join a;\nfrom_b;"),
        ]));
        let reduced = reduce_script("join a;", &loader);
        assert_eq!(
            reduced.statements,
            vec!["join a", "join b", "from_a", "join a", "from_b"]
        );
    }

    #[test]
    fn test_unresolved_join_is_not_fatal() {
        let reduced = reduce_script("join missing;\nshow;", &NoResources);
        assert_eq!(reduced.statements, vec!["join missing", "show"]);
    }
}
