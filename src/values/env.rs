// ABOUTME: Environment variable sources for the highest-precedence value layer
// ABOUTME: Abstracts the process environment so resolution can be tested without touching it

use std::collections::BTreeMap;

use super::value::{Mapping, Value};

/// A source of environment variables.
pub trait EnvSource {
    /// Every variable as a `(name, value)` pair.
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        // vars_os so a single non-UTF-8 variable cannot abort the run
        Box::new(std::env::vars_os().map(|(name, value)| {
            (
                name.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        }))
    }
}

/// Environment backed by a map, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

/// Flatten an environment into one string entry per variable. Names are not split on dots.
pub fn collect_environment(env: &dyn EnvSource) -> Mapping {
    env.vars()
        .map(|(name, value)| (name, Value::from(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_is_flat() {
        let env = MapEnv::new()
            .with("HOME", "/home/test")
            .with("app.port", "8080");

        let map = collect_environment(&env);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("HOME"), Some(&Value::from("/home/test")));
        // dotted names stay literal keys and values stay strings
        assert_eq!(map.get("app.port"), Some(&Value::from("8080")));
    }

    #[test]
    fn test_empty_environment() {
        assert!(collect_environment(&MapEnv::new()).is_empty());
    }

    #[test]
    fn test_std_env_sees_process_variables() {
        std::env::set_var("SPRIG_ENV_SOURCE_TEST", "present");
        let map = collect_environment(&StdEnv);
        assert_eq!(
            map.get("SPRIG_ENV_SOURCE_TEST"),
            Some(&Value::from("present"))
        );
    }

    #[test]
    fn test_from_iterator() {
        let env: MapEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(collect_environment(&env).len(), 2);
    }
}
