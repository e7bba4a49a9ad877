// ABOUTME: Layered value resolution: values files, then --set overrides, then environment
// ABOUTME: Produces the single mapping handed to the template renderer

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::env::{collect_environment, EnvSource, StdEnv};
use super::error::{FragmentError, Result, ValuesError};
use super::merge::merge_values;
use super::overrides::apply_override;
use super::value::{parse_document, Mapping};

/// Everything the user asked to be layered, in the order given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ValueSources {
    pub files: Vec<PathBuf>,
    pub overrides: Vec<String>,
    pub include_env: bool,
}

impl ValueSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn with_override(mut self, value: impl Into<String>) -> Self {
        self.overrides.push(value.into());
        self
    }

    pub fn with_env(mut self, include: bool) -> Self {
        self.include_env = include;
        self
    }
}

pub struct Resolver<E: EnvSource = StdEnv> {
    env: E,
}

impl Resolver<StdEnv> {
    /// Resolver that reads the real process environment when asked to.
    pub fn new() -> Self {
        Self { env: StdEnv }
    }
}

impl Default for Resolver<StdEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EnvSource> Resolver<E> {
    pub fn with_env_source(env: E) -> Self {
        Self { env }
    }

    /// Merge all layers with precedence files < overrides < environment.
    ///
    /// Stops at the first failure; no partial mapping is returned.
    pub fn resolve(&self, sources: &ValueSources) -> Result<Mapping> {
        let mut values = Mapping::new();

        for path in &sources.files {
            let fragment = load_file_fragment(path)?;
            debug!(
                "Merging values file {} ({} top-level keys)",
                path.display(),
                fragment.len()
            );
            values = merge_values(values, fragment);
        }

        for input in &sources.overrides {
            debug!("Applying override: {}", input);
            apply_override(&mut values, input).map_err(|source| ValuesError::Override {
                input: input.clone(),
                source,
            })?;
        }

        if sources.include_env {
            let env = collect_environment(&self.env);
            debug!("Merging {} environment variables", env.len());
            values = merge_values(values, env);
        }

        Ok(values)
    }
}

/// Read and parse one values file.
pub fn load_file_fragment(path: &Path) -> Result<Mapping> {
    read_fragment(path).map_err(|cause| ValuesError::Parse {
        path: path.to_path_buf(),
        cause,
    })
}

fn read_fragment(path: &Path) -> std::result::Result<Mapping, FragmentError> {
    let text = fs::read_to_string(path)?;
    parse_document(&text)
}
