// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Maps flags onto value sources and the template target

use anyhow::{bail, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::values::ValueSources;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sprig")]
#[command(about = "Render a Handlebars template against YAML values, --set overrides and the environment")]
#[command(disable_version_flag = true)]
pub struct Args {
    #[arg(
        value_name = "TEMPLATE",
        help = "Template file to render when standard input is not piped"
    )]
    pub targets: Vec<PathBuf>,

    #[arg(
        short = 'f',
        long = "values",
        value_delimiter = ',',
        help = "Specify values in a YAML file (can specify multiple, comma separated)"
    )]
    pub values: Vec<PathBuf>,

    #[arg(
        long = "set",
        help = "Set values on the command line (can specify multiple or separate values with commas: key1=val1,key2=val2)"
    )]
    pub set: Vec<String>,

    #[arg(long, help = "Pull template values from the environment")]
    pub env: bool,

    #[arg(long, help = "Print version and exit")]
    pub version: bool,

    #[arg(long, help = "Enable verbose output on stderr")]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The single template path, if one was given.
    pub fn target(&self) -> Result<Option<&Path>> {
        match self.targets.as_slice() {
            [] => Ok(None),
            [one] => Ok(Some(one.as_path())),
            _ => bail!("must provide only one file to template"),
        }
    }

    /// Value layers in command line order.
    pub fn value_sources(&self) -> ValueSources {
        ValueSources {
            files: self.values.clone(),
            overrides: self.set.clone(),
            include_env: self.env,
        }
    }
}
