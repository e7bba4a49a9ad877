// ABOUTME: Value resolution module for the sprig template CLI
// ABOUTME: Builds one mapping from values files, --set overrides and the environment

pub mod env;
pub mod error;
pub mod merge;
pub mod overrides;
pub mod resolver;
pub mod value;

pub use env::{collect_environment, EnvSource, MapEnv, StdEnv};
pub use error::{FragmentError, OverrideError, Result, ValuesError};
pub use merge::merge_values;
pub use overrides::apply_override;
pub use resolver::{load_file_fragment, Resolver, ValueSources};
pub use value::{lookup, parse_document, Mapping, Scalar, Value};
