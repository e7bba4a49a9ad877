// ABOUTME: Main library module for the sprig template renderer
// ABOUTME: Exports value resolution, template rendering and the CLI application

pub mod cli;
pub mod template;
pub mod values;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use template::{CompiledTemplate, TemplateEngine, TemplateError, TemplateSource};
pub use values::{Mapping, Resolver, Scalar, Value, ValueSources, ValuesError};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
