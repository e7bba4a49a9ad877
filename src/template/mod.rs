// ABOUTME: Template module for the sprig CLI
// ABOUTME: Source selection, strict Handlebars compilation and streamed rendering

pub mod engine;
pub mod error;
pub mod helpers;
pub mod source;

pub use engine::{render_source, CompiledTemplate, TemplateEngine};
pub use error::{Result, TemplateError};
pub use source::{select_source, SourceOrigin, Stdin, TemplateInput, TemplateSource};
