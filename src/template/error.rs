// ABOUTME: Error types for template selection, compilation and rendering
// ABOUTME: Separates missing keys from other render failures

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("must provide a file to template")]
    MissingTarget,

    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not read input: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("could not parse template: {0}")]
    Compile(#[from] handlebars::TemplateError),

    #[error("missing value for key {key:?} in template")]
    MissingKey { key: String },

    #[error("could not render template: {0}")]
    Render(handlebars::RenderError),
}

impl From<handlebars::RenderError> for TemplateError {
    fn from(err: handlebars::RenderError) -> Self {
        match err.reason() {
            handlebars::RenderErrorReason::MissingVariable(key) => TemplateError::MissingKey {
                key: key.clone().unwrap_or_default(),
            },
            _ => TemplateError::Render(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
