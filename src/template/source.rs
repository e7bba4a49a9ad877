// ABOUTME: Template source selection between piped standard input and a named file
// ABOUTME: The stdin probe is a trait so selection can be tested without real descriptors

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::error::{Result, TemplateError};

/// Where template text can come from besides a file.
pub trait TemplateInput {
    /// True when input is redirected or piped rather than an interactive device.
    fn is_piped(&self) -> bool;

    /// Read the whole input.
    fn read_all(&mut self) -> io::Result<String>;
}

/// Process standard input.
#[derive(Debug, Default)]
pub struct Stdin;

impl TemplateInput for Stdin {
    fn is_piped(&self) -> bool {
        match stdin_is_char_device() {
            Ok(is_char_device) => !is_char_device,
            Err(e) => {
                warn!("Could not inspect standard input, ignoring it: {}", e);
                false
            }
        }
    }

    fn read_all(&mut self) -> io::Result<String> {
        let mut text = String::new();
        io::stdin().lock().read_to_string(&mut text)?;
        Ok(text)
    }
}

#[cfg(unix)]
fn stdin_is_char_device() -> io::Result<bool> {
    use std::os::fd::AsFd;
    use std::os::unix::fs::FileTypeExt;

    let fd = io::stdin().as_fd().try_clone_to_owned()?;
    let metadata = fs::File::from(fd).metadata()?;
    Ok(metadata.file_type().is_char_device())
}

#[cfg(not(unix))]
fn stdin_is_char_device() -> io::Result<bool> {
    use std::io::IsTerminal;

    Ok(io::stdin().is_terminal())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    Stdin,
    File(PathBuf),
}

/// Template text together with where it was read from.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub origin: SourceOrigin,
    pub text: String,
}

impl TemplateSource {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            origin: SourceOrigin::Stdin,
            text: text.into(),
        }
    }
}

/// Pick the template: piped input wins, otherwise `explicit` must name a readable file.
pub fn select_source(
    input: &mut dyn TemplateInput,
    explicit: Option<&Path>,
) -> Result<TemplateSource> {
    if input.is_piped() {
        if let Some(path) = explicit {
            debug!("Input is piped; ignoring template path {}", path.display());
        }
        let text = input.read_all().map_err(TemplateError::Stdin)?;
        return Ok(TemplateSource {
            origin: SourceOrigin::Stdin,
            text,
        });
    }

    let path = explicit
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(TemplateError::MissingTarget)?;
    debug!("Reading template from {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| TemplateError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(TemplateSource {
        origin: SourceOrigin::File(path.to_path_buf()),
        text,
    })
}
