// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides temp directories with value files and templates plus a binary runner

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    pub fn create_values_file(&self, name: &str, yaml: &str) -> PathBuf {
        self.write_file(&format!("{}.yaml", name), yaml)
    }

    pub fn create_template_file(&self, name: &str, text: &str) -> PathBuf {
        self.write_file(&format!("{}.tpl", name), text)
    }
}

/// A `sprig` invocation with a scrubbed environment.
pub struct SprigCommand {
    command: Command,
    stdin: Option<String>,
}

impl SprigCommand {
    pub fn new() -> Self {
        let mut command = Command::new(env!("CARGO_BIN_EXE_sprig"));
        command
            .env_remove("RUST_LOG")
            .env_remove("SPRIG_CONFIG")
            .env_remove("SPRIG_LOG_LEVEL")
            .env_remove("SPRIG_LOG_FORMAT");
        Self {
            command,
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<std::ffi::OsStr>) -> Self {
        self.command.arg(arg);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.command.env(key, value);
        self
    }

    pub fn pipe(mut self, text: &str) -> Self {
        self.stdin = Some(text.to_string());
        self
    }

    pub fn output(mut self) -> Output {
        match self.stdin {
            Some(text) => {
                let mut child = self
                    .command
                    .stdin(Stdio::piped())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .spawn()
                    .expect("Failed to spawn sprig");
                // The child may exit (e.g. on an early error) before reading
                // stdin; a broken pipe then is expected, not a harness failure.
                if let Err(e) = child
                    .stdin
                    .take()
                    .expect("stdin is piped")
                    .write_all(text.as_bytes())
                {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        panic!("Failed to write stdin: {e:?}");
                    }
                }
                child.wait_with_output().expect("Failed to wait for sprig")
            }
            // /dev/null is a character device, so it never counts as piped input
            None => self
                .command
                .stdin(Stdio::null())
                .output()
                .expect("Failed to execute sprig"),
        }
    }
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
