//! Typed invocation of external programs

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;
use tracing::debug;

/// Failure of an external tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found on PATH: {0}")]
    NotFound(String),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed with exit code {code}: {stderr}")]
    NonZeroExit {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("{program} did not produce {}", .path.display())]
    MissingOutput { program: String, path: PathBuf },

    #[error("Failed to parse tool output: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ToolResult<T> = Result<T, ToolError>;

/// One command line: program, arguments and the file it is expected to write
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
    output: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            output: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// File that must exist after a successful run
    pub fn expect_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Shell-like rendering for logs and error messages
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            line.push(' ');
            if arg.contains(char::is_whitespace) {
                line.push('"');
                line.push_str(&arg);
                line.push('"');
            } else {
                line.push_str(&arg);
            }
        }
        line
    }

    /// Run to completion. Non-zero exit and a missing expected output are errors.
    pub fn run(&self) -> ToolResult<Output> {
        debug!("Running {}", self.command_line());

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolError::NonZeroExit {
                program: self.program.clone(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if let Some(path) = &self.output {
            if !path.exists() {
                return Err(ToolError::MissingOutput {
                    program: self.program.clone(),
                    path: path.clone(),
                });
            }
        }

        Ok(output)
    }
}

/// Fail with `NotFound` unless `program` resolves on PATH
pub fn require_program(program: &str) -> ToolResult<PathBuf> {
    which::which(program).map_err(|_| ToolError::NotFound(program.to_string()))
}
