//! Invocation of the Effective T3 Java tool

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};
use thiserror::Error;
use tracing::{debug, info};

use crate::install::EffectiveT3Install;
use crate::request::InvocationRequest;

/// What the JVM writes first when the tool dies with an uncaught exception
const EXCEPTION_MARKER: &str = "Exception in thread";

const JAVA: &str = "java";

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Could not resolve absolute path for {}: {source}", .path.display())]
    AbsolutePath { path: PathBuf, source: io::Error },

    #[error("Error invoking command:\n{command}\n\n{source}\n")]
    Spawn { command: String, source: io::Error },

    #[error("Return code {} from command:\n{command}\n{detail}", exit_code(.status))]
    Failed {
        status: ExitStatus,
        command: String,
        detail: String,
    },

    #[error("No output file from Effective T3: {}", .0.display())]
    NoOutput(PathBuf),
}

/// Runs one prediction and returns the raw output file it produced
pub struct EffectiveT3Runner<'a> {
    install: &'a EffectiveT3Install,
    program: OsString,
}

impl<'a> EffectiveT3Runner<'a> {
    pub fn new(install: &'a EffectiveT3Install) -> Self {
        Self {
            install,
            program: OsString::from(JAVA),
        }
    }

    /// Build the argument vector passed to `java`.
    ///
    /// Paths are made absolute because the child runs from the install root.
    pub fn arguments(&self, request: &InvocationRequest) -> Result<Vec<OsString>, RunnerError> {
        let fasta = absolute(&request.input)?;
        let temp = absolute(&request.temp_output())?;

        Ok(vec![
            "-jar".into(),
            self.install.jar().as_os_str().to_owned(),
            "-f".into(),
            fasta.into_os_string(),
            "-m".into(),
            request.model.clone().into(),
            "-t".into(),
            request.threshold.to_string().into(),
            "-o".into(),
            temp.into_os_string(),
            "-q".into(),
        ])
    }

    /// Run the tool to completion and return the absolute temp output path
    pub fn run(&self, request: &InvocationRequest) -> Result<PathBuf, RunnerError> {
        let temp = absolute(&request.temp_output())?;
        let args = self.arguments(request)?;
        let command_line = render_command(&self.program, &args);

        info!(command = %command_line, cwd = %self.install.root().display(), "running Effective T3");

        // No shell, so killing this process also takes the JVM down with it
        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(self.install.root())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RunnerError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        debug!(status = %output.status, "Effective T3 finished");
        check_output(&output, command_line)?;

        if !temp.is_file() {
            return Err(RunnerError::NoOutput(temp));
        }

        Ok(temp)
    }
}

fn check_output(output: &Output, command: String) -> Result<(), RunnerError> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if output.status.success() && !stderr.starts_with(EXCEPTION_MARKER) {
        return Ok(());
    }

    let detail = if !stdout.is_empty() && !stderr.is_empty() {
        format!("\n{stdout}\n\n{stderr}")
    } else {
        stderr.into_owned()
    };

    Err(RunnerError::Failed {
        status: output.status,
        command,
        detail,
    })
}

fn exit_code(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => code.to_string(),
        None => status.to_string(),
    }
}

fn absolute(path: &Path) -> Result<PathBuf, RunnerError> {
    std::path::absolute(path).map_err(|source| RunnerError::AbsolutePath {
        path: path.to_path_buf(),
        source,
    })
}

/// Space-joined for messages only; arguments are not quoted
fn render_command(program: &OsString, args: &[OsString]) -> String {
    std::iter::once(program)
        .chain(args)
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
