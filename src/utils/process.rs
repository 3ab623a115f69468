//! Process execution utilities
//!
//! Runs the external build tools synchronously; a stage only completes when
//! its process has exited.

use crate::error::{RecipeError, Result};
use std::process::{Command, Stdio};
use tracing::{debug, info, instrument};

/// Runs CMake and CTest on behalf of the build system driver
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    debug: bool,
}

/// Captured output of a finished tool invocation
#[derive(Debug)]
pub struct CapturedOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// First line of stdout, e.g. `cmake version 3.27.7`
    pub fn first_line(&self) -> &str {
        self.stdout.lines().next().unwrap_or_default().trim()
    }
}

fn render(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn spawn_error(cmd_str: &str, e: &std::io::Error) -> RecipeError {
    RecipeError::process(cmd_str, None, "", format!("could not start: {e}"))
}

impl ProcessRunner {
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Run a tool with extra environment variables, streaming its output
    #[instrument(skip(self, env_vars))]
    pub fn run_command_with_env(
        &self,
        program: &str,
        args: &[&str],
        env_vars: &[(String, String)],
    ) -> Result<()> {
        let cmd_str = render(program, args);

        if self.debug {
            debug!("Running: {}", cmd_str);
            if !env_vars.is_empty() {
                debug!("Environment: {:?}", env_vars);
            }
        } else {
            info!("+ {}", cmd_str);
        }

        let status = Command::new(program)
            .args(args)
            .envs(env_vars.iter().map(|(k, v)| (k, v)))
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(&cmd_str, &e))?;

        if !status.success() {
            let exit_code = status.code();
            return Err(RecipeError::process(
                cmd_str,
                exit_code,
                "",
                format!("exited with {exit_code:?}"),
            ));
        }

        Ok(())
    }

    /// Run a tool and capture stdout and stderr
    #[instrument(skip(self))]
    pub fn run_command_with_output(&self, program: &str, args: &[&str]) -> Result<CapturedOutput> {
        let cmd_str = render(program, args);

        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| spawn_error(&cmd_str, &e))?;

        let captured = CapturedOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            "{} exited with {:?} ({} bytes of stdout)",
            cmd_str,
            captured.exit_code,
            captured.stdout.len()
        );

        if !output.status.success() {
            return Err(RecipeError::process(
                cmd_str,
                captured.exit_code,
                captured.stdout,
                captured.stderr,
            ));
        }

        Ok(captured)
    }

    /// Check if a program is on PATH
    pub fn command_exists(&self, program: &str) -> bool {
        let found = Command::new("which")
            .arg(program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success());
        debug!("'{}' on PATH: {}", program, found);
        found
    }
}
