use std::{io, process::Command};

/// Captured output of one external tool invocation.
pub(crate) struct ToolOutput {
    pub(crate) exit_code: i32,
    pub(crate) stdout: Vec<u8>,
    pub(crate) stderr: Vec<u8>,
}

impl ToolOutput {
    /// This returns true if the tool exited with a zero exit code.
    pub(crate) fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs an external tool and captures its output. The production implementation spawns
/// a child process; tests substitute a fake which returns canned outputs.
pub(crate) trait ToolRunner: Send + Sync {
    fn run(&self, command: &str, args: &[String]) -> io::Result<ToolOutput>;
}

/// Spawns the tool as a child process and blocks until it exits.
#[derive(Default)]
pub(crate) struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, command: &str, args: &[String]) -> io::Result<ToolOutput> {
        let output = Command::new(command).args(args).output()?;
        Ok(ToolOutput {
            // A None exit code means the process was killed by a signal.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
