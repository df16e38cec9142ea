//! # Remote Shell Target
//!
//! Reads and writes page ranges on another host by running `dd` through a
//! shell command template such as `ssh {host}`. The remote command is passed
//! as the last argument, so the template must end with something that runs
//! its final argument through `sh` (ssh does; `sh -c` does locally).
//!
//! Remote semantics match the local target:
//! - reading a missing file yields no bytes and succeeds
//! - writing never creates or truncates the destination file

use std::fmt;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use super::errors::{TargetError, TargetResult};
use super::PageTarget;
use crate::page::{PageBuffer, PAGE_SIZE};

/// Placeholder replaced by the target host in a shell template.
pub const HOST_PLACEHOLDER: &str = "{host}";

/// Default remote shell template.
pub const DEFAULT_REMOTE_SHELL: &str = "ssh {host}";

/// A whitespace-separated command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellTemplate {
    program: String,
    args: Vec<String>,
}

impl ShellTemplate {
    /// Parse a template; `None` if it has no program.
    pub fn parse(template: &str) -> Option<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Build the command for `host`, with `remote_command` as final argument.
    fn command(&self, host: &str, remote_command: &str) -> Command {
        let mut command = Command::new(self.program.replace(HOST_PLACEHOLDER, host));
        for arg in &self.args {
            command.arg(arg.replace(HOST_PLACEHOLDER, host));
        }
        command.arg(remote_command);
        command
    }
}

impl Default for ShellTemplate {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            args: vec![HOST_PLACEHOLDER.to_string()],
        }
    }
}

impl fmt::Display for ShellTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Quote `s` for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn read_command(path: &str, offset_in_pages: u64) -> String {
    let path = shell_quote(path);
    format!(
        "if [ -e {path} ]; then dd if={path} bs={bs} skip={skip} count=1; fi",
        path = path,
        bs = PAGE_SIZE,
        skip = offset_in_pages
    )
}

fn write_command(path: &str, offset_in_pages: u64) -> String {
    let path = shell_quote(path);
    format!(
        "if [ ! -f {path} ]; then echo {path}: no such file >&2; exit 1; fi; dd of={path} bs={bs} seek={seek} conv=notrunc",
        path = path,
        bs = PAGE_SIZE,
        seek = offset_in_pages
    )
}

fn create_command(path: &str) -> String {
    format!("cat > {}", shell_quote(path))
}

fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("remote command exited with {}", output.status)
    } else {
        format!("remote command exited with {}: {}", output.status, stderr)
    }
}

/// Page access on a remote host through a shell command.
#[derive(Debug, Clone)]
pub struct RemoteShellTarget {
    host: String,
    shell: ShellTemplate,
}

impl RemoteShellTarget {
    pub fn new(host: impl Into<String>, shell: ShellTemplate) -> Self {
        Self {
            host: host.into(),
            shell,
        }
    }

    fn run_with_input(&self, remote_command: &str, input: &[u8]) -> std::io::Result<Output> {
        let mut child = self
            .shell
            .command(&self.host, remote_command)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // An early exit closes the pipe; the exit status carries the reason.
            if let Err(e) = stdin.write_all(input) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e);
                }
            }
        }
        child.wait_with_output()
    }

    fn send(&self, path: &str, remote_command: &str, input: &[u8]) -> TargetResult<()> {
        let output = self
            .run_with_input(remote_command, input)
            .map_err(|e| TargetError::write(self.describe(path), e))?;

        if !output.status.success() {
            return Err(TargetError::write(self.describe(path), failure_reason(&output)));
        }
        Ok(())
    }

    fn describe(&self, path: &str) -> String {
        format!("{}:{}", self.host, path)
    }
}

impl PageTarget for RemoteShellTarget {
    fn read_range(&self, path: &str, offset_in_pages: u64) -> TargetResult<PageBuffer> {
        let output = self
            .shell
            .command(&self.host, &read_command(path, offset_in_pages))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| TargetError::read(self.describe(path), e))?;

        if !output.status.success() {
            return Err(TargetError::read(self.describe(path), failure_reason(&output)));
        }

        Ok(output.stdout)
    }

    fn write_range(&self, path: &str, offset_in_pages: u64, buffer: &[u8]) -> TargetResult<()> {
        self.send(path, &write_command(path, offset_in_pages), buffer)
    }

    fn write_file(&self, path: &str, buffer: &[u8]) -> TargetResult<()> {
        self.send(path, &create_command(path), buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parse() {
        let t = ShellTemplate::parse("ssh -o BatchMode=yes {host}").unwrap();
        assert_eq!(t.program, "ssh");
        assert_eq!(t.args, vec!["-o", "BatchMode=yes", "{host}"]);
        assert!(ShellTemplate::parse("   ").is_none());
    }

    #[test]
    fn test_default_template() {
        assert_eq!(ShellTemplate::parse(DEFAULT_REMOTE_SHELL), Some(ShellTemplate::default()));
    }

    #[test]
    fn test_template_display_normalizes_spacing() {
        let t = ShellTemplate::parse("  ssh   -p 2222 {host} ").unwrap();
        assert_eq!(t.to_string(), "ssh -p 2222 {host}");
        assert_eq!(ShellTemplate::default().to_string(), DEFAULT_REMOTE_SHELL);
    }

    #[test]
    fn test_host_substitution() {
        let t = ShellTemplate::parse("ssh -l postgres {host}").unwrap();
        let cmd = t.command("db2", "true");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(cmd.get_program(), "ssh");
        assert_eq!(args, vec!["-l", "postgres", "db2", "true"]);
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/data/base/1"), "'/data/base/1'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_read_command_shape() {
        let cmd = read_command("/d/rel.1", 3);
        assert!(cmd.contains("[ -e '/d/rel.1' ]"));
        assert!(cmd.contains("bs=8192"));
        assert!(cmd.contains("skip=3"));
        assert!(cmd.contains("count=1"));
    }

    #[test]
    fn test_write_command_never_truncates() {
        let cmd = write_command("/d/rel", 7);
        assert!(cmd.contains("conv=notrunc"));
        assert!(cmd.contains("seek=7"));
        assert!(cmd.contains("[ ! -f '/d/rel' ]"));
    }
}
