use log::{debug, info};
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("nothing to launch")]
    Empty,
    #[error("failed to spawn '{command}': {source}")]
    Spawn { command: String, source: io::Error },
}

/// Characters that need `sh` to interpret the command line.
const SHELL_CHARS: &[char] = &[
    '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', '*', '?', '[', '#', '~', '\n',
];

/// Starts `command` in its own session and returns without waiting for it.
///
/// Plain `program args...` lines are executed directly, so a missing program
/// is reported as `LaunchError::Spawn`. Anything needing the shell goes
/// through `sh -c`, whose stderr stays attached to ours.
pub fn dispatch(command: &str) -> Result<(), LaunchError> {
    let command = command.trim();
    if command.is_empty() {
        return Err(LaunchError::Empty);
    }

    let mut cmd = if needs_shell(command) {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    } else {
        let mut parts = command.split_whitespace();
        let mut cmd = Command::new(parts.next().unwrap_or_default());
        cmd.args(parts);
        cmd
    };
    cmd.stdin(Stdio::null()).stdout(Stdio::null());

    // SAFETY: setsid(2) is async-signal-safe and touches no parent state.
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::setsid()
                .map(|_| ())
                .map_err(io::Error::from)
        });
    }

    let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        command: command.to_string(),
        source,
    })?;

    info!("Launched '{}'", command);
    debug!("Launched pid {}", child.id());
    Ok(())
}

fn needs_shell(command: &str) -> bool {
    if command.contains(SHELL_CHARS) {
        return true;
    }
    // Leading `VAR=value` assignments are a shell feature too.
    command.split_whitespace().next().is_some_and(|first| first.contains('='))
}
