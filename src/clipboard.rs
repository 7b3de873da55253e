/*!
 * Clipboard delivery of a bundle
 *
 * The bundle is piped to the first platform clipboard command that is
 * installed. Candidates are ordered by preference for the current session.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No clipboard command is installed
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// A clipboard command reading the text on stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

const TMUX: ClipboardCommand = ClipboardCommand {
    program: "tmux",
    args: &["load-buffer", "-w", "-"],
};
const WAYLAND: ClipboardCommand = ClipboardCommand {
    program: "wl-copy",
    args: &[],
};
const XSEL: ClipboardCommand = ClipboardCommand {
    program: "xsel",
    args: &["-b", "-i"],
};
const XCLIP: ClipboardCommand = ClipboardCommand {
    program: "xclip",
    args: &["-selection", "clipboard", "-in"],
};
const MACOS: ClipboardCommand = ClipboardCommand {
    program: "pbcopy",
    args: &[],
};
const WINDOWS: ClipboardCommand = ClipboardCommand {
    program: "clip.exe",
    args: &[],
};
const TERMUX: ClipboardCommand = ClipboardCommand {
    program: "termux-clipboard-set",
    args: &[],
};

impl ClipboardCommand {
    /// Pipe `text` into the command
    pub fn copy(&self, text: &str) -> Result<()> {
        let mut child = Command::new(self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed(format!(
                "{} exited with status: {}",
                self.program, status
            )))
        }
    }
}

/// Clipboard commands worth trying on this platform, most preferred first
pub fn candidates() -> Vec<ClipboardCommand> {
    let mut commands = Vec::new();

    if env::var_os("TMUX").is_some() {
        commands.push(TMUX);
    }

    if cfg!(target_os = "macos") {
        commands.push(MACOS);
    } else if cfg!(target_os = "windows") || env::var_os("WSL_DISTRO_NAME").is_some() {
        commands.push(WINDOWS);
    } else if cfg!(target_os = "android") {
        commands.push(TERMUX);
    } else {
        if env::var_os("WAYLAND_DISPLAY").is_some() {
            commands.push(WAYLAND);
        }
        commands.extend([XSEL, XCLIP, TERMUX]);
    }

    commands
}

/// Copy text with the first installed clipboard command
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut last_error = None;

    for command in candidates()
        .into_iter()
        .filter(|c| command_exists(c.program))
    {
        match command.copy(text) {
            Ok(()) => {
                log::info!("Copied {} bytes with {}", text.len(), command.program);
                return Ok(());
            }
            Err(e) => {
                log::warn!("Clipboard command {} failed: {}", command.program, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(ClipboardError::NoClipboardFound))
}

/// Check whether `command` is an executable on `PATH`
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| is_executable(&dir.join(command))))
        .unwrap_or(false)
}

fn is_executable(path: &Path) -> bool {
    path.is_file()
}
