//! Subprocess wrappers for the external tools the storage graph executor shells
//! out to: `wipefs`/`dd`/`sgdisk` for wiping, `mkfs.*`/`mkswap` for formatting,
//! LVM's `pv*`/`vg*`/`lv*` tools, `cryptsetup` for LUKS, `mdadm` for software
//! RAID, and `make-bcache`/sysfs for bcache.

#[macro_use]
extern crate log;

pub mod bcache;
pub mod block;
pub mod luks;
pub mod lvm;
pub mod mdadm;

pub use self::{bcache::*, block::*, luks::*, lvm::*, mdadm::*};

use std::{
    ffi::OsString,
    fmt, io,
    process::{Command, Stdio},
};

/// A subprocess returned an exit code that was not in the command's allow-list.
#[derive(Debug)]
pub struct ToolError {
    pub cmd: String,
    pub code: Option<i32>,
    pub stderr: String,
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "`{}` failed", self.cmd)?;
        match self.code {
            Some(code) => write!(f, " with exit code {}", code)?,
            None => write!(f, " (terminated by signal)")?,
        }
        if !self.stderr.is_empty() {
            write!(f, ": {}", self.stderr.trim())?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

impl From<ToolError> for io::Error {
    fn from(why: ToolError) -> io::Error { io::Error::new(io::ErrorKind::Other, why.to_string()) }
}

fn render(cmd: &str, args: &[OsString]) -> String {
    let mut rendered = cmd.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}

/// Runs `cmd` with `args`, optionally piping `stdin` to it, and succeeds if the
/// exit code is `0` or is contained in `valid_codes`. Captures stderr so that a
/// failure carries useful context without requiring callers to capture output
/// themselves.
pub fn exec(
    cmd: &str,
    stdin: Option<&[u8]>,
    valid_codes: Option<&[i32]>,
    args: &[OsString],
) -> Result<(), ToolError> {
    info!("executing {} with {:?}", cmd, args);

    let spawn = || -> io::Result<_> {
        Command::new(cmd)
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
    };

    let mut child = spawn().map_err(|why| ToolError {
        cmd: render(cmd, args),
        code: None,
        stderr: why.to_string(),
    })?;

    if let Some(stdin) = stdin {
        use std::io::Write;
        let _ = child.stdin.as_mut().expect("stdin not obtained").write_all(stdin);
    }

    let output = child.wait_with_output().map_err(|why| ToolError {
        cmd: render(cmd, args),
        code: None,
        stderr: why.to_string(),
    })?;

    let success = output.status.success()
        || valid_codes.map_or(false, |codes| {
            output.status.code().map_or(false, |code| codes.contains(&code))
        });

    if success {
        Ok(())
    } else {
        Err(ToolError {
            cmd: render(cmd, args),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs `command` through `sh -c`, for the one case (RAID creation) that needs
/// a piped `yes` to auto-confirm `mdadm --create`.
pub fn exec_shell(command: &str) -> Result<(), ToolError> {
    info!("executing via shell: {}", command);

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|why| ToolError { cmd: command.to_string(), code: None, stderr: why.to_string() })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ToolError {
            cmd: command.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn mebibytes(bytes: u64) -> String { format!("{}", bytes / (1024 * 1024)) }
