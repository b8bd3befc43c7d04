use super::{exec, ToolError};
use std::{
    ffi::OsString,
    io::{self, Read},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// Creates a software RAID array at `raid_path` out of `devices`, at the given
/// RAID level. `spare_devices` trails `devices` and is passed to
/// `--spare-devices`, matching how `mdadm --create` distinguishes active
/// members from hot spares.
pub fn create(
    raid_path: &Path,
    level: u8,
    devices: &[&Path],
    spare_devices: usize,
) -> Result<(), ToolError> {
    info!("creating raid{} array at {}", level, raid_path.display());

    let mut args: Vec<OsString> = vec![
        "--create".into(),
        raid_path.into(),
        format!("--level={}", level).into(),
        format!("--raid-devices={}", devices.len() - spare_devices).into(),
    ];

    if spare_devices > 0 {
        args.push(format!("--spare-devices={}", spare_devices).into());
    }

    args.extend(devices.iter().map(|p| OsString::from(*p)));

    // mdadm prompts for confirmation when creating an array out of devices
    // that look like they might already hold a filesystem.
    exec("mdadm", Some(b"yes\n"), None, &args)
}

/// Stops an assembled array, releasing its member devices.
pub fn stop(raid_path: &Path) -> Result<(), ToolError> {
    info!("stopping raid array {}", raid_path.display());
    exec("mdadm", None, None, &["--stop".into(), raid_path.into()])
}

/// Removes a stopped array's superblock association from the kernel.
pub fn remove(raid_path: &Path) -> Result<(), ToolError> {
    info!("removing raid array {}", raid_path.display());
    exec("mdadm", None, None, &["--remove".into(), raid_path.into()])
}

/// Erases any MD superblock on `device`, so it can join a fresh array cleanly.
pub fn zero_superblock(device: &Path) -> Result<(), ToolError> {
    exec("mdadm", None, None, &["--zero-superblock".into(), device.into()])
}

/// Parses the `ARRAY <path> ...` lines of `mdadm --detail --scan` output,
/// returning the array device paths it names.
pub fn scan_array_names(scan_output: &str) -> Vec<PathBuf> {
    scan_output
        .lines()
        .filter_map(|line| line.strip_prefix("ARRAY "))
        .filter_map(|rest| rest.split_whitespace().next())
        .map(PathBuf::from)
        .collect()
}

/// Returns the raw `mdadm --detail --scan` output, suitable for writing
/// directly to `mdadm.conf`.
pub fn scan() -> io::Result<String> {
    let mut child = Command::new("mdadm")
        .arg("--detail")
        .arg("--scan")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let mut output = String::new();
    child.stdout.as_mut().expect("stdout not obtained").read_to_string(&mut output)?;
    child.wait()?;

    Ok(output)
}
