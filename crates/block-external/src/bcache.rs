use super::{exec, ToolError};
use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
    process::{Command, Stdio},
};

/// Loads the bcache kernel module. Installing `bcache-tools` does not load it
/// automatically, matching the original provisioner's own `modprobe bcache`
/// step before touching any bcache device.
pub fn modprobe_bcache() -> Result<(), ToolError> {
    exec("modprobe", None, None, &["bcache".into()])
}

/// Unloads the bcache kernel module, so a fresh `modprobe bcache` afterward
/// starts from a clean slate while wiping a disk that held bcache devices.
pub fn modprobe_remove_bcache() -> Result<(), ToolError> {
    exec("modprobe", None, None, &["-r".into(), "bcache".into()])
}

/// Reads `bcache-super-show`'s `cset.uuid` field off a partition carrying a
/// bcache superblock, returning `None` if the tool fails or reports no
/// superblock at all.
pub fn super_show_cset_uuid(device: &Path) -> Option<String> {
    let output = Command::new("bcache-super-show")
        .arg(device)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout).lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next() == Some("cset.uuid") {
            fields.next().map(str::to_owned)
        } else {
            None
        }
    })
}

/// Stops the bcache cache set identified by `uuid`, releasing its backing
/// devices, by writing `1` to its sysfs `stop` file.
pub fn stop_cache_set(uuid: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).open(format!("/sys/fs/bcache/{}/stop", uuid))?;
    file.write_all(b"1")
}

/// Formats `backing` and `cache` as a bcache pair with `make-bcache`. When both
/// devices are given together bcache attaches the cache automatically.
pub fn make_bcache(backing: &Path, cache: &Path) -> Result<(), ToolError> {
    exec(
        "make-bcache",
        None,
        None,
        &["-B".into(), backing.into(), "-C".into(), cache.into()],
    )
}

/// Registers a device with the running bcache driver by writing its path to
/// `/sys/fs/bcache/register`. Older `bcache-tools` versions need this nudge
/// after `make-bcache`; newer ones register the device automatically.
pub fn register(device: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).open("/sys/fs/bcache/register")?;
    file.write_all(device.as_os_str().to_str().expect("non-utf8 device path").as_bytes())
}
