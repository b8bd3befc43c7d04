//! Writers for the recovery metadata the installed system needs at boot to
//! reassemble a storage topology: `fstab`, `crypttab` and `mdadm.conf`.
//!
//! All three live next to a single fstab path handed in by the environment.
//! If that path is absent, every write is a documented no-op rather than an
//! error, matching the "fstab not in environment, so not writing" behavior of
//! the original provisioner this crate's callers generalize.

#[macro_use]
extern crate log;

use partition_identity::PartitionID;
use std::{
    ffi::OsString,
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Where a mount's `fstab` line should point: a resolved device node, or a
/// `UUID=` reference for entities whose node can be recreated at a different
/// path across boots (partitions, LUKS mappings).
#[derive(Debug, Clone, PartialEq)]
pub enum FstabLocation {
    Path(PathBuf),
    Uuid(String),
}

impl FstabLocation {
    fn render(&self) -> OsString {
        match self {
            FstabLocation::Path(path) => path.as_os_str().to_owned(),
            FstabLocation::Uuid(uuid) => OsString::from(format!("UUID={}", uuid)),
        }
    }
}

/// One fully-computed fstab row, ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct FstabEntry {
    pub location: FstabLocation,
    /// Mount path, without the leading `/`; `None` for swap.
    pub path: Option<String>,
    pub fstype: String,
}

impl FstabEntry {
    /// Builds the line exactly as spec'd: `location path fstype options 0 0`,
    /// with `fat*` filesystems collapsed to `vfat` and swap entries using
    /// `none`/`sw` in place of a mount path/`defaults`.
    pub fn render(&self) -> String {
        let location = self.location.render();
        let is_swap = self.fstype == "swap";

        let path = if is_swap {
            "none".to_owned()
        } else {
            format!("/{}", self.path.as_deref().unwrap_or(""))
        };

        let fstype = normalize_fstype(&self.fstype);
        let options = if is_swap { "sw" } else { "defaults" };

        format!("{} {} {} {} 0 0\n", location.to_string_lossy(), path, fstype, options)
    }
}

/// Collapses any `fat12`/`fat16`/`fat32`/`fat`/`fat64` spelling to the kernel's
/// `vfat` driver name; every other fstype passes through unchanged.
pub fn normalize_fstype(fstype: &str) -> &str {
    if fstype.starts_with("fat") {
        "vfat"
    } else {
        fstype
    }
}

/// Looks up the filesystem UUID of a block device via `blkid`, as used for
/// `UUID=` fstab/crypttab locations.
pub fn uuid_of(path: &Path) -> Option<String> { PartitionID::get_uuid(path).map(|id| id.id) }

/// Threaded through the executor so every handler writes side files next to
/// the same fstab path without re-deriving the directory each time.
#[derive(Debug, Clone)]
pub struct SideFiles {
    fstab: Option<PathBuf>,
}

impl SideFiles {
    pub fn new(fstab: Option<PathBuf>) -> Self { SideFiles { fstab } }

    fn sibling(&self, name: &str) -> Option<PathBuf> {
        self.fstab.as_ref().map(|fstab| match fstab.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        })
    }

    /// Appends one line to `fstab`. No-op (with an informational log) if no
    /// fstab path was configured.
    pub fn write_fstab_line(&self, entry: &FstabEntry) -> io::Result<()> {
        match &self.fstab {
            Some(fstab) => append(fstab, &entry.render()),
            None => {
                info!("fstab not in environment, so not writing");
                Ok(())
            }
        }
    }

    /// Appends one line to `crypttab`, which lives beside `fstab`.
    pub fn write_crypttab_line(&self, dm_name: &str, backing_uuid: &str) -> io::Result<()> {
        match self.sibling("crypttab") {
            Some(crypttab) => {
                append(&crypttab, &format!("{} UUID={} none luks\n", dm_name, backing_uuid))
            }
            None => {
                info!(
                    "fstab configuration is not present in environment, so cannot locate an \
                     appropriate directory to write crypttab in, so not writing crypttab"
                );
                Ok(())
            }
        }
    }

    /// Truncate-writes `mdadm.conf` beside `fstab` with the raw
    /// `mdadm --detail --scan` output.
    pub fn write_mdadm_conf(&self, scan_output: &str) -> io::Result<()> {
        match self.sibling("mdadm.conf") {
            Some(mdadm_conf) => {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&mdadm_conf)?
                    .write_all(scan_output.as_bytes())
            }
            None => {
                info!(
                    "fstab configuration is not present in the environment, so cannot locate an \
                     appropriate directory to write mdadm.conf in, so not writing mdadm.conf"
                );
                Ok(())
            }
        }
    }
}

fn append(path: &Path, line: &str) -> io::Result<()> {
    OpenOptions::new().append(true).create(true).open(path)?.write_all(line.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fstab_uuid_root() {
        let entry = FstabEntry {
            location: FstabLocation::Uuid("abcd-1234".into()),
            path: Some("".into()),
            fstype: "ext4".into(),
        };
        assert_eq!(entry.render(), "UUID=abcd-1234 / ext4 defaults 0 0\n");
    }

    #[test]
    fn fstab_boot_partition() {
        let entry = FstabEntry {
            location: FstabLocation::Uuid("abcd-1234".into()),
            path: Some("boot".into()),
            fstype: "ext4".into(),
        };
        assert_eq!(entry.render(), "UUID=abcd-1234 /boot ext4 defaults 0 0\n");
    }

    #[test]
    fn fstab_swap_has_none_path_and_sw_options() {
        let entry = FstabEntry {
            location: FstabLocation::Uuid("swap-uuid".into()),
            path: None,
            fstype: "swap".into(),
        };
        assert_eq!(entry.render(), "UUID=swap-uuid none swap sw 0 0\n");
    }

    #[test]
    fn fstab_lvm_uses_resolved_path_not_uuid() {
        let entry = FstabEntry {
            location: FstabLocation::Path("/dev/vg0/lv_root".into()),
            path: Some("".into()),
            fstype: "ext4".into(),
        };
        assert_eq!(entry.render(), "/dev/vg0/lv_root / ext4 defaults 0 0\n");
    }

    #[test]
    fn fat_variants_collapse_to_vfat() {
        for variant in &["fat", "fat12", "fat16", "fat32", "fat64"] {
            assert_eq!(normalize_fstype(variant), "vfat");
        }
        assert_eq!(normalize_fstype("ext4"), "ext4");
    }

    #[test]
    fn sibling_none_when_no_fstab() {
        let side = SideFiles::new(None);
        assert_eq!(side.sibling("crypttab"), None);
    }

    #[test]
    fn sibling_joins_fstab_directory() {
        let side = SideFiles::new(Some(PathBuf::from("/target/etc/fstab")));
        assert_eq!(side.sibling("crypttab"), Some(PathBuf::from("/target/etc/crypttab")));
        assert_eq!(side.sibling("mdadm.conf"), Some(PathBuf::from("/target/etc/mdadm.conf")));
    }
}
