use crate::error::BlockplanError;
use block_external::exec;
use std::path::Path;

/// The four erase strengths a volume can be wiped at, plus the `none` spelling
/// accepted (and ignored) on a `disk`'s `wipe` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeMode {
    Superblock,
    Zero,
    Random,
    Pvremove,
}

impl WipeMode {
    /// Parses a `disk`/`partition`/`raid` record's raw `wipe` field. `None`
    /// and the literal string `"none"` both mean "do not wipe"; any other
    /// unrecognized string is a `ConfigError`.
    pub fn parse(id: &str, wipe: Option<&str>) -> Result<Option<WipeMode>, BlockplanError> {
        match wipe {
            None => Ok(None),
            Some("none") => Ok(None),
            Some("superblock") => Ok(Some(WipeMode::Superblock)),
            Some("zero") => Ok(Some(WipeMode::Zero)),
            Some("random") => Ok(Some(WipeMode::Random)),
            Some("pvremove") => Ok(Some(WipeMode::Pvremove)),
            Some(other) => Err(BlockplanError::Config {
                id: id.to_owned(),
                why: format!("wipe mode '{}' not supported", other),
            }),
        }
    }
}

/// Erases the content of `path` at the given strength. `dd`-based modes
/// tolerate exit code 1 (the kernel reports end-of-device once the write
/// runs off the end of the block device); `pvremove` additionally tolerates
/// `2` and `5` (no LVM label present).
pub fn wipe(path: &Path, mode: WipeMode) -> Result<(), BlockplanError> {
    info!("wiping {} with mode {:?}", path.display(), mode);

    match mode {
        WipeMode::Superblock => {
            exec("sgdisk", None, None, &["--zap-all".into(), path.into()])?;
            exec("wipefs", None, None, &["-a".into(), path.into()])?;
        }
        WipeMode::Zero => {
            exec(
                "dd",
                None,
                Some(&[1]),
                &["bs=512".into(), "if=/dev/zero".into(), format!("of={}", path.display()).into()],
            )?;
        }
        WipeMode::Random => {
            exec(
                "dd",
                None,
                Some(&[1]),
                &[
                    "bs=512".into(),
                    "if=/dev/urandom".into(),
                    format!("of={}", path.display()).into(),
                ],
            )?;
        }
        WipeMode::Pvremove => {
            exec(
                "pvremove",
                None,
                Some(&[1, 2, 5]),
                &["--force".into(), "--force".into(), "--yes".into(), path.into()],
            )?;
            // Refresh LVM's view of the system now that a PV disappeared.
            let _ = exec("pvscan", None, None, &["--cache".into()]);
            let _ = exec("vgscan", None, None, &["--mknodes".into(), "--cache".into()]);
        }
    }

    Ok(())
}
