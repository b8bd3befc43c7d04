use crate::error::BlockplanError;
use block_external::exec;
use std::{
    path::Path,
    thread,
    time::Duration,
};

const SETTLE_ATTEMPTS: u32 = 10;

/// Nudges the kernel to re-read partition tables and wait for device nodes
/// to settle, then polls for `path` to materialize. `partprobe` failures are
/// tolerated (the device may predate any partition table change, e.g. a
/// freshly-opened LUKS mapping), but `udevadm settle` and the appearance
/// poll are not.
pub fn sync(path: &Path) -> Result<(), BlockplanError> {
    if let Err(why) = exec("partprobe", None, None, &[path.into()]) {
        debug!("partprobe on {} failed (ignored): {}", path.display(), why);
    }

    exec("udevadm", None, None, &["settle".into()])?;

    for attempt in 0..SETTLE_ATTEMPTS {
        if path.exists() {
            return Ok(());
        }

        debug!("waiting on device path: {} (attempt {})", path.display(), attempt + 1);
        thread::sleep(Duration::from_secs(1));
    }

    Err(BlockplanError::DeviceNotAppearing { path: path.to_path_buf() })
}
