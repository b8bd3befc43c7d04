use super::{exec, ToolError};
use std::path::Path;

/// Erase all signatures on a disk.
pub fn wipefs<P: AsRef<Path>>(device: P) -> Result<(), ToolError> {
    info!("using wipefs to wipe signatures from {:?}", device.as_ref());
    exec("wipefs", None, None, &["-a".into(), device.as_ref().into()])
}
