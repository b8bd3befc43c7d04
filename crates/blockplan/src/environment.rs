use std::path::PathBuf;

/// The ambient context every handler runs against: where the target system
/// root lives, and where (if anywhere) its `/etc/fstab` should receive new
/// entries. Constructed once by the `cli` binary from its JSON document and
/// threaded through the executor.
#[derive(Debug, Clone)]
pub struct Environment {
    pub target: PathBuf,
    pub fstab: Option<PathBuf>,
}

impl Environment {
    pub fn new(target: PathBuf, fstab: Option<PathBuf>) -> Environment { Environment { target, fstab } }
}
