use std::{io, path::PathBuf};

/// Failures that can occur before the executor ever sees a well-formed
/// config: reading the document off disk, and parsing its JSON into
/// entities. Distinct from `blockplan::BlockplanError::Config`, which
/// reports on an already-parsed entity whose *values* don't make sense.
#[derive(Debug, Fail)]
pub enum ConfigError {
    #[fail(display = "failed to read config at {:?}: {}", path, why)]
    Read { path: PathBuf, why: io::Error },
    #[fail(display = "failed to parse config at {:?}: {}", path, why)]
    Parse { path: PathBuf, why: serde_json::Error },
}
