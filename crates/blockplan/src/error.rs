use std::{io, path::PathBuf};

use block_external::ToolError;

/// The error taxonomy for the storage graph executor. Each variant maps to
/// one of the tags in the error-handling design: `ConfigError`,
/// `UnknownEntity`, `ResolutionFailed`, `PreserveMismatch`, `Unsupported`,
/// `ToolError`, `DeviceNotAppearing`.
#[derive(Debug, Fail)]
pub enum BlockplanError {
    #[fail(display = "invalid configuration for '{}': {}", id, why)]
    Config { id: String, why: String },
    #[fail(display = "entity '{}' referenced '{}', which does not exist", referrer, id)]
    UnknownEntity { referrer: String, id: String },
    #[fail(display = "could not resolve a device path for '{}': {}", id, why)]
    ResolutionFailed { id: String, why: String },
    #[fail(
        display = "'{}' is marked preserve=true, but its on-disk state does not match the \
                   declared configuration: {}",
        id, why
    )]
    PreserveMismatch { id: String, why: String },
    #[fail(display = "unsupported configuration for '{}': {}", id, why)]
    Unsupported { id: String, why: String },
    #[fail(display = "{}", _0)]
    Tool(#[fail(cause)] ToolError),
    #[fail(display = "device at {:?} did not appear within the polling budget", path)]
    DeviceNotAppearing { path: PathBuf },
    #[fail(display = "{}", why)]
    Io { why: io::Error },
}

impl From<ToolError> for BlockplanError {
    fn from(why: ToolError) -> Self { BlockplanError::Tool(why) }
}

impl From<io::Error> for BlockplanError {
    fn from(why: io::Error) -> Self { BlockplanError::Io { why } }
}

/// Wraps a handler's error with the entity id and a short error-class tag,
/// the context the executor attaches before re-raising, matching
/// `DiskError::new_partition_error`'s pattern of annotating at the point an
/// inner error crosses a boundary.
#[derive(Debug, Fail)]
#[fail(display = "failed to realize '{}' ({}): {}", id, class, source)]
pub struct HandlerError {
    pub id: String,
    pub class: &'static str,
    #[fail(cause)]
    pub source: BlockplanError,
}

impl BlockplanError {
    /// A short, stable tag for this error's taxonomy class, used for log
    /// context and by the executor when it annotates a handler failure.
    pub fn class(&self) -> &'static str {
        match self {
            BlockplanError::Config { .. } => "ConfigError",
            BlockplanError::UnknownEntity { .. } => "UnknownEntity",
            BlockplanError::ResolutionFailed { .. } => "ResolutionFailed",
            BlockplanError::PreserveMismatch { .. } => "PreserveMismatch",
            BlockplanError::Unsupported { .. } => "Unsupported",
            BlockplanError::Tool(_) => "ToolError",
            BlockplanError::DeviceNotAppearing { .. } => "DeviceNotAppearing",
            BlockplanError::Io { .. } => "IoError",
        }
    }
}
