//! The custom-mode storage graph executor: resolves a declarative storage
//! topology (disks, partitions, filesystems, mounts, LVM, RAID, bcache,
//! LUKS) against the host's block subsystem and realizes it.
//!
//! Entry point is [`executor::execute`], given an [`entity::Entity`] list
//! already loaded into an [`store::EntityStore`] and an [`environment::Environment`]
//! describing the target root and fstab location.

extern crate block_external;
extern crate block_ops;
extern crate block_platform;
extern crate block_tabfiles;
extern crate block_types;
extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate serde;
extern crate tempdir;

pub mod entity;
pub mod environment;
pub mod error;
pub mod executor;
mod handlers;
pub mod resolver;
pub mod store;
pub mod sync;
pub mod wipe;

pub use self::entity::Entity;
pub use self::environment::Environment;
pub use self::error::{BlockplanError, HandlerError};
pub use self::executor::execute;
pub use self::store::EntityStore;
