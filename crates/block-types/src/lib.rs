extern crate failure;
#[macro_use]
extern crate failure_derive;
extern crate libparted;
#[macro_use]
extern crate log;
extern crate sys_mount;
extern crate sysfs_class;

mod device;
mod fs;
mod partition;
mod sector;
mod table;
mod utils;

pub use self::device::*;
pub use self::fs::*;
pub use self::partition::*;
pub use self::sector::*;
pub use self::table::*;
