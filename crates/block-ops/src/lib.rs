extern crate block_external as external;
extern crate block_platform as platform;
extern crate block_types;
extern crate libparted;
#[macro_use]
extern crate log;
#[macro_use]
extern crate smart_default;

mod enumerate;
mod mklabel;
mod mkpart;
pub mod parted;

pub use self::enumerate::*;
pub use self::mklabel::*;
pub use self::mkpart::*;
