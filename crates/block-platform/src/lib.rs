//! Detect whether a Linux system is in EFI or BIOS mode.
//!
//! ```rust,no_run
//! use block_platform::Bootloader;
//!
//! match Bootloader::detect() {
//!     Bootloader::Efi => println!("System is in EFI mode"),
//!     Bootloader::Bios => println!("System is in BIOS mode")
//! }
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Force the disk provisioner to assume either a BIOS or EFI target, bypassing detection.
pub static FORCE_BOOTLOADER: AtomicUsize = AtomicUsize::new(0);

/// Bootloader type
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Bootloader {
    Bios,
    Efi,
}

impl Bootloader {
    /// Detects whether the system is running from EFI.
    pub fn detect() -> Bootloader {
        match FORCE_BOOTLOADER.load(Ordering::SeqCst) {
            1 => {
                return Bootloader::Bios;
            }
            2 => {
                return Bootloader::Efi;
            }
            _ => ()
        }

        if Path::new("/sys/firmware/efi").is_dir() {
            Bootloader::Efi
        } else {
            Bootloader::Bios
        }
    }
}
