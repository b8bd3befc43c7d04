use crate::entity::{Disk, Raid};
use crate::environment::Environment;
use crate::error::BlockplanError;
use crate::handlers::disk;
use crate::resolver::resolve;
use crate::store::EntityStore;
use block_external as external;
use std::path::PathBuf;

/// Realizes a `raid` record: zeroes member superblocks, creates the array,
/// records it in `mdadm.conf`, and (if a `ptable` is declared) recurses into
/// the disk handler on this same record, treating the freshly created array
/// as a disk of its own.
pub fn handle(store: &EntityStore, environment: &Environment, raid: &Raid) -> Result<(), BlockplanError> {
    if ![0u8, 1, 5].contains(&raid.raidlevel) {
        return Err(BlockplanError::Config {
            id: raid.id.clone(),
            why: format!("unsupported raid level {}", raid.raidlevel),
        });
    }

    let devices: Vec<PathBuf> =
        raid.devices.iter().map(|id| resolve(store, id)).collect::<Result<_, _>>()?;
    let spares: Vec<PathBuf> = raid
        .spare_devices
        .iter()
        .flatten()
        .map(|id| resolve(store, id))
        .collect::<Result<_, _>>()?;

    for device in devices.iter().chain(spares.iter()) {
        external::zero_superblock(device)?;
    }

    let raid_path = PathBuf::from(format!("/dev/{}", raid.id));
    let all_devices: Vec<&std::path::Path> =
        devices.iter().chain(spares.iter()).map(|p| p.as_path()).collect();

    external::create(&raid_path, raid.raidlevel, &all_devices, spares.len())?;

    let scan = external::scan()?;
    let side_files = block_tabfiles::SideFiles::new(environment.fstab.clone());
    side_files.write_mdadm_conf(&scan)?;

    if raid.ptable.is_some() {
        let synthetic = Disk {
            id: raid.id.clone(),
            serial: None,
            path: Some(raid_path),
            ptable: raid.ptable.clone(),
            wipe: raid.wipe.clone(),
            preserve: Some(false),
        };
        disk::handle(store, &synthetic)?;
    }

    Ok(())
}
