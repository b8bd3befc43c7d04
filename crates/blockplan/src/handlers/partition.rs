use crate::entity::Partition;
use crate::error::BlockplanError;
use crate::resolver::resolve;
use crate::sizeunit::SizeSpec;
use crate::store::EntityStore;
use crate::sync::sync;
use crate::wipe::WipeMode;
use block_ops::{create_partition, existing_partitions, parted, PartitionCreate};
use block_types::PartitionType;
use libparted::PartitionFlag;

const MSDOS_FIRST_OFFSET: u64 = 2048;

/// Realizes a `partition` record: computes its exact sector range from the
/// existing table layout, creates it, and wipes it if asked.
pub fn handle(store: &EntityStore, partition: &Partition) -> Result<(), BlockplanError> {
    let disk_path = resolve(store, &partition.device)?;
    let number = store.partition_number(partition);

    let parent = store.require(&partition.id, &partition.device)?;
    let parent_preserve = parent.preserve();

    let existing = existing_partitions(&disk_path).map_err(|why| {
        BlockplanError::ResolutionFailed { id: partition.id.clone(), why: why.to_string() }
    })?;

    let mut device = parted::open_device(&disk_path)?;
    let sector_size = device.sector_size();

    let length_sectors = SizeSpec::parse(&partition.id, &partition.size)?.to_sectors(sector_size);

    let is_msdos = parted::partition_table_kind(&disk_path)
        .map_err(|why| BlockplanError::ResolutionFailed {
            id: partition.id.clone(),
            why: why.to_string(),
        })?
        == Some(block_types::PartitionTable::Msdos);

    let start_sector = if number == 1 {
        if is_msdos {
            MSDOS_FIRST_OFFSET
        } else {
            SizeSpec::parse(&partition.id, "16KiB")?.to_sectors(sector_size) + 2
        }
    } else {
        let previous = existing
            .iter()
            .find(|p| p.number == number - 1)
            .ok_or_else(|| BlockplanError::Config {
                id: partition.id.clone(),
                why: format!("no partition at index {} to offset from", number - 1),
            })?;

        // The classification of "normal/extended/logical" is not recoverable
        // from `ExistingPartition` alone; the input partition's own class
        // stands in for the previous entry's, which is how this offset rule
        // is only ever exercised by sequentially declared partitions of the
        // same class in practice.
        match classify(partition.flag.as_deref(), &partition.id)? {
            PartitionType::Extended => previous.start + 1,
            PartitionType::Logical => previous.end + 2,
            PartitionType::Primary => previous.end + 1,
        }
    };

    if partition.preserve.unwrap_or(false) {
        let existing = existing
            .iter()
            .find(|p| p.number == number)
            .ok_or_else(|| BlockplanError::PreserveMismatch {
                id: partition.id.clone(),
                why: "no partition at the declared index".into(),
            })?;

        if existing.start != start_sector || existing.end - existing.start + 1 != length_sectors {
            return Err(BlockplanError::PreserveMismatch {
                id: partition.id.clone(),
                why: format!(
                    "existing partition spans {}..{}, declared configuration computes {}..{}",
                    existing.start,
                    existing.end,
                    start_sector,
                    start_sector + length_sectors - 1
                ),
            });
        }

        return Ok(());
    }

    if parent_preserve {
        return Err(BlockplanError::Unsupported {
            id: partition.id.clone(),
            why: format!(
                "parent disk '{}' is preserved but this partition is not",
                partition.device
            ),
        });
    }

    let kind = classify(partition.flag.as_deref(), &partition.id)?;
    let flags = table_flags(partition.flag.as_deref(), &partition.id)?;

    let create = PartitionCreate {
        path: disk_path.clone(),
        start_sector,
        end_sector: start_sector + length_sectors - 1,
        file_system: None,
        kind,
        flags,
        label: None,
    };

    create_partition(&mut device, &create)?;
    parted::sync(&mut device)?;

    let path = resolve(store, &partition.id)?;

    if let Some(mode) = WipeMode::parse(&partition.id, partition.wipe.as_deref())? {
        crate::wipe::wipe(&path, mode)?;
        sync(&path)?;
    }

    Ok(())
}

fn classify(flag: Option<&str>, id: &str) -> Result<PartitionType, BlockplanError> {
    match flag {
        Some("extended") => Ok(PartitionType::Extended),
        Some("logical") => Ok(PartitionType::Logical),
        Some("boot") | Some("lvm") | Some("raid") | Some("bios_grub") | Some("prep") | None => {
            Ok(PartitionType::Primary)
        }
        Some(other) => Err(BlockplanError::Config {
            id: id.to_owned(),
            why: format!("unrecognized partition flag '{}'", other),
        }),
    }
}

fn table_flags(flag: Option<&str>, id: &str) -> Result<Vec<PartitionFlag>, BlockplanError> {
    Ok(match flag {
        Some("boot") => vec![PartitionFlag::PED_PARTITION_BOOT],
        Some("lvm") => vec![PartitionFlag::PED_PARTITION_LVM],
        Some("raid") => vec![PartitionFlag::PED_PARTITION_RAID],
        Some("bios_grub") => vec![PartitionFlag::PED_PARTITION_BIOS_GRUB],
        Some("prep") => vec![PartitionFlag::PED_PARTITION_PREP],
        Some("extended") | Some("logical") | None => Vec::new(),
        Some(other) => {
            return Err(BlockplanError::Config {
                id: id.to_owned(),
                why: format!("unrecognized partition flag '{}'", other),
            })
        }
    })
}
