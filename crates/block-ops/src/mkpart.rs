use crate::parted::*;
use block_types::{BlockDeviceExt, FileSystem, PartitionExt, PartitionType, SectorExt};
use libparted::{
    Device, FileSystemType as PedFileSystem, Geometry, Partition as PedPartition, PartitionFlag,
    PartitionType as PedPartitionType,
};
use std::{
    io,
    path::{Path, PathBuf},
};

/// Describes a partition to be carved out of a disk at an exact sector range.
#[derive(Debug, SmartDefault, Clone, PartialEq)]
pub struct PartitionCreate {
    /// The disk the partition will be created on.
    pub path: PathBuf,
    /// The first sector the partition will occupy.
    pub start_sector: u64,
    /// The last sector the partition will occupy.
    pub end_sector: u64,
    /// The file system the partition will eventually be formatted with, if any.
    pub file_system: Option<FileSystem>,
    /// Whether the partition is primary, logical, or extended.
    #[default(PartitionType::Primary)]
    pub kind: PartitionType,
    /// Partition-table flags (`boot`, `lvm`, `raid`, `bios_grub`, `prep`, ...) to set.
    pub flags: Vec<PartitionFlag>,
    /// The partition name/label to apply, where the table format supports it.
    pub label: Option<String>,
}

impl BlockDeviceExt for PartitionCreate {
    fn get_device_path(&self) -> &Path { &self.path }
}

impl PartitionExt for PartitionCreate {
    fn get_file_system(&self) -> Option<FileSystem> { self.file_system }

    fn get_sector_end(&self) -> u64 { self.end_sector }

    fn get_sector_start(&self) -> u64 { self.start_sector }

    fn get_partition_flags(&self) -> &[PartitionFlag] { &self.flags }

    fn get_partition_label(&self) -> Option<&str> { self.label.as_deref() }

    fn get_partition_type(&self) -> PartitionType { self.kind }
}

impl SectorExt for PartitionCreate {
    fn get_sectors(&self) -> u64 { self.get_sector_end() - self.get_sector_start() }
}

/// Creates a partition on `device` at an exact sector range, never letting libparted
/// round the geometry to a different offset than the one that was computed for it.
pub fn create_partition<P: PartitionExt>(device: &mut Device, partition: &P) -> io::Result<()> {
    let length = partition.get_sector_end() - partition.get_sector_start();
    let geometry = Geometry::new(device, partition.get_sector_start() as i64, length as i64)
        .map_err(|why| io::Error::new(why.kind(), format!("failed to create geometry: {}", why)))?;

    let part_type = match partition.get_partition_type() {
        PartitionType::Primary => PedPartitionType::PED_PARTITION_NORMAL,
        PartitionType::Logical => PedPartitionType::PED_PARTITION_LOGICAL,
        PartitionType::Extended => PedPartitionType::PED_PARTITION_EXTENDED,
    };

    let (start, end) = (geometry.start(), geometry.start() + geometry.length());

    info!("creating new partition with {} sectors: {} - {}", length, start, end);

    let fs_type = partition.get_file_system().and_then(|fs| PedFileSystem::get(fs.into()));

    let mut disk = open_disk(device)?;
    let mut part =
        PedPartition::new(&disk, part_type, fs_type.as_ref(), start, end).map_err(|why| {
            io::Error::new(
                why.kind(),
                format!(
                    "failed to create new partition on {}: {}",
                    partition.get_device_path().display(),
                    why
                ),
            )
        })?;

    for &flag in partition.get_partition_flags() {
        if part.is_flag_available(flag) && part.set_flag(flag, true).is_err() {
            error!("unable to set {:?}", flag);
        }
    }

    if let Some(label) = partition.get_partition_label() {
        if part.set_name(label).is_err() {
            error!("unable to set partition name: {}", label);
        }
    }

    // An exact constraint guarantees libparted will not nudge the partition to a
    // different offset than the one computed by the resolver/offset arithmetic.
    let constraint = geometry.exact().expect("exact constraint not found");
    disk.add_partition(&mut part, &constraint).map_err(|why| {
        io::Error::new(
            why.kind(),
            format!(
                "failed to add new partition to {}: {}",
                partition.get_device_path().display(),
                why
            ),
        )
    })?;

    info!(
        "committing new partition ({}:{}) on {}",
        start,
        end,
        partition.get_device_path().display()
    );

    commit(&mut disk)
}
