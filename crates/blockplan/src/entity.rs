use serde::Deserialize;
use std::path::PathBuf;

/// One record of the declarative storage topology. The `type` tag selects
/// the variant; unrecognized fields for a variant are ignored by `serde`,
/// and an unrecognized `type` value itself fails to deserialize with a
/// message the `cli` binary surfaces as a `ConfigError`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Disk(Disk),
    Partition(Partition),
    Format(Format),
    Mount(Mount),
    LvmVolgroup(LvmVolgroup),
    LvmPartition(LvmPartition),
    DmCrypt(DmCrypt),
    Raid(Raid),
    Bcache(Bcache),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Entity::Disk(e) => &e.id,
            Entity::Partition(e) => &e.id,
            Entity::Format(e) => &e.id,
            Entity::Mount(e) => &e.id,
            Entity::LvmVolgroup(e) => &e.id,
            Entity::LvmPartition(e) => &e.id,
            Entity::DmCrypt(e) => &e.id,
            Entity::Raid(e) => &e.id,
            Entity::Bcache(e) => &e.id,
        }
    }

    /// The entity's own `type` tag, used in log lines and error context.
    pub fn type_name(&self) -> &'static str {
        match self {
            Entity::Disk(_) => "disk",
            Entity::Partition(_) => "partition",
            Entity::Format(_) => "format",
            Entity::Mount(_) => "mount",
            Entity::LvmVolgroup(_) => "lvm_volgroup",
            Entity::LvmPartition(_) => "lvm_partition",
            Entity::DmCrypt(_) => "dm_crypt",
            Entity::Raid(_) => "raid",
            Entity::Bcache(_) => "bcache",
        }
    }

    /// `preserve` is a common attribute across every variant that has one;
    /// `mount` and `lvm_partition`'s sibling `format` never declare it, so
    /// this defaults to `false` there (a mount is not itself "created" in a
    /// way preserve would skip, and `format` carries its own field).
    pub fn preserve(&self) -> bool {
        match self {
            Entity::Disk(e) => e.preserve.unwrap_or(false),
            Entity::Partition(e) => e.preserve.unwrap_or(false),
            Entity::Format(e) => e.preserve.unwrap_or(false),
            Entity::LvmVolgroup(e) => e.preserve.unwrap_or(false),
            Entity::LvmPartition(e) => e.preserve.unwrap_or(false),
            Entity::Mount(_) | Entity::DmCrypt(_) | Entity::Raid(_) | Entity::Bcache(_) => false,
        }
    }

    /// The id of this entity's parent, if it has exactly one (used by the
    /// upfront reverse-asymmetric-preserve check). Entities with several
    /// device references (`lvm_volgroup`, `raid`) are not single-parented
    /// and are excluded from that check.
    pub fn single_parent(&self) -> Option<&str> {
        match self {
            Entity::Partition(e) => Some(&e.device),
            Entity::LvmPartition(e) => Some(&e.volgroup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Disk {
    pub id: String,
    pub serial: Option<String>,
    pub path: Option<PathBuf>,
    pub ptable: Option<String>,
    pub wipe: Option<String>,
    pub preserve: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Partition {
    pub id: String,
    pub device: String,
    pub number: Option<u32>,
    pub size: String,
    pub flag: Option<String>,
    pub wipe: Option<String>,
    pub preserve: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Format {
    pub id: String,
    pub volume: String,
    pub fstype: String,
    pub label: Option<String>,
    pub preserve: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mount {
    pub id: String,
    pub device: String,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LvmVolgroup {
    pub id: String,
    pub name: String,
    pub devices: Vec<String>,
    pub preserve: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LvmPartition {
    pub id: String,
    pub volgroup: String,
    pub name: String,
    pub size: Option<String>,
    pub preserve: Option<bool>,
    pub ptable: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DmCrypt {
    pub id: String,
    pub volume: String,
    pub key: String,
    pub keysize: Option<u32>,
    pub cipher: Option<String>,
    pub dm_name: Option<String>,
}

impl DmCrypt {
    pub fn dm_name(&self) -> &str { self.dm_name.as_deref().unwrap_or(&self.id) }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Raid {
    pub id: String,
    pub devices: Vec<String>,
    pub raidlevel: u8,
    pub spare_devices: Option<Vec<String>>,
    pub ptable: Option<String>,
    /// Not part of the declared attribute set, but honored when present: a
    /// `raid` record with a `ptable` is recursed into the disk handler
    /// (spec.md §4.6.8), and that recursion re-reads this same field.
    pub wipe: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bcache {
    pub id: String,
    pub backing_device: String,
    pub cache_device: String,
    pub ptable: Option<String>,
}
