pub mod bcache;
pub mod disk;
pub mod dm_crypt;
pub mod format;
pub mod lvm_partition;
pub mod lvm_volgroup;
pub mod mount;
pub mod partition;
pub mod raid;
