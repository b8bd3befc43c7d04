use crate::entity::DmCrypt;
use crate::environment::Environment;
use crate::error::BlockplanError;
use crate::resolver::resolve;
use crate::store::EntityStore;
use block_external::{cryptsetup_format, cryptsetup_open, LuksKey};
use block_tabfiles::{uuid_of, SideFiles};
use std::fs;
use tempdir::TempDir;

/// Realizes a `dm_crypt` record: formats and opens a LUKS volume, using a
/// short-lived temp file for the key material so it never lingers on disk.
pub fn handle(
    store: &EntityStore,
    environment: &Environment,
    dm_crypt: &DmCrypt,
) -> Result<(), BlockplanError> {
    let volume_path = resolve(store, &dm_crypt.volume)?;
    let dm_name = dm_crypt.dm_name();

    let tmp = TempDir::new("blockplan-luks-key")?;
    let key_path = tmp.path().join("key");
    fs::write(&key_path, dm_crypt.key.as_bytes())?;

    let key = LuksKey::Keyfile(&key_path);
    cryptsetup_format(&volume_path, &key, dm_crypt.cipher.as_deref(), dm_crypt.keysize)?;
    cryptsetup_open(&volume_path, dm_name, &key)?;

    drop(tmp);

    let backing_uuid = uuid_of(&volume_path).ok_or_else(|| BlockplanError::ResolutionFailed {
        id: dm_crypt.id.clone(),
        why: "could not determine backing volume's filesystem UUID".into(),
    })?;

    let side_files = SideFiles::new(environment.fstab.clone());
    side_files.write_crypttab_line(dm_name, &backing_uuid)?;

    Ok(())
}
