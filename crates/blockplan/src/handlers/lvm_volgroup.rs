use crate::entity::LvmVolgroup;
use crate::error::BlockplanError;
use crate::resolver::resolve;
use crate::store::EntityStore;
use block_external as external;
use std::collections::HashSet;
use std::path::PathBuf;

/// Realizes an `lvm_volgroup` record: creates a volume group over its
/// resolved devices, or (when preserved) verifies one already exists with
/// exactly that device set.
pub fn handle(store: &EntityStore, volgroup: &LvmVolgroup) -> Result<(), BlockplanError> {
    let devices: Vec<PathBuf> =
        volgroup.devices.iter().map(|id| resolve(store, id)).collect::<Result<_, _>>()?;

    if volgroup.preserve.unwrap_or(false) {
        external::vgactivate(&volgroup.name).map_err(|why| BlockplanError::PreserveMismatch {
            id: volgroup.id.clone(),
            why: why.to_string(),
        })?;

        let pvs = external::pvs().map_err(|why| BlockplanError::PreserveMismatch {
            id: volgroup.id.clone(),
            why: why.to_string(),
        })?;

        let actual: HashSet<&PathBuf> = pvs
            .iter()
            .filter(|(_, vg)| vg.as_deref() == Some(volgroup.name.as_str()))
            .map(|(pv, _)| pv)
            .collect();
        let declared: HashSet<&PathBuf> = devices.iter().collect();

        if actual != declared {
            return Err(BlockplanError::PreserveMismatch {
                id: volgroup.id.clone(),
                why: format!(
                    "volume group '{}' PVs do not match the declared device set",
                    volgroup.name
                ),
            });
        }

        return Ok(());
    }

    for device in &devices {
        external::pvcreate(device)?;
    }

    external::vgcreate(&volgroup.name, devices.iter())?;

    Ok(())
}
