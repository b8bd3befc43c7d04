use crate::entity::Entity;
use crate::environment::Environment;
use crate::error::{BlockplanError, HandlerError};
use crate::handlers;
use crate::store::EntityStore;

/// Iterates the declarative config in input order and dispatches each record
/// to its type handler. The first handler failure is annotated with the
/// entity id and error class and re-raised; there is no checkpointing and no
/// retry.
pub fn execute(store: &EntityStore, environment: &Environment) -> Result<(), HandlerError> {
    for entity in store.iter() {
        info!("realizing '{}' ({})", entity.id(), entity.type_name());

        let result = dispatch(store, environment, entity);

        if let Err(why) = result {
            let class = why.class();
            error!("failed to realize '{}' ({}): {}", entity.id(), class, why);
            return Err(HandlerError { id: entity.id().to_owned(), class, source: why });
        }
    }

    Ok(())
}

fn dispatch(
    store: &EntityStore,
    environment: &Environment,
    entity: &Entity,
) -> Result<(), BlockplanError> {
    match entity {
        Entity::Disk(disk) => handlers::disk::handle(store, disk),
        Entity::Partition(partition) => handlers::partition::handle(store, partition),
        Entity::Format(format) => handlers::format::handle(store, format),
        Entity::Mount(mount) => handlers::mount::handle(store, environment, mount),
        Entity::LvmVolgroup(volgroup) => handlers::lvm_volgroup::handle(store, volgroup),
        Entity::LvmPartition(lvm_partition) => handlers::lvm_partition::handle(store, lvm_partition),
        Entity::DmCrypt(dm_crypt) => handlers::dm_crypt::handle(store, environment, dm_crypt),
        Entity::Raid(raid) => handlers::raid::handle(store, environment, raid),
        Entity::Bcache(bcache) => handlers::bcache::handle(store, bcache),
    }
}
