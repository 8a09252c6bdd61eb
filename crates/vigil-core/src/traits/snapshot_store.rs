use crate::errors::StorageError;
use crate::facts::StoreSnapshot;

/// Opaque persistence collaborator for a facts/answers snapshot.
/// Vigil defines what is read and written, not how it is stored.
pub trait ISnapshotStore: Send + Sync {
    /// Load the last saved snapshot, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<StoreSnapshot>, StorageError>;

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StorageError>;

    fn clear(&self) -> Result<(), StorageError>;
}
