mod persistence;
pub mod scheduler;
pub mod storage;

pub use persistence::{
    AutoSave,
    AutoSaveSettings,
    BuilderMetadata,
    PersistedSnapshot,
    DEFAULT_AUTOSAVE_INTERVAL,
    DEFAULT_METADATA_KEY,
    DEFAULT_STORAGE_KEY,
};
pub use scheduler::{Debouncer, ScheduledTask, TaskHandle};
pub use storage::{MemoryStorage, StorageBackend};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

pub use crate::error::{PersistenceError, PersistenceResult};
