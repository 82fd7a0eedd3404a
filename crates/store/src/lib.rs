//! Persistence for the highlight engine.
//!
//! [`StorageAdapter`] is the asynchronous key-value interface every context
//! shares; [`MemoryStorage`] and [`FileStorage`] implement it.
//! [`HighlightStore`] keeps the durable highlight collection on top of it and
//! announces every write through a [`horizon_messaging::Messenger`].

mod error;
mod file;
pub mod keys;
mod patch;
mod storage;
mod store;

pub use error::{Result, StorageError};
pub use file::FileStorage;
pub use patch::{HighlightPatch, VideoPatch};
pub use storage::{MemoryStorage, StorageAdapter};
pub use store::{Clock, HighlightStore, StoreOptions};
