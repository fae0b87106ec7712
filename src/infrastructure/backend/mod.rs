//! Persistence providers and the engine handle built over them

mod document;
mod handle;
mod memory;
mod relational;
mod selector;

pub use document::DocumentStoreProvider;
pub use handle::EngineHandle;
pub use memory::MemoryProvider;
pub use relational::{redact_connection_string, RelationalProvider};
pub use selector::{BackendSelector, EngineOptions, Providers};
