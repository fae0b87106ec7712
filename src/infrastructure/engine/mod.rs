//! Reference workflow engine

mod designer;
mod factory;
mod in_memory;
mod scheme_loader;

pub use factory::InMemoryEngineFactory;
pub use in_memory::InMemoryWorkflowEngine;
pub use scheme_loader::SchemeLoader;
