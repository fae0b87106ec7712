//! Domain layer - Core types and contracts

pub mod engine;
pub mod error;
pub mod locale;
pub mod parameter;
pub mod persistence;

pub use engine::{
    CommandQuery, CreateInstanceParams, DesignerRequest, EngineFactory, EngineWiring,
    ProcessScheme, SetStateParams, WorkflowCommand, WorkflowEngine, WorkflowState,
};
pub use error::DomainError;
pub use locale::{Locale, LocaleError};
pub use parameter::{
    coerce, CoercionError, ParameterBag, ParameterDescriptor, ParameterMap, TypeTag, TypedValue,
};
pub use persistence::{BackendFamily, BackendKind, PersistenceProvider};
