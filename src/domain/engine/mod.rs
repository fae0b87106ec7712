//! Engine domain - contract of the external workflow engine and the data it
//! exchanges with the request layer

mod callback;
mod command;
mod contract;
mod designer;
mod instance;
mod scheme;
mod wiring;

pub use callback::{
    ActionContext, ActionProvider, CodeAction, CodeRule, RuleProvider, SchemeGenerator,
};
pub use command::{CommandParameter, CommandQuery, WorkflowCommand};
pub use contract::{EngineFactory, WorkflowEngine};
pub use designer::{DesignerRequest, DOWNLOAD_SCHEME_OPERATION};
pub use instance::{CreateInstanceParams, SetStateParams, WorkflowState};
pub use scheme::{localize, ProcessScheme, SchemeCommand, SchemeState, Transition};
pub use wiring::{
    CodeActionRegistry, EngineWiring, MessageBus, NullBus, ProcessEvent, TimerManager,
};

#[cfg(test)]
pub use contract::MockWorkflowEngine;
#[cfg(test)]
pub(crate) use scheme::fixtures;
