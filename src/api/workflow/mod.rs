//! Workflow API - one endpoint multiplexing six engine operations
//! selected by the `operation` query parameter

mod dispatcher;
mod error;
mod filler;
mod request;

pub use dispatcher::{dispatch, workflow_api};
pub use error::{WorkflowApiError, CAUSE_DELIMITER};
pub use filler::{fill_command_parameters, initial_process_parameters};
pub use request::{Operation, OperationRequest};
