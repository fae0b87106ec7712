//! Workflow API pipeline: parse, validate, route, execute, render

use axum::extract::State;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::WorkflowApiError;
use super::filler::{fill_command_parameters, initial_process_parameters};
use super::request::{Operation, OperationRequest};
use crate::api::state::AppState;
use crate::api::types::{ParamsRejection, RequestParams, ResponseEnvelope};
use crate::domain::{
    CommandQuery, CreateInstanceParams, Locale, ParameterMap, SetStateParams, WorkflowEngine,
};

/// `GET|POST /workflowapi`
pub async fn workflow_api(
    State(state): State<AppState>,
    params: Result<RequestParams, ParamsRejection>,
) -> ResponseEnvelope {
    let result = match params {
        Ok(params) => dispatch(state.engine.engine(), &params, &state.default_culture).await,
        Err(rejection) => Err(WorkflowApiError::MalformedRequest(rejection)),
    };

    match result {
        Ok(data) => ResponseEnvelope::ok(data),
        Err(e) => {
            let message = e.envelope_message();
            warn!(error = %message, "Workflow API request failed");
            ResponseEnvelope::failure(message)
        }
    }
}

/// Run one request against the engine and return the envelope payload
pub async fn dispatch(
    engine: &dyn WorkflowEngine,
    params: &RequestParams,
    default_culture: &Locale,
) -> Result<Value, WorkflowApiError> {
    let request = OperationRequest::parse(&params.query, default_culture)?;

    debug!(
        operation = %request.operation,
        process_id = %request.process_id,
        identity = ?request.identity_id,
        "Dispatching workflow operation"
    );

    match request.operation {
        Operation::CreateInstance => create_instance(engine, request, params).await,
        Operation::GetAvailableCommands => get_available_commands(engine, request).await,
        Operation::ExecuteCommand => execute_command(engine, request, params).await,
        Operation::GetAvailableStateToSet => get_available_states_to_set(engine, request).await,
        Operation::SetState => set_state(engine, request).await,
        Operation::IsExistProcess => Ok(Value::Bool(
            engine.process_exists(request.process_id).await?,
        )),
    }
}

fn no_data() -> Value {
    Value::String(String::new())
}

fn to_data<T: Serialize>(value: &T) -> Result<Value, WorkflowApiError> {
    serde_json::to_value(value).map_err(WorkflowApiError::Serialization)
}

async fn create_instance(
    engine: &dyn WorkflowEngine,
    request: OperationRequest,
    params: &RequestParams,
) -> Result<Value, WorkflowApiError> {
    let scheme_code = request
        .scheme_code
        .ok_or(WorkflowApiError::MissingParameter("schemacode"))?;

    let initial = match params.posted_form() {
        Some(form) => {
            let scheme = engine.get_process_scheme(&scheme_code).await?;
            initial_process_parameters(&scheme, form)?
        }
        None => ParameterMap::new(),
    };

    let create = CreateInstanceParams::new(scheme_code, request.process_id)
        .with_identity(request.identity_id)
        .with_impersonated_identity(request.impersonated_identity_id)
        .with_initial_parameters(initial)
        .with_scheme_creation_parameters(request.parameters.unwrap_or_default());

    engine.create_instance(create).await?;
    Ok(no_data())
}

async fn get_available_commands(
    engine: &dyn WorkflowEngine,
    request: OperationRequest,
) -> Result<Value, WorkflowApiError> {
    let query = CommandQuery::new(request.process_id)
        .with_identity(request.identity_id)
        .with_impersonated_identity(request.impersonated_identity_id);

    let commands = engine.get_available_commands(query).await?;
    to_data(&commands)
}

async fn execute_command(
    engine: &dyn WorkflowEngine,
    request: OperationRequest,
    params: &RequestParams,
) -> Result<Value, WorkflowApiError> {
    let name = request
        .command
        .ok_or(WorkflowApiError::MissingParameter("command"))?;

    let query = CommandQuery::new(request.process_id)
        .with_identity(request.identity_id.clone())
        .with_impersonated_identity(request.impersonated_identity_id.clone())
        .with_command_name(name.clone());

    let mut command = engine
        .get_available_commands(query)
        .await?
        .into_iter()
        .find(|c| c.name == name)
        .ok_or(WorkflowApiError::CommandNotFound(name))?;

    fill_command_parameters(&mut command, params.posted_form())?;

    engine
        .execute_command(
            command,
            request.identity_id,
            request.impersonated_identity_id,
        )
        .await?;
    Ok(no_data())
}

async fn get_available_states_to_set(
    engine: &dyn WorkflowEngine,
    request: OperationRequest,
) -> Result<Value, WorkflowApiError> {
    let states = engine
        .get_available_states_to_set(request.process_id, request.culture)
        .await?;
    to_data(&states)
}

async fn set_state(
    engine: &dyn WorkflowEngine,
    request: OperationRequest,
) -> Result<Value, WorkflowApiError> {
    let state = request
        .state
        .ok_or(WorkflowApiError::MissingParameter("state"))?;

    engine
        .set_state(SetStateParams {
            process_id: request.process_id,
            identity_id: request.identity_id,
            impersonated_identity_id: request.impersonated_identity_id,
            state,
            parameters: request.parameters.unwrap_or_default(),
        })
        .await?;
    Ok(no_data())
}
