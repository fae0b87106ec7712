//! In-memory reference engine

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::designer;
use crate::domain::engine::{
    localize, ActionContext, CommandParameter, ProcessEvent, Transition,
};
use crate::domain::{
    CommandQuery, CreateInstanceParams, DesignerRequest, DomainError, EngineWiring, Locale,
    ParameterMap, ProcessScheme, SetStateParams, WorkflowCommand, WorkflowEngine, WorkflowState,
};

/// Runtime state of one process instance
#[derive(Debug, Clone)]
struct ProcessInstance {
    scheme: ProcessScheme,
    current_state: String,
    parameters: ParameterMap,
    version: u64,
}

/// Engine that keeps schemes and instances in process memory.
///
/// Data is lost when the process terminates.
pub struct InMemoryWorkflowEngine {
    wiring: EngineWiring,
    schemes: RwLock<HashMap<String, ProcessScheme>>,
    instances: RwLock<HashMap<Uuid, ProcessInstance>>,
    started: AtomicBool,
}

impl InMemoryWorkflowEngine {
    pub fn new(wiring: EngineWiring) -> Self {
        Self {
            wiring,
            schemes: RwLock::new(HashMap::new()),
            instances: RwLock::new(HashMap::new()),
            started: AtomicBool::new(false),
        }
    }

    /// Create an engine with schemes already registered
    pub fn with_schemes(wiring: EngineWiring, schemes: Vec<ProcessScheme>) -> Self {
        let schemes = schemes
            .into_iter()
            .map(|scheme| (scheme.code.clone(), scheme))
            .collect();

        Self {
            schemes: RwLock::new(schemes),
            ..Self::new(wiring)
        }
    }

    /// Add or replace a scheme
    pub async fn register_scheme(&self, scheme: ProcessScheme) -> Result<(), DomainError> {
        scheme.validate()?;

        debug!(scheme = %scheme.code, "Registering scheme");
        self.schemes.write().await.insert(scheme.code.clone(), scheme);
        Ok(())
    }

    pub async fn scheme_exists(&self, code: &str) -> bool {
        self.schemes.read().await.contains_key(code)
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    async fn scheme(&self, code: &str) -> Result<ProcessScheme, DomainError> {
        self.schemes
            .read()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("Scheme '{}' is not found", code)))
    }

    /// Registered scheme, or one generated for an unknown code when a
    /// generator is wired
    async fn resolve_scheme(
        &self,
        code: &str,
        parameters: &ParameterMap,
    ) -> Result<ProcessScheme, DomainError> {
        let known = self.schemes.read().await.get(code).cloned();
        if let Some(scheme) = known {
            return Ok(scheme);
        }

        let Some(generator) = &self.wiring.scheme_generator else {
            return Err(DomainError::not_found(format!("Scheme '{}' is not found", code)));
        };

        let scheme = generator
            .generate_scheme(code, parameters)
            .await
            .map_err(|e| {
                DomainError::engine_with_cause(format!("Failed to generate scheme '{}'", code), e)
            })?;

        info!(scheme = %code, parameters = parameters.len(), "Scheme generated");
        self.register_scheme(scheme.clone()).await?;
        Ok(scheme)
    }

    async fn instance(&self, process_id: Uuid) -> Result<ProcessInstance, DomainError> {
        self.instances
            .read()
            .await
            .get(&process_id)
            .cloned()
            .ok_or_else(|| process_not_found(process_id))
    }

    /// Point the instance at the latest registered version of its scheme
    async fn refresh_scheme(&self, process_id: Uuid) -> Result<(), DomainError> {
        let code = self.instance(process_id).await?.scheme.code;
        let Ok(latest) = self.scheme(&code).await else {
            return Ok(());
        };

        let mut instances = self.instances.write().await;
        if let Some(instance) = instances.get_mut(&process_id) {
            if instance.scheme != latest {
                debug!(process_id = %process_id, scheme = %code, "Scheme refreshed");
                instance.scheme = latest;
            }
        }
        Ok(())
    }

    async fn condition_holds(
        &self,
        transition: &Transition,
        context: &ActionContext,
    ) -> Result<bool, DomainError> {
        let Some(rule) = &transition.condition else {
            return Ok(true);
        };

        self.wiring
            .rules
            .check_rule(rule, context)
            .await
            .map_err(|e| {
                DomainError::engine_with_cause(
                    format!("Failed to evaluate condition '{}'", rule),
                    e,
                )
            })
    }

    /// Apply a state change if nobody else changed the instance in between
    async fn commit(
        &self,
        process_id: Uuid,
        expected_version: u64,
        target_state: &str,
        parameters: ParameterMap,
    ) -> Result<(), DomainError> {
        let mut instances = self.instances.write().await;
        let instance = instances
            .get_mut(&process_id)
            .ok_or_else(|| process_not_found(process_id))?;

        if instance.version != expected_version {
            return Err(DomainError::conflict(format!(
                "Process '{}' was modified concurrently",
                process_id
            )));
        }

        instance.current_state = target_state.to_string();
        instance
            .parameters
            .extend(parameters.into_iter().filter(|(_, value)| !value.is_null()));
        instance.version += 1;
        Ok(())
    }

    async fn publish(&self, event: ProcessEvent) {
        let process_id = event.process_id;
        if let Err(e) = self.wiring.bus.publish(event).await {
            warn!(process_id = %process_id, error = %e, "Failed to publish process event");
        }
    }

    pub(crate) async fn scheme_for_designer(&self, code: &str) -> Option<ProcessScheme> {
        self.schemes.read().await.get(code).cloned()
    }
}

fn process_not_found(process_id: Uuid) -> DomainError {
    DomainError::not_found(format!("Process '{}' is not found", process_id))
}

#[async_trait]
impl WorkflowEngine for InMemoryWorkflowEngine {
    async fn create_instance(&self, params: CreateInstanceParams) -> Result<(), DomainError> {
        let scheme = self
            .resolve_scheme(&params.scheme_code, &params.scheme_creation_parameters)
            .await?;
        let initial = scheme
            .initial_state()
            .map(|s| s.name.clone())
            .ok_or_else(|| {
                DomainError::engine(format!(
                    "Scheme '{}' has no initial state",
                    params.scheme_code
                ))
            })?;

        let mut instances = self.instances.write().await;
        if instances.contains_key(&params.process_id) {
            return Err(DomainError::conflict(format!(
                "Process '{}' already exists",
                params.process_id
            )));
        }

        instances.insert(
            params.process_id,
            ProcessInstance {
                scheme,
                current_state: initial.clone(),
                parameters: params.initial_process_parameters,
                version: 0,
            },
        );
        drop(instances);

        info!(
            process_id = %params.process_id,
            scheme = %params.scheme_code,
            state = %initial,
            identity = ?params.identity_id,
            scheme_parameters = params.scheme_creation_parameters.len(),
            "Process instance created"
        );
        Ok(())
    }

    async fn get_available_commands(
        &self,
        query: CommandQuery,
    ) -> Result<Vec<WorkflowCommand>, DomainError> {
        if self.wiring.auto_update_scheme_before_get_available_commands {
            self.refresh_scheme(query.process_id).await?;
        }

        let instance = self.instance(query.process_id).await?;
        let identities = query.effective_identities();
        let locale = Locale::default();
        let mut commands: Vec<WorkflowCommand> = Vec::new();

        for transition in instance.scheme.transitions_from(&instance.current_state) {
            if query
                .command_name
                .as_deref()
                .is_some_and(|name| name != transition.command)
            {
                continue;
            }

            if commands.iter().any(|c| c.name == transition.command) {
                continue;
            }

            if !transition.allows(&identities) {
                continue;
            }

            let context = ActionContext {
                process_id: query.process_id,
                scheme_code: instance.scheme.code.clone(),
                current_state: instance.current_state.clone(),
                target_state: transition.to.clone(),
                command: Some(transition.command.clone()),
                identity_id: query.identities.first().cloned(),
                impersonated_identity_id: query.impersonated_identity_id.clone(),
                parameters: instance.parameters.clone(),
            };
            if !self.condition_holds(transition, &context).await? {
                continue;
            }

            let Some(definition) = instance.scheme.command(&transition.command) else {
                continue;
            };

            commands.push(WorkflowCommand {
                process_id: query.process_id,
                name: definition.name.clone(),
                localized_name: localize(&definition.localized_names, &definition.name, &locale),
                state_name: instance.current_state.clone(),
                valid_for_identities: if transition.actors.is_empty() {
                    identities.clone()
                } else {
                    transition.actors.clone()
                },
                parameters: definition
                    .parameters
                    .iter()
                    .map(|p| CommandParameter::new(p.name.clone(), p.type_tag))
                    .collect(),
            });
        }

        Ok(commands)
    }

    async fn execute_command(
        &self,
        command: WorkflowCommand,
        identity_id: Option<String>,
        impersonated_identity_id: Option<String>,
    ) -> Result<(), DomainError> {
        let process_id = command.process_id;
        let instance = self.instance(process_id).await?;

        if command.state_name != instance.current_state {
            return Err(DomainError::engine(format!(
                "Command '{}' is not available in state '{}'",
                command.name, instance.current_state
            )));
        }

        let identities: Vec<String> = impersonated_identity_id
            .clone()
            .or_else(|| identity_id.clone())
            .into_iter()
            .collect();

        let parameters = command.parameter_values();
        let mut selected = None;

        for transition in instance.scheme.transitions_from(&instance.current_state) {
            if transition.command != command.name || !transition.allows(&identities) {
                continue;
            }

            let context = ActionContext {
                process_id,
                scheme_code: instance.scheme.code.clone(),
                current_state: instance.current_state.clone(),
                target_state: transition.to.clone(),
                command: Some(command.name.clone()),
                identity_id: identity_id.clone(),
                impersonated_identity_id: impersonated_identity_id.clone(),
                parameters: parameters.clone(),
            };

            if self.condition_holds(transition, &context).await? {
                selected = Some((transition, context));
                break;
            }
        }

        let Some((transition, context)) = selected else {
            return Err(DomainError::engine(format!(
                "Command '{}' is not available for process '{}'",
                command.name, process_id
            )));
        };

        if let Some(action) = &transition.action {
            self.wiring
                .actions
                .execute_action(action, &context)
                .await
                .map_err(|e| {
                    DomainError::engine_with_cause(format!("Action '{}' failed", action), e)
                })?;
        }

        self.commit(process_id, instance.version, &transition.to, parameters)
            .await?;

        info!(
            process_id = %process_id,
            command = %command.name,
            from = %instance.current_state,
            to = %transition.to,
            "Command executed"
        );

        self.publish(ProcessEvent {
            process_id,
            scheme_code: instance.scheme.code.clone(),
            from_state: instance.current_state.clone(),
            to_state: transition.to.clone(),
            command: Some(command.name),
            identity_id: context.identity_id,
        })
        .await;

        Ok(())
    }

    async fn get_available_states_to_set(
        &self,
        process_id: Uuid,
        culture: Locale,
    ) -> Result<Vec<WorkflowState>, DomainError> {
        let instance = self.instance(process_id).await?;

        Ok(instance
            .scheme
            .states
            .iter()
            .filter(|s| s.allow_set)
            .map(|s| WorkflowState {
                name: s.name.clone(),
                localized_name: localize(&s.localized_names, &s.name, &culture),
                scheme_code: instance.scheme.code.clone(),
            })
            .collect())
    }

    async fn set_state(&self, params: SetStateParams) -> Result<(), DomainError> {
        let instance = self.instance(params.process_id).await?;

        let state = instance.scheme.state(&params.state).ok_or_else(|| {
            DomainError::engine(format!(
                "State '{}' is not found in scheme '{}'",
                params.state, instance.scheme.code
            ))
        })?;

        if !state.allow_set {
            return Err(DomainError::engine(format!(
                "State '{}' cannot be set",
                params.state
            )));
        }

        self.commit(
            params.process_id,
            instance.version,
            &params.state,
            params.parameters,
        )
        .await?;

        info!(
            process_id = %params.process_id,
            from = %instance.current_state,
            to = %params.state,
            identity = ?params.identity_id,
            "State set"
        );

        self.publish(ProcessEvent {
            process_id: params.process_id,
            scheme_code: instance.scheme.code.clone(),
            from_state: instance.current_state,
            to_state: params.state,
            command: None,
            identity_id: params.identity_id,
        })
        .await;

        Ok(())
    }

    async fn process_exists(&self, process_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.instances.read().await.contains_key(&process_id))
    }

    async fn get_process_scheme(&self, scheme_code: &str) -> Result<ProcessScheme, DomainError> {
        self.resolve_scheme(scheme_code, &ParameterMap::new()).await
    }

    async fn designer_api(&self, request: DesignerRequest) -> Result<String, DomainError> {
        designer::handle(self, request).await
    }

    async fn start(&self) -> Result<(), DomainError> {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Workflow runtime already started");
            return Ok(());
        }

        let schemes = self.schemes.read().await.len();
        info!(
            runtime_id = %self.wiring.runtime_id,
            schemes,
            timer_interval_ms = self.wiring.timers.poll_interval.as_millis() as u64,
            code_actions = ?self.wiring.code_actions,
            "Workflow runtime started"
        );
        Ok(())
    }
}
