//! Remote resolution of actions, rules and generated schemes through a
//! callback API

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::engine::{
    ActionContext, ActionProvider, CodeActionRegistry, RuleProvider, SchemeGenerator,
};
use crate::domain::{DomainError, ParameterMap, ProcessScheme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CallbackKind {
    Action,
    Rule,
    Scheme,
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action => f.write_str("Action"),
            Self::Rule => f.write_str("Rule"),
            Self::Scheme => f.write_str("Scheme"),
        }
    }
}

#[derive(Debug, Serialize)]
struct CallbackRequest<'a, C> {
    #[serde(rename = "type")]
    kind: CallbackKind,
    name: &'a str,
    context: &'a C,
}

/// What the callback API receives when asked to generate a scheme
#[derive(Debug, Serialize)]
struct SchemeContext<'a> {
    scheme_code: &'a str,
    parameters: &'a ParameterMap,
}

/// The callback API answers with the same envelope the workflow API uses
#[derive(Debug, Deserialize)]
struct CallbackResponse {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: String,
}

#[derive(Debug, Clone)]
pub struct CallbackConfig {
    pub url: Option<String>,
    pub timeout: Duration,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Action, rule and scheme provider. Names registered as code actions run
/// in process; everything else goes to the callback API.
///
/// Without a configured URL unregistered names fail.
#[derive(Debug, Clone)]
pub struct CallbackProvider {
    client: Client,
    url: Option<String>,
    code_actions: CodeActionRegistry,
}

impl CallbackProvider {
    pub fn new(config: &CallbackConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone().filter(|url| !url.trim().is_empty()),
            code_actions: CodeActionRegistry::new(),
        })
    }

    pub fn with_code_actions(mut self, code_actions: CodeActionRegistry) -> Self {
        self.code_actions = code_actions;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    async fn call<C: Serialize + Sync>(
        &self,
        kind: CallbackKind,
        name: &str,
        context: &C,
    ) -> Result<Value, DomainError> {
        let url = self.url.as_deref().ok_or_else(|| {
            DomainError::callback(format!(
                "{} '{}' is not registered and no callback API is configured",
                kind, name
            ))
        })?;

        debug!(kind = %kind, name = %name, "Calling callback API");

        let response = self
            .client
            .post(url)
            .json(&CallbackRequest {
                kind,
                name,
                context,
            })
            .send()
            .await
            .map_err(|e| DomainError::callback(format!("Request to callback API failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::callback(format!(
                "Callback API returned HTTP {}: {}",
                status, body
            )));
        }

        let body: CallbackResponse = response.json().await.map_err(|e| {
            DomainError::callback(format!("Failed to parse callback API response: {}", e))
        })?;

        if !body.success {
            let reason = if body.error.is_empty() {
                "no reason given".to_string()
            } else {
                body.error
            };
            return Err(DomainError::callback(format!("{} '{}' failed: {}", kind, name, reason)));
        }

        Ok(body.data)
    }
}

#[async_trait]
impl ActionProvider for CallbackProvider {
    async fn execute_action(&self, name: &str, context: &ActionContext) -> Result<(), DomainError> {
        if let Some(action) = self.code_actions.action(name) {
            return action.execute(context).await;
        }

        self.call(CallbackKind::Action, name, context).await.map(|_| ())
    }
}

#[async_trait]
impl RuleProvider for CallbackProvider {
    async fn check_rule(&self, name: &str, context: &ActionContext) -> Result<bool, DomainError> {
        if let Some(rule) = self.code_actions.rule(name) {
            return Ok(rule.check(context));
        }

        let data = self.call(CallbackKind::Rule, name, context).await?;

        data.as_bool().ok_or_else(|| {
            DomainError::callback(format!("Rule '{}' returned a non-boolean result: {}", name, data))
        })
    }
}

#[async_trait]
impl SchemeGenerator for CallbackProvider {
    async fn generate_scheme(
        &self,
        scheme_code: &str,
        parameters: &ParameterMap,
    ) -> Result<ProcessScheme, DomainError> {
        let context = SchemeContext {
            scheme_code,
            parameters,
        };
        let data = self.call(CallbackKind::Scheme, scheme_code, &context).await?;

        // Schemes may come back as an object or as serialized JSON text
        let data = match data {
            Value::String(text) => serde_json::from_str(&text).map_err(|e| {
                DomainError::callback(format!("Scheme '{}' is not valid JSON: {}", scheme_code, e))
            })?,
            other => other,
        };

        let scheme: ProcessScheme = serde_json::from_value(data).map_err(|e| {
            DomainError::callback(format!("Scheme '{}' could not be read: {}", scheme_code, e))
        })?;

        if scheme.code != scheme_code {
            return Err(DomainError::callback(format!(
                "Callback API returned scheme '{}' when asked for '{}'",
                scheme.code, scheme_code
            )));
        }

        scheme.validate()?;
        Ok(scheme)
    }
}
