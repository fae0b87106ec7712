//! Process scheme - states, commands and transitions of a workflow

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::locale::Locale;
use crate::domain::parameter::ParameterDescriptor;
use crate::domain::DomainError;

/// Definition of a workflow, addressed by its code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessScheme {
    pub code: String,
    /// Parameters accepted when an instance is created
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    pub states: Vec<SchemeState>,
    #[serde(default)]
    pub commands: Vec<SchemeCommand>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeState {
    pub name: String,
    /// Display names keyed by locale tag or bare language
    #[serde(default)]
    pub localized_names: HashMap<String, String>,
    #[serde(default)]
    pub is_initial: bool,
    /// Whether the state may be forced with `setstate`
    #[serde(default = "default_allow_set")]
    pub allow_set: bool,
}

fn default_allow_set() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeCommand {
    pub name: String,
    #[serde(default)]
    pub localized_names: HashMap<String, String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub command: String,
    /// Identities allowed to trigger the transition; empty means anyone
    #[serde(default)]
    pub actors: Vec<String>,
    /// Rule that must hold for the transition to fire
    #[serde(default)]
    pub condition: Option<String>,
    /// Action run when the transition fires
    #[serde(default)]
    pub action: Option<String>,
}

impl Transition {
    pub fn allows(&self, identities: &[String]) -> bool {
        self.actors.is_empty() || self.actors.iter().any(|a| identities.contains(a))
    }
}

impl ProcessScheme {
    pub fn initial_state(&self) -> Option<&SchemeState> {
        self.states.iter().find(|s| s.is_initial)
    }

    pub fn state(&self, name: &str) -> Option<&SchemeState> {
        self.states.iter().find(|s| s.name == name)
    }

    pub fn command(&self, name: &str) -> Option<&SchemeCommand> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Transitions leaving `state`, in declaration order
    pub fn transitions_from<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a Transition> {
        self.transitions.iter().filter(move |t| t.from == state)
    }

    /// Check internal consistency of the scheme
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.code.trim().is_empty() {
            return Err(DomainError::validation("Scheme code must not be empty"));
        }

        let initial = self.states.iter().filter(|s| s.is_initial).count();
        if initial != 1 {
            return Err(DomainError::validation(format!(
                "Scheme '{}' must declare exactly one initial state, found {}",
                self.code, initial
            )));
        }

        let mut names = HashSet::new();
        for state in &self.states {
            if !names.insert(state.name.as_str()) {
                return Err(DomainError::validation(format!(
                    "Scheme '{}' declares state '{}' twice",
                    self.code, state.name
                )));
            }
        }

        for transition in &self.transitions {
            for state in [&transition.from, &transition.to] {
                if !names.contains(state.as_str()) {
                    return Err(DomainError::validation(format!(
                        "Transition in scheme '{}' references unknown state '{}'",
                        self.code, state
                    )));
                }
            }

            if self.command(&transition.command).is_none() {
                return Err(DomainError::validation(format!(
                    "Transition in scheme '{}' references unknown command '{}'",
                    self.code, transition.command
                )));
            }
        }

        Ok(())
    }
}

/// Pick the display name for `locale`: exact tag, then language, then `name`
pub fn localize(names: &HashMap<String, String>, name: &str, locale: &Locale) -> String {
    names
        .get(locale.as_str())
        .or_else(|| names.get(locale.language()))
        .cloned()
        .unwrap_or_else(|| name.to_string())
}


#[cfg(test)]
mod tests {
    use super::fixtures::approval_scheme;
    use super::*;

    #[test]
    fn test_fixture_is_valid() {
        assert!(approval_scheme().validate().is_ok());
        assert_eq!(approval_scheme().initial_state().unwrap().name, "Draft");
    }

    #[test]
    fn test_validate_requires_single_initial_state() {
        let mut scheme = approval_scheme();
        scheme.states[1].is_initial = true;

        let err = scheme.validate().unwrap_err();
        assert!(err.to_string().contains("exactly one initial state"));
    }

    #[test]
    fn test_validate_rejects_unknown_command() {
        let mut scheme = approval_scheme();
        scheme.transitions[0].command = "reject".to_string();

        let err = scheme.validate().unwrap_err();
        assert!(err.to_string().contains("unknown command 'reject'"));
    }

    #[test]
    fn test_transition_actors() {
        let scheme = approval_scheme();
        let approve = &scheme.transitions[1];

        assert!(approve.allows(&["manager".to_string()]));
        assert!(!approve.allows(&["clerk".to_string()]));
        assert!(scheme.transitions[0].allows(&[]));
    }

    #[test]
    fn test_localize_prefers_exact_tag_then_language() {
        let scheme = approval_scheme();
        let de_de = Locale::new("de-DE").unwrap();
        let de_at = Locale::new("de-AT").unwrap();

        assert_eq!(localize(&scheme.states[2].localized_names, "Approved", &de_de), "Genehmigt");
        assert_eq!(localize(&scheme.states[2].localized_names, "Approved", &de_at), "Approved");
        assert_eq!(localize(&scheme.states[0].localized_names, "Draft", &de_at), "Entwurf");
    }

    #[test]
    fn test_scheme_deserializes_with_defaults() {
        let scheme: ProcessScheme = serde_json::from_str(
            r#"{"code":"simple","states":[{"name":"Start","is_initial":true}]}"#,
        )
        .unwrap();

        assert!(scheme.states[0].allow_set);
        assert!(scheme.transitions.is_empty());
        assert!(scheme.validate().is_ok());
    }
}
