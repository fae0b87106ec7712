//! Callback infrastructure - in-process code actions and the remote
//! callback API

mod builtin;
mod provider;

pub use builtin::{builtin_code_actions, HasIdentity, IsImpersonated, LogTransition};
pub use provider::{CallbackConfig, CallbackProvider};
