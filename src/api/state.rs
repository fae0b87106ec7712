//! Application state shared by the handlers

use crate::domain::Locale;
use crate::infrastructure::backend::EngineHandle;

/// Engine handle plus request defaults; cloned into every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: EngineHandle,
    /// Culture used when a request carries none
    pub default_culture: Locale,
}

impl AppState {
    pub fn new(engine: EngineHandle, default_culture: Locale) -> Self {
        Self {
            engine,
            default_culture,
        }
    }
}
