//! Infrastructure layer - backends, callbacks and the reference engine

pub mod backend;
pub mod callback;
pub mod engine;
pub mod logging;
