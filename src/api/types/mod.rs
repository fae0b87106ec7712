//! Wire types shared by the HTTP endpoints

pub mod envelope;
pub mod params;

pub use envelope::ResponseEnvelope;
pub use params::{ParamsRejection, RequestParams};
