//! Parameter domain - raw parameter bags, declared parameter types, typed
//! values and coercion

mod bag;
mod coercion;
mod type_tag;
mod value;

pub use bag::ParameterBag;
pub use coercion::{coerce, CoercionError};
pub use type_tag::{ParameterDescriptor, TypeTag};
pub use value::{ParameterMap, TypedValue};
