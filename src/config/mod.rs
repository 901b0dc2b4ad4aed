//! Typed configuration cells and document loading

pub mod cell;
pub mod registry;
pub mod value;

pub use cell::{ConfigCell, ConfigListener, ConfigVar};
pub use registry::{is_valid_key, ConfigRegistry};
pub use value::ConfigValue;
