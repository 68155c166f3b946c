//! Core data model: controls and their implementation status

pub mod control;
pub mod error;
pub mod status;

pub use control::{family_code, Control};
pub use error::ParseError;
pub use status::ImplementationStatus;
