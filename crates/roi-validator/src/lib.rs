//! Detection Box Validation
//!
//! Decides whether a detected subject may be captured: inside the visible
//! view, inside the region of interest, and within the configured size
//! bounds.

mod message;
mod validator;

pub use message::Message;
pub use validator::{validate, RoiValidator, ValidationResult};
