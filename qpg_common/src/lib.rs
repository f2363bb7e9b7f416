mod helpers;
mod secret;

pub use helpers::{parse_boolean_flag, require_non_empty};
pub use secret::Secret;
