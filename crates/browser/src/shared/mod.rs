pub mod errors;
pub mod js;

pub use errors::{is_context_lost, to_session_error};
