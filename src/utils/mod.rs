pub mod helper;
pub mod serde_helpers;
