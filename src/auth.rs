//! Token secrets, token readers, and OAuth scope parsing.

pub mod reader;
pub mod scope;
pub mod secret;

pub use reader::*;
pub use scope::*;
pub use secret::*;
