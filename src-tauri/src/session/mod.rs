//! Session history: the analyzed uploads and the saved API key, backed
//! by a single JSON document on disk.

pub mod store;
pub mod types;

pub use store::SessionStore;
pub use types::Session;
