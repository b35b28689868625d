use crate::Result;

/// Persists the access token between runs.
pub trait CredentialStore: Send + Sync + 'static {
    fn access_token(&self) -> Option<String>;
    fn set_access_token(&self, token: Option<String>) -> Result<()>;
}

mod json_file_store;
pub use json_file_store::JsonFileStore;

mod memory_store;
pub use memory_store::MemoryStore;
