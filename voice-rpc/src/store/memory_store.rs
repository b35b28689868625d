use super::CredentialStore;
use crate::Result;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    token: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn access_token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set_access_token(&self, token: Option<String>) -> Result<()> {
        *self.token.write() = token;
        Ok(())
    }
}
