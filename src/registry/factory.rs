use crate::error::Result;
use crate::modrinth::ModrinthClient;
use crate::registry::RegistryClient;
use std::sync::Arc;
use std::time::Duration;

pub struct RegistryFactory;

impl RegistryFactory {
    pub fn create_modrinth(api_url: &str, timeout: Duration) -> Result<Arc<dyn RegistryClient>> {
        let client = ModrinthClient::with_base_url(api_url, timeout)?;
        Ok(Arc::new(client))
    }
}
