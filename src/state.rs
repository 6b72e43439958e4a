use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = PgStore::connect(&config).await?;
        store.migrate().await?;
        tracing::info!("database ready");

        Ok(Self::from_parts(Arc::new(store), config))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_config(AppConfig::for_tests())
    }

    #[cfg(test)]
    pub fn fake_with_config(config: AppConfig) -> Self {
        Self::from_parts(
            Arc::new(crate::memory::MemoryStore::default()),
            Arc::new(config),
        )
    }
}
