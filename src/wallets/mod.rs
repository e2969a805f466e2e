use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Destination record held by the external wallet directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    pub crypto_type: String,
    pub wallet_address: String,
}

/// Read-only seam to the wallet directory. Callers bound lookups with their
/// own timeout and treat elapsed lookups as retryable.
#[async_trait::async_trait]
pub trait WalletDirectory: Send + Sync {
    async fn wallet_for(&self, creator_id: &str) -> Result<Option<WalletRecord>>;
}

pub struct InMemoryWalletDirectory {
    wallets: Arc<RwLock<HashMap<String, WalletRecord>>>,
}

impl InMemoryWalletDirectory {
    pub fn new() -> Self {
        Self {
            wallets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn set_wallet(&self, creator_id: &str, record: WalletRecord) {
        self.wallets
            .write()
            .await
            .insert(creator_id.to_string(), record);
    }
}

impl Default for InMemoryWalletDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl WalletDirectory for InMemoryWalletDirectory {
    async fn wallet_for(&self, creator_id: &str) -> Result<Option<WalletRecord>> {
        Ok(self.wallets.read().await.get(creator_id).cloned())
    }
}
