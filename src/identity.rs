use crate::accounts::CreatorId;
use anyhow::Result;

/// Opaque identity provider seam. The core trusts the resolved id as the
/// creator account key and never inspects the token.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Option<CreatorId>>;
}

/// Pass-through provider: the presented token is already the stable user id
/// issued upstream. Used when the edge proxy has authenticated the session.
pub struct StaticIdentityProvider;

#[async_trait::async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Option<CreatorId>> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token.to_string()))
    }
}
