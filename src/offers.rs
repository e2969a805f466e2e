use crate::accounts::{AccountError, AccountRegistry};
use crate::ledger::{Cents, EntrySource, LedgerEntry, LedgerError, LedgerStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Promotional offers. Shallow by design: redemption does nothing beyond
/// synthesizing a ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    pub name: String,
    pub kind: OfferKind,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OfferKind {
    /// Fixed bonus in cents.
    FlatBonus { amount: Cents },
    /// Multiplier applied to the creator's unpaid view earnings; 1.5 pays
    /// out an extra 50% of those earnings.
    Multiplier { factor: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum OfferError {
    #[error("Offer not found: {0}")]
    UnknownOffer(Uuid),

    #[error("Offer is no longer active: {0}")]
    OfferInactive(Uuid),

    #[error("Redemption would produce no earnings")]
    NothingToRedeem,

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub struct OfferBook {
    offers: Arc<RwLock<HashMap<Uuid, Offer>>>,
    ledger: Arc<LedgerStore>,
    accounts: Arc<AccountRegistry>,
}

impl OfferBook {
    pub fn new(ledger: Arc<LedgerStore>, accounts: Arc<AccountRegistry>) -> Self {
        Self {
            offers: Arc::new(RwLock::new(HashMap::new())),
            ledger,
            accounts,
        }
    }

    pub async fn publish(&self, name: &str, kind: OfferKind) -> Offer {
        let offer = Offer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            active: true,
            created_at: Utc::now(),
        };
        self.offers.write().await.insert(offer.id, offer.clone());
        info!("Published offer {} ({})", offer.name, offer.id);
        offer
    }

    pub async fn deactivate(&self, offer_id: Uuid) -> Result<(), OfferError> {
        let mut offers = self.offers.write().await;
        let offer = offers
            .get_mut(&offer_id)
            .ok_or(OfferError::UnknownOffer(offer_id))?;
        offer.active = false;
        Ok(())
    }

    pub async fn redeem(
        &self,
        creator_id: &str,
        offer_id: Uuid,
    ) -> Result<LedgerEntry, OfferError> {
        self.accounts.require(creator_id).await?;

        let offer = {
            let offers = self.offers.read().await;
            let offer = offers
                .get(&offer_id)
                .ok_or(OfferError::UnknownOffer(offer_id))?;
            if !offer.active {
                return Err(OfferError::OfferInactive(offer_id));
            }
            offer.clone()
        };

        let amount = match offer.kind {
            OfferKind::FlatBonus { amount } => amount,
            OfferKind::Multiplier { factor } => {
                let view_earnings: Cents = self
                    .ledger
                    .unpaid_entries(creator_id)
                    .await
                    .iter()
                    .filter(|e| e.source == EntrySource::ViewEarning)
                    .map(|e| e.amount)
                    .sum();
                ((view_earnings as f64) * (factor - 1.0)).round() as Cents
            }
        };

        if amount <= 0 {
            return Err(OfferError::NothingToRedeem);
        }

        let entry = self
            .ledger
            .record_entry(
                creator_id,
                EntrySource::PromoBonus,
                amount,
                Some(offer.name.clone()),
            )
            .await?;

        info!(
            "Creator {} redeemed offer {} for {} cents",
            creator_id, offer.name, amount
        );

        Ok(entry)
    }

    pub async fn offers(&self) -> Vec<Offer> {
        let mut offers: Vec<Offer> = self.offers.read().await.values().cloned().collect();
        offers.sort_by_key(|o| o.created_at);
        offers
    }
}
