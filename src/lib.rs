// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod accounts;
pub mod admin;
pub mod api;
pub mod config;
pub mod events;
pub mod fraud;
pub mod identity;
pub mod ingestion;
pub mod ledger;
pub mod offers;
pub mod payouts;
pub mod tiers;
pub mod version;
pub mod wallets;

// Re-export main types
pub use accounts::{AccountError, AccountRegistry, AccountStatus, CreatorAccount, CreatorId};
pub use admin::{AdminControl, AdminError, CreatorOverview, MassBonusReport};
pub use api::{ApiConfig, ApiError, ApiServer, AppState, ErrorResponse};
pub use config::{PayoutConfig, TierSchedule};
pub use events::{EventBus, NotificationEvent};
pub use fraud::{FlagOutcome, FlagRegistry, FlagSeverity, FlagStatus, FraudError, FraudFlag, FraudMonitor};
pub use identity::{IdentityProvider, StaticIdentityProvider};
pub use ingestion::{AccrualError, ViewIngestor};
pub use ledger::{Cents, EntrySource, LedgerEntry, LedgerError, LedgerStore, MilliCents};
pub use offers::{Offer, OfferBook, OfferError, OfferKind};
pub use payouts::{
    PayoutError, PayoutManager, PayoutRequest, PayoutStatus, SuspensionOutcome, WalletSnapshot,
};
pub use tiers::{Tier, TierEngine, TierError, TierReview, TierState};
pub use wallets::{InMemoryWalletDirectory, WalletDirectory, WalletRecord};
