pub mod manager;
pub mod types;

pub use manager::{PayoutManager, SuspensionOutcome};
pub use types::{PayoutError, PayoutRequest, PayoutStatus, WalletSnapshot};
