pub mod engine;
pub mod types;

pub use engine::TierEngine;
pub use types::{Tier, TierDecision, TierError, TierReview, TierState};
