pub mod settings;

pub use settings::{PayoutConfig, TierSchedule};
