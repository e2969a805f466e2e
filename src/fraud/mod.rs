pub mod monitor;
pub mod registry;
pub mod types;

pub use monitor::FraudMonitor;
pub use registry::FlagRegistry;
pub use types::{FlagOutcome, FlagSeverity, FlagStatus, FraudError, FraudFlag};
