pub mod registry;

pub use registry::{AccountError, AccountRegistry, AccountStatus, CreatorAccount, CreatorId};
