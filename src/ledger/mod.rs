pub mod store;
pub mod types;

pub use store::LedgerStore;
pub use types::{Cents, EntrySource, LedgerEntry, LedgerError, MilliCents};
