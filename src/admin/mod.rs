pub mod surface;

pub use surface::{AdminControl, AdminError, CreatorOverview, MassBonusReport};
