// Version information for the Creator Ledger Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-monetization-core-2026-08-08";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-08-08";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "append-only-ledger",
    "derived-balances",
    "tier-progression",
    "admin-gated-upgrades",
    "fraud-flags",
    "strike-tracking",
    "payout-workflow",
    "fifo-settlement",
    "mass-bonus",
    "promo-offers",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Creator Ledger Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
