use super::common::harness;
use creator_ledger_node::{EntrySource, Tier};

#[tokio::test]
async fn test_views_accrue_at_bronze_rate() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    // 1000 views at 500 millicents/view = 500 cents
    let entry = h.ingestor.accrue("creator-1", 1000).await.unwrap().unwrap();
    assert_eq!(entry.source, EntrySource::ViewEarning);
    assert_eq!(entry.amount, 500);

    let account = h.accounts.get("creator-1").await.unwrap();
    assert_eq!(account.total_views, 1000);
}

#[tokio::test]
async fn test_zero_view_delta_is_ignored() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    assert!(h.ingestor.accrue("creator-1", 0).await.unwrap().is_none());
    assert!(h.ledger.entries_for("creator-1").await.is_empty());
}

#[tokio::test]
async fn test_sub_cent_delta_bumps_counter_only() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    // a single view at the bronze rate rounds down to zero cents
    assert!(h.ingestor.accrue("creator-1", 1).await.unwrap().is_none());

    let account = h.accounts.get("creator-1").await.unwrap();
    assert_eq!(account.total_views, 1);
    assert!(h.ledger.entries_for("creator-1").await.is_empty());
}

#[tokio::test]
async fn test_rate_follows_approved_tier() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    h.ingestor.accrue("creator-1", 10_000).await.unwrap();
    h.tiers.approve("creator-1", Tier::Silver).await.unwrap();

    // silver pays 700 millicents per view
    let entry = h.ingestor.accrue("creator-1", 1000).await.unwrap().unwrap();
    assert_eq!(entry.amount, 700);
}

#[tokio::test]
async fn test_explicit_rate_override() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    let entry = h
        .ingestor
        .accrue_at_rate("creator-1", 2000, 1_500)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.amount, 3000);
}
