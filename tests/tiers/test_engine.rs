use super::common::{drain_event_kinds, harness};
use creator_ledger_node::{FlagSeverity, Tier, TierError};

#[tokio::test]
async fn test_recompute_does_not_persist() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts.add_views("creator-1", 12_000).await.unwrap();

    let review = h.tiers.recompute("creator-1").await.unwrap();
    assert_eq!(review.current, Tier::Bronze);
    assert_eq!(review.eligible, Tier::Silver);

    // nothing persisted until the admin approves
    assert_eq!(h.tiers.state_for("creator-1").await.level, Tier::Bronze);
}

#[tokio::test]
async fn test_approve_persists_and_emits() {
    let mut h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts.add_views("creator-1", 60_000).await.unwrap();

    // 60k views implies gold eligibility directly
    let state = h.tiers.approve("creator-1", Tier::Gold).await.unwrap();
    assert_eq!(state.level, Tier::Gold);
    assert_eq!(state.per_view_rate, 1_000);
    assert_eq!(state.views_at_recompute, 60_000);

    assert!(drain_event_kinds(&mut h).contains(&"tier.approved"));
}

#[tokio::test]
async fn test_approve_rejects_non_increasing_tier() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts.add_views("creator-1", 12_000).await.unwrap();
    h.tiers.approve("creator-1", Tier::Silver).await.unwrap();

    for requested in [Tier::Bronze, Tier::Silver] {
        let result = h.tiers.approve("creator-1", requested).await;
        assert!(matches!(result, Err(TierError::InvalidTransition { .. })));
    }
}

#[tokio::test]
async fn test_approve_rejects_tier_not_implied_by_views() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts.add_views("creator-1", 12_000).await.unwrap();

    // only silver is implied by 12k views
    let result = h.tiers.approve("creator-1", Tier::Gold).await;
    assert!(matches!(result, Err(TierError::InvalidTransition { .. })));
}

#[tokio::test]
async fn test_deny_leaves_state_and_records_review() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts.add_views("creator-1", 12_000).await.unwrap();

    h.tiers.deny("creator-1").await.unwrap();

    assert_eq!(h.tiers.state_for("creator-1").await.level, Tier::Bronze);
    let decisions = h.tiers.decisions().await;
    assert_eq!(decisions.len(), 1);
    assert!(decisions[0].approved.is_none());
}

#[tokio::test]
async fn test_blocking_flag_gates_upgrade() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts.add_views("creator-1", 12_000).await.unwrap();
    h.fraud
        .raise(
            "creator-1",
            "view-botting",
            FlagSeverity::High,
            "suspect the threshold was botted",
        )
        .await
        .unwrap();

    let result = h.tiers.approve("creator-1", Tier::Silver).await;
    assert!(matches!(result, Err(TierError::Blocked)));
}

#[tokio::test]
async fn test_pending_eligible_queue() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts.register("creator-2").await.unwrap();
    h.accounts.add_views("creator-1", 15_000).await.unwrap();
    h.accounts.add_views("creator-2", 100).await.unwrap();

    let pending = h.tiers.pending_eligible().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].creator_id, "creator-1");
    assert_eq!(pending[0].eligible, Tier::Silver);

    // approving clears the queue
    h.tiers.approve("creator-1", Tier::Silver).await.unwrap();
    assert!(h.tiers.pending_eligible().await.is_empty());
}

#[tokio::test]
async fn test_tier_never_downgrades_from_recompute() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts.add_views("creator-1", 12_000).await.unwrap();
    h.tiers.approve("creator-1", Tier::Silver).await.unwrap();

    // view counters only grow in practice, but eligibility is clamped to
    // the stored tier regardless
    let review = h.tiers.recompute("creator-1").await.unwrap();
    assert_eq!(review.eligible, Tier::Silver);
    assert_eq!(h.tiers.state_for("creator-1").await.level, Tier::Silver);
}
