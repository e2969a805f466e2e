use super::common::harness;
use creator_ledger_node::{FlagOutcome, FlagSeverity, FlagStatus, FraudError};
use uuid::Uuid;

#[tokio::test]
async fn test_raise_creates_pending_flag() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    let flag = h
        .fraud
        .raise(
            "creator-1",
            "view-botting",
            FlagSeverity::Medium,
            "views spiked 40x overnight",
        )
        .await
        .unwrap();

    assert_eq!(flag.status, FlagStatus::Pending);
    assert_eq!(flag.creator_id, "creator-1");
    assert!(flag.resolved_at.is_none());
}

#[tokio::test]
async fn test_multiple_pending_flags_allowed() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    h.fraud
        .raise("creator-1", "view-botting", FlagSeverity::Low, "spike")
        .await
        .unwrap();
    h.fraud
        .raise("creator-1", "payment-abuse", FlagSeverity::High, "card churn")
        .await
        .unwrap();

    assert_eq!(h.fraud.flags_for("creator-1").await.len(), 2);
}

#[tokio::test]
async fn test_raise_for_unknown_creator() {
    let h = harness().await;
    let result = h
        .fraud
        .raise("ghost", "view-botting", FlagSeverity::Low, "spike")
        .await;
    assert!(matches!(result, Err(FraudError::UnknownCreator(_))));
}

#[tokio::test]
async fn test_blocking_severity_threshold() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts.register("creator-2").await.unwrap();

    h.fraud
        .raise("creator-1", "metadata-mismatch", FlagSeverity::Medium, "odd")
        .await
        .unwrap();
    h.fraud
        .raise("creator-2", "payment-abuse", FlagSeverity::Critical, "stolen card")
        .await
        .unwrap();

    assert!(!h.fraud.has_blocking_flag("creator-1").await);
    assert!(h.fraud.has_blocking_flag("creator-2").await);
}

#[tokio::test]
async fn test_investigation_then_clean_resolution() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    let flag = h
        .fraud
        .raise("creator-1", "view-botting", FlagSeverity::High, "spike")
        .await
        .unwrap();

    let flag = h.fraud.begin_investigation(flag.id).await.unwrap();
    assert_eq!(flag.status, FlagStatus::Investigating);

    let flag = h
        .fraud
        .resolve(
            flag.id,
            FlagOutcome::Resolved,
            Some("traffic traced to a legitimate embed".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(flag.status, FlagStatus::Resolved);
    assert!(flag.resolved_at.is_some());

    // clean resolution has no account side effects
    let account = h.accounts.get("creator-1").await.unwrap();
    assert_eq!(account.strikes, 0);
    assert!(!h.fraud.has_blocking_flag("creator-1").await);
}

#[tokio::test]
async fn test_resolved_flag_cannot_transition_again() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    let flag = h
        .fraud
        .raise("creator-1", "view-botting", FlagSeverity::Low, "spike")
        .await
        .unwrap();
    h.fraud
        .resolve(flag.id, FlagOutcome::Resolved, None)
        .await
        .unwrap();

    let result = h.fraud.resolve(flag.id, FlagOutcome::Confirmed, None).await;
    assert!(matches!(
        result,
        Err(FraudError::InvalidTransition(FlagStatus::Resolved))
    ));
}

#[tokio::test]
async fn test_unknown_flag() {
    let h = harness().await;
    let result = h.fraud.resolve(Uuid::new_v4(), FlagOutcome::Resolved, None).await;
    assert!(matches!(result, Err(FraudError::FlagNotFound(_))));
}
