use super::common::{creator_with_wallet, drain_event_kinds, harness};
use creator_ledger_node::{
    AccountStatus, EntrySource, FlagOutcome, FlagSeverity, PayoutError, PayoutStatus,
};

#[tokio::test]
async fn test_confirmation_applies_full_bundle() {
    let mut h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 5000, None)
        .await
        .unwrap();

    let request = h.payouts.submit("creator-1", "4821").await.unwrap();
    h.payouts.approve(request.id, None).await.unwrap();

    let flag = h
        .fraud
        .raise(
            "creator-1",
            "payment-abuse",
            FlagSeverity::Critical,
            "linked to a charged-back card ring",
        )
        .await
        .unwrap();

    h.fraud
        .resolve(
            flag.id,
            FlagOutcome::Confirmed,
            Some("account terminated".to_string()),
        )
        .await
        .unwrap();

    // suspended AND strike AND force-rejected payout, never one without
    // the others
    let account = h.accounts.get("creator-1").await.unwrap();
    assert_eq!(account.status, AccountStatus::Suspended);
    assert_eq!(account.strikes, 1);

    let payout = h.payouts.request(request.id).await.unwrap();
    assert_eq!(payout.status, PayoutStatus::Rejected);
    assert!(payout
        .rejection_reason
        .as_deref()
        .unwrap()
        .contains("suspended"));

    // the ledger was never touched
    assert_eq!(h.ledger.balance("creator-1").await, 5000);

    let kinds = drain_event_kinds(&mut h);
    assert!(kinds.contains(&"flag.confirmed"));
    assert!(kinds.contains(&"payout.rejected"));
}

#[tokio::test]
async fn test_confirmation_without_open_payout() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    let flag = h
        .fraud
        .raise("creator-1", "view-botting", FlagSeverity::High, "bot farm")
        .await
        .unwrap();
    h.fraud
        .resolve(flag.id, FlagOutcome::Confirmed, None)
        .await
        .unwrap();

    let account = h.accounts.get("creator-1").await.unwrap();
    assert_eq!(account.status, AccountStatus::Suspended);
    assert_eq!(account.strikes, 1);
}

#[tokio::test]
async fn test_suspension_blocks_future_submissions_at_approval() {
    let h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 5000, None)
        .await
        .unwrap();

    let flag = h
        .fraud
        .raise("creator-1", "view-botting", FlagSeverity::High, "bot farm")
        .await
        .unwrap();
    h.fraud
        .resolve(flag.id, FlagOutcome::Confirmed, None)
        .await
        .unwrap();

    // the suspended account blocks approval of anything new
    let request = h.payouts.submit("creator-1", "4821").await.unwrap();
    let result = h.payouts.approve(request.id, None).await;
    assert!(matches!(result, Err(PayoutError::BlockedByFraud)));
}

#[tokio::test]
async fn test_repeat_confirmations_accumulate_strikes() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    for n in 1..=3u32 {
        let flag = h
            .fraud
            .raise("creator-1", "view-botting", FlagSeverity::High, "again")
            .await
            .unwrap();
        h.fraud
            .resolve(flag.id, FlagOutcome::Confirmed, None)
            .await
            .unwrap();

        let account = h.accounts.get("creator-1").await.unwrap();
        assert_eq!(account.strikes, n);
    }
}
