use super::common::{creator_with_wallet, harness};
use creator_ledger_node::{EntrySource, PayoutError, PayoutStatus};

#[tokio::test]
async fn test_submit_snapshots_full_balance() {
    let h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 2500, None)
        .await
        .unwrap();

    let request = h.payouts.submit("creator-1", "4821").await.unwrap();

    assert_eq!(request.status, PayoutStatus::Pending);
    assert_eq!(request.amount, 2500);
    assert_eq!(request.destination.address, "0xcreator-1");
    // balance stays computable until settlement
    assert_eq!(h.ledger.balance("creator-1").await, 2500);
}

#[tokio::test]
async fn test_fee_is_informational() {
    let h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 2500, None)
        .await
        .unwrap();

    let request = h.payouts.submit("creator-1", "4821").await.unwrap();

    // 3% fee shown to the creator; the snapshot amount is untouched
    assert_eq!(request.amount_after_fee, 2425);
    assert_eq!(request.amount, 2500);
}

#[tokio::test]
async fn test_submit_below_minimum() {
    let h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 1000, None)
        .await
        .unwrap();

    let result = h.payouts.submit("creator-1", "4821").await;
    assert!(matches!(
        result,
        Err(PayoutError::BelowMinimum {
            balance: 1000,
            minimum: 1800
        })
    ));
}

#[tokio::test]
async fn test_submit_wrong_pin() {
    let h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 5000, None)
        .await
        .unwrap();

    let result = h.payouts.submit("creator-1", "0000").await;
    assert!(matches!(result, Err(PayoutError::AuthenticationFailed)));
}

#[tokio::test]
async fn test_submit_without_wallet() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.accounts
        .set_withdrawal_pin("creator-1", "4821")
        .await
        .unwrap();
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 5000, None)
        .await
        .unwrap();

    let result = h.payouts.submit("creator-1", "4821").await;
    assert!(matches!(result, Err(PayoutError::WalletNotConfigured)));
}

#[tokio::test]
async fn test_duplicate_request_rejected() {
    let h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 5000, None)
        .await
        .unwrap();

    h.payouts.submit("creator-1", "4821").await.unwrap();
    let result = h.payouts.submit("creator-1", "4821").await;
    assert!(matches!(result, Err(PayoutError::DuplicateRequest)));
}

#[tokio::test]
async fn test_concurrent_submits_one_wins() {
    let h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 5000, None)
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        h.payouts.submit("creator-1", "4821"),
        h.payouts.submit("creator-1", "4821"),
    );

    let ok_count = [a.is_ok(), b.is_ok()].iter().filter(|v| **v).count();
    assert_eq!(ok_count, 1);

    let failure = if a.is_err() { a } else { b };
    assert!(matches!(failure, Err(PayoutError::DuplicateRequest)));

    // at-most-one-pending holds afterwards
    let open: Vec<_> = h
        .payouts
        .requests_for("creator-1")
        .await
        .into_iter()
        .filter(|r| !r.status.is_terminal())
        .collect();
    assert_eq!(open.len(), 1);
}

#[tokio::test]
async fn test_resubmit_after_rejection() {
    let h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 5000, None)
        .await
        .unwrap();

    let first = h.payouts.submit("creator-1", "4821").await.unwrap();
    h.payouts.reject(first.id, "destination mismatch").await.unwrap();

    // terminal request no longer counts as open
    let second = h.payouts.submit("creator-1", "4821").await.unwrap();
    assert_eq!(second.status, PayoutStatus::Pending);
}

#[tokio::test]
async fn test_deduction_can_block_resubmission() {
    let h = harness().await;
    creator_with_wallet(&h, "creator-1", "4821").await;
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 2000, None)
        .await
        .unwrap();
    h.admin
        .debit("creator-1", 3000, "chargeback claw-back")
        .await
        .unwrap();

    // negative balance is allowed, withdrawal just stays blocked
    assert_eq!(h.ledger.balance("creator-1").await, -1000);
    let result = h.payouts.submit("creator-1", "4821").await;
    assert!(matches!(result, Err(PayoutError::BelowMinimum { .. })));

    // earnings recover the balance past the threshold
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 3000, None)
        .await
        .unwrap();
    assert!(h.payouts.submit("creator-1", "4821").await.is_ok());
}
