use super::common::harness;
use creator_ledger_node::EntrySource;
use std::sync::Arc;

#[tokio::test]
async fn test_fund_increases_balance_exactly() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    let before = h.ledger.balance("creator-1").await;
    h.admin
        .fund("creator-1", 500, "holiday bonus")
        .await
        .unwrap();

    assert_eq!(h.ledger.balance("creator-1").await, before + 500);

    let entries = h.ledger.entries_for("creator-1").await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].source, EntrySource::AdminBonus);
    assert_eq!(entries[0].amount, 500);
    assert!(!entries[0].paid);
    assert_eq!(entries[0].note.as_deref(), Some("holiday bonus"));
}

#[tokio::test]
async fn test_debit_is_a_negative_entry() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();
    h.admin.fund("creator-1", 1000, "seed").await.unwrap();

    h.admin
        .debit("creator-1", 400, "duplicate payment reversal")
        .await
        .unwrap();

    assert_eq!(h.ledger.balance("creator-1").await, 600);
    let entries = h.ledger.entries_for("creator-1").await;
    assert_eq!(entries[1].source, EntrySource::AdminDeduction);
    assert_eq!(entries[1].amount, -400);
}

#[tokio::test]
async fn test_balance_invariant_under_concurrent_writes() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    let mut handles = Vec::new();
    for i in 1..=20i64 {
        let ledger = Arc::clone(&h.ledger);
        handles.push(tokio::spawn(async move {
            ledger
                .record_entry("creator-1", EntrySource::ViewEarning, i * 10, None)
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // balance equals the unpaid entry sum no matter the write order
    let expected: i64 = (1..=20i64).map(|i| i * 10).sum();
    assert_eq!(h.ledger.balance("creator-1").await, expected);

    let unpaid_sum: i64 = h
        .ledger
        .unpaid_entries("creator-1")
        .await
        .iter()
        .map(|e| e.amount)
        .sum();
    assert_eq!(unpaid_sum, expected);
}

#[tokio::test]
async fn test_aggregates_split_paid_and_earned() {
    let h = harness().await;
    h.accounts.register("creator-1").await.unwrap();

    let first = h
        .ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 800, None)
        .await
        .unwrap();
    h.ledger
        .record_entry("creator-1", EntrySource::ViewEarning, 1200, None)
        .await
        .unwrap();
    h.ledger
        .record_entry("creator-1", EntrySource::AdminDeduction, -300, None)
        .await
        .unwrap();

    h.ledger.mark_paid(&[first.id]).await.unwrap();

    assert_eq!(h.ledger.total_earned("creator-1").await, 2000);
    assert_eq!(h.ledger.total_paid_out("creator-1").await, 800);
    assert_eq!(h.ledger.balance("creator-1").await, 900);
}
