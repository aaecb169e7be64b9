mod common;

use backend::WriteResponse;
use common::engine;
use engine::{CategoryInput, EngineError, EntryKind, MoneyCents, Operation};

fn accepted_without_results() -> WriteResponse {
    WriteResponse {
        success: true,
        ..WriteResponse::default()
    }
}

#[tokio::test]
async fn write_without_returned_rows_is_no_data() {
    let engine = engine();
    engine.backend().script_writes(accepted_without_results());

    let err = engine
        .create_category(&CategoryInput {
            name: "Pets".to_string(),
            kind: EntryKind::Expense,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::NoData {
            operation: Operation::Create,
            collection: "category_c",
        }
    ));
    assert_eq!(err.to_string(), "create on category_c returned no data");
}

#[tokio::test]
async fn delete_without_results_counts_as_deleted() {
    let engine = engine();
    engine.backend().script_writes(accepted_without_results());

    assert!(engine.delete_budget(3).await.unwrap());
    assert_eq!(engine.backend().deletes(), 1);
}

#[tokio::test]
async fn refused_write_carries_the_backend_message() {
    let engine = engine();
    engine.backend().script_writes(WriteResponse {
        success: false,
        message: Some("quota".to_string()),
        results: None,
    });

    let err = engine.delete_budget(3).await.unwrap_err();

    match &err {
        EngineError::Rejected {
            operation,
            collection,
            message,
        } => {
            assert_eq!(*operation, Operation::Delete);
            assert_eq!(*collection, "budget_c");
            assert_eq!(message, "quota");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "delete on budget_c rejected: quota");
}

#[tokio::test]
async fn transport_failure_on_read_yields_nothing() {
    let engine = engine();
    engine
        .upsert_budget("Food", MoneyCents::new(100), 3, 2024)
        .await
        .unwrap();
    engine.backend().drop_reads();

    assert!(engine.budgets().await.is_empty());
    assert!(engine.budgets_for_period(3, 2024).await.is_empty());
    assert!(engine.budget(1).await.is_none());
    assert!(engine.savings_goals().await.is_empty());
}

#[tokio::test]
async fn transport_failure_on_upsert_lookup_is_an_error() {
    let engine = engine();
    engine.backend().drop_reads();

    let err = engine
        .upsert_budget("Food", MoneyCents::new(100), 3, 2024)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Backend(_)));
    assert_eq!(engine.backend().calls().len(), 1);
}
