mod common;

use common::{Call, engine};
use engine::{BudgetInput, EngineError, MoneyCents, Operation};

fn input(category: &str, cents: i64, month: u32, year: i32) -> BudgetInput {
    BudgetInput {
        category: category.to_string(),
        monthly_limit: MoneyCents::new(cents),
        month,
        year,
    }
}

#[tokio::test]
async fn upsert_creates_then_updates_the_same_budget() {
    let engine = engine();

    let first = engine
        .upsert_budget("Food", MoneyCents::new(40000), 3, 2024)
        .await
        .unwrap();
    let second = engine
        .upsert_budget("Food", MoneyCents::new(45000), 3, 2024)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.monthly_limit, MoneyCents::new(45000));

    let budgets = engine.budgets().await;
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].monthly_limit, MoneyCents::new(45000));
}

#[tokio::test]
async fn upsert_keys_on_category_month_and_year() {
    let engine = engine();
    engine
        .upsert_budget("Food", MoneyCents::new(40000), 3, 2024)
        .await
        .unwrap();
    engine
        .upsert_budget("Food", MoneyCents::new(40000), 4, 2024)
        .await
        .unwrap();
    engine
        .upsert_budget("Food", MoneyCents::new(40000), 3, 2025)
        .await
        .unwrap();
    engine
        .upsert_budget("Transport", MoneyCents::new(8000), 3, 2024)
        .await
        .unwrap();

    assert_eq!(engine.budgets().await.len(), 4);
}

#[tokio::test]
async fn upsert_updates_existing_row_in_place() {
    let engine = engine();
    let created = engine.create_budget(&input("Utilities", 10000, 1, 2024)).await.unwrap();
    engine.backend().clear();

    let updated = engine
        .upsert_budget("Utilities", MoneyCents::new(12500), 1, 2024)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    let calls = engine.backend().calls();
    assert!(matches!(calls[0], Call::Fetch(..)));
    let Call::Update(table, records) = &calls[1] else {
        panic!("expected an update call, got {calls:?}");
    };
    assert_eq!(table, "budget_c");
    assert_eq!(records[0]["Id"], created.id);
    assert_eq!(records[0]["Name_c"], "Utilities Budget");
    assert_eq!(records[0]["Monthly_Limit_c"], 125);
}

#[tokio::test]
async fn upsert_lookup_failure_is_an_error() {
    let engine = engine();
    engine.backend().reject_reads();

    let err = engine
        .upsert_budget("Food", MoneyCents::new(100), 3, 2024)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Rejected {
            operation: Operation::Fetch,
            collection: "budget_c",
            ..
        }
    ));
    assert!(
        !engine
            .backend()
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Create(..) | Call::Update(..)))
    );
}

#[tokio::test]
async fn invalid_budgets_never_reach_the_backend() {
    let engine = engine();

    assert!(matches!(
        engine.upsert_budget("Food", MoneyCents::new(-1), 3, 2024).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.upsert_budget("Food", MoneyCents::new(100), 13, 2024).await,
        Err(EngineError::Parse(_))
    ));
    assert!(matches!(
        engine.create_budget(&input("  ", 100, 3, 2024)).await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(engine.backend().calls().is_empty());
}

#[tokio::test]
async fn period_queries_filter_on_month_and_year() {
    let engine = engine();
    engine.create_budget(&input("Food", 40000, 3, 2024)).await.unwrap();
    engine.create_budget(&input("Food", 40000, 3, 2025)).await.unwrap();
    engine.create_budget(&input("Food", 40000, 4, 2024)).await.unwrap();

    assert_eq!(engine.budgets_by_month(3).await.len(), 2);

    let period = engine.budgets_for_period(3, 2024).await;
    assert_eq!(period.len(), 1);
    assert_eq!((period[0].month, period[0].year), (3, 2024));
}

#[tokio::test]
async fn update_and_delete_by_id() {
    let engine = engine();
    let created = engine.create_budget(&input("Shopping", 5000, 6, 2024)).await.unwrap();

    let updated = engine
        .update_budget(created.id, &input("Shopping", 7500, 6, 2024))
        .await
        .unwrap();
    assert_eq!(updated.monthly_limit, MoneyCents::new(7500));
    assert_eq!(engine.budget(created.id).await.unwrap(), updated);

    assert!(engine.delete_budget(created.id).await.unwrap());
    assert!(engine.budget(created.id).await.is_none());
}

#[tokio::test]
async fn failed_update_entry_names_operation_and_collection() {
    let engine = engine();
    let created = engine.create_budget(&input("Food", 100, 1, 2024)).await.unwrap();
    engine.backend().fail_writes();

    let err = engine
        .update_budget(created.id, &input("Food", 200, 1, 2024))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "failed to update 1 record(s) in budget_c");
}
