mod common;

use chrono::NaiveDate;
use common::{Call, engine};
use engine::{Engine, EngineError, MoneyCents, SavingsGoal, SavingsGoalInput};

fn input(title: &str, target: i64, current: i64, deadline: &str) -> SavingsGoalInput {
    SavingsGoalInput {
        title: title.to_string(),
        target_amount: MoneyCents::new(target),
        current_amount: MoneyCents::new(current),
        deadline: NaiveDate::parse_from_str(deadline, "%Y-%m-%d").unwrap(),
    }
}

async fn goal_with<B: engine::Backend>(engine: &Engine<B>, current: i64) -> SavingsGoal {
    engine
        .create_savings_goal(&input("Bike", 100000, current, "2025-06-30"))
        .await
        .unwrap()
}

#[tokio::test]
async fn deposit_adds_to_balance() {
    let engine = engine();
    let goal = goal_with(&engine, 5000).await;

    let updated = engine
        .update_goal_amount(goal.id, MoneyCents::new(3000))
        .await
        .unwrap();

    assert_eq!(updated.current_amount, MoneyCents::new(8000));
}

#[tokio::test]
async fn withdrawal_below_zero_clamps() {
    let engine = engine();
    let goal = goal_with(&engine, 5000).await;

    let updated = engine
        .update_goal_amount(goal.id, MoneyCents::new(-100000))
        .await
        .unwrap();

    assert_eq!(updated.current_amount, MoneyCents::ZERO);
    assert_eq!(
        engine.savings_goal(goal.id).await.unwrap().current_amount,
        MoneyCents::ZERO
    );
}

#[tokio::test]
async fn adjustment_writes_only_the_balance() {
    let engine = engine();
    let goal = goal_with(&engine, 5000).await;
    engine.backend().clear();

    engine
        .update_goal_amount(goal.id, MoneyCents::new(-1000))
        .await
        .unwrap();

    let calls = engine.backend().calls();
    let Call::Update(table, records) = calls.last().unwrap() else {
        panic!("expected an update call, got {calls:?}");
    };
    assert_eq!(table, "savings_goal_c");
    let fields = records[0].as_object().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields["Current_Amount_c"], 40);
}

#[tokio::test]
async fn missing_goal_is_not_found() {
    let engine = engine();

    let err = engine
        .update_goal_amount(7, MoneyCents::new(100))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(
        !engine
            .backend()
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Update(..)))
    );
}

#[tokio::test]
async fn goals_are_listed_by_deadline() {
    let engine = engine();
    for (title, deadline) in [
        ("Car", "2026-01-01"),
        ("Trip", "2024-08-15"),
        ("Laptop", "2025-02-01"),
    ] {
        engine
            .create_savings_goal(&input(title, 100000, 0, deadline))
            .await
            .unwrap();
    }

    let titles: Vec<_> = engine
        .savings_goals()
        .await
        .into_iter()
        .map(|goal| goal.title)
        .collect();
    assert_eq!(titles, vec!["Trip", "Laptop", "Car"]);
}

#[tokio::test]
async fn invalid_goals_are_rejected() {
    let engine = engine();

    assert!(matches!(
        engine
            .create_savings_goal(&input("", 1000, 0, "2025-01-01"))
            .await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine
            .create_savings_goal(&input("Car", -1, 0, "2025-01-01"))
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(engine.backend().calls().is_empty());
}

#[tokio::test]
async fn update_and_delete_by_id() {
    let engine = engine();
    let goal = goal_with(&engine, 0).await;

    let updated = engine
        .update_savings_goal(goal.id, &input("E-bike", 150000, 2000, "2025-09-30"))
        .await
        .unwrap();
    assert_eq!(updated.title, "E-bike");
    assert_eq!(updated.progress_percent(), 1);

    assert!(engine.delete_savings_goal(goal.id).await.unwrap());
    assert!(engine.savings_goals().await.is_empty());
}
