use api_types::{
    MoneyCents, RecordId,
    savings_goal::{SavingsGoal, SavingsGoalInput},
};
use backend::{Backend, Query, SavingsGoalField, SavingsGoalTable, SortType};

use crate::{
    EngineError, ResultEngine,
    util::{ensure_non_negative, normalize_required_name},
};

use super::Engine;

fn validate(input: &SavingsGoalInput) -> ResultEngine<SavingsGoalInput> {
    ensure_non_negative(input.target_amount, "target amount")?;
    ensure_non_negative(input.current_amount, "current amount")?;
    Ok(SavingsGoalInput {
        title: normalize_required_name(&input.title, "goal")?,
        ..input.clone()
    })
}

impl<B: Backend> Engine<B> {
    /// All goals, nearest deadline first.
    pub async fn savings_goals(&self) -> Vec<SavingsGoal> {
        let query =
            Query::<SavingsGoalTable>::all().order_by(SavingsGoalField::Deadline, SortType::Asc);
        self.list(query).await
    }

    pub async fn savings_goal(&self, id: RecordId) -> Option<SavingsGoal> {
        self.find::<SavingsGoalTable>(id).await
    }

    pub async fn create_savings_goal(&self, input: &SavingsGoalInput) -> ResultEngine<SavingsGoal> {
        let input = validate(input)?;
        self.create::<SavingsGoalTable>(SavingsGoalTable::create_record(&input))
            .await
    }

    pub async fn update_savings_goal(
        &self,
        id: RecordId,
        input: &SavingsGoalInput,
    ) -> ResultEngine<SavingsGoal> {
        let input = validate(input)?;
        self.update::<SavingsGoalTable>(SavingsGoalTable::update_record(id, &input))
            .await
    }

    pub async fn delete_savings_goal(&self, id: RecordId) -> ResultEngine<bool> {
        self.remove::<SavingsGoalTable>(id).await
    }

    /// Add `delta` (possibly negative) to the goal balance.
    ///
    /// The balance never drops below zero. Only the balance column is
    /// written; a concurrent adjustment of the same goal can be lost.
    pub async fn update_goal_amount(
        &self,
        id: RecordId,
        delta: MoneyCents,
    ) -> ResultEngine<SavingsGoal> {
        let Some(goal) = self.savings_goal(id).await else {
            tracing::warn!(id, "savings goal not found");
            return Err(EngineError::KeyNotFound(format!("savings goal {id}")));
        };

        let next = goal
            .current_amount
            .checked_add(delta)
            .ok_or_else(|| EngineError::InvalidAmount("amount overflow".to_string()))?
            .floor_zero();

        tracing::debug!(id, from = %goal.current_amount, to = %next, "adjusting goal balance");
        self.update::<SavingsGoalTable>(SavingsGoalTable::amount_record(id, next))
            .await
    }
}
