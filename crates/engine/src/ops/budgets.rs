use api_types::{
    MoneyCents, RecordId,
    budget::{Budget, BudgetInput},
};
use backend::{Backend, BudgetField, BudgetTable, Query};

use crate::{
    ResultEngine,
    util::{ensure_non_negative, normalize_required_name, validate_period},
};

use super::Engine;

fn validate(input: &BudgetInput) -> ResultEngine<BudgetInput> {
    validate_period(input.month, input.year)?;
    ensure_non_negative(input.monthly_limit, "monthly limit")?;
    Ok(BudgetInput {
        category: normalize_required_name(&input.category, "category")?,
        ..input.clone()
    })
}

impl<B: Backend> Engine<B> {
    pub async fn budgets(&self) -> Vec<Budget> {
        self.list(Query::<BudgetTable>::all()).await
    }

    pub async fn budget(&self, id: RecordId) -> Option<Budget> {
        self.find::<BudgetTable>(id).await
    }

    pub async fn create_budget(&self, input: &BudgetInput) -> ResultEngine<Budget> {
        let input = validate(input)?;
        self.create::<BudgetTable>(BudgetTable::create_record(&input))
            .await
    }

    pub async fn update_budget(&self, id: RecordId, input: &BudgetInput) -> ResultEngine<Budget> {
        let input = validate(input)?;
        self.update::<BudgetTable>(BudgetTable::update_record(id, &input))
            .await
    }

    pub async fn delete_budget(&self, id: RecordId) -> ResultEngine<bool> {
        self.remove::<BudgetTable>(id).await
    }

    /// Budgets for month number `month` (`1..=12`), any year.
    pub async fn budgets_by_month(&self, month: u32) -> Vec<Budget> {
        self.list(Query::<BudgetTable>::all().eq(BudgetField::Month, month))
            .await
    }

    /// Budgets for one month of one year.
    pub async fn budgets_for_period(&self, month: u32, year: i32) -> Vec<Budget> {
        let query = Query::<BudgetTable>::all()
            .eq(BudgetField::Month, month)
            .eq(BudgetField::Year, year);
        self.list(query).await
    }

    /// Set the monthly limit of `category` for `month`/`year`.
    ///
    /// Updates the first budget matching `(category, month, year)` or
    /// creates one when none exists. The lookup and the write are separate
    /// calls, so two concurrent upserts on the same key may both create.
    pub async fn upsert_budget(
        &self,
        category: &str,
        monthly_limit: MoneyCents,
        month: u32,
        year: i32,
    ) -> ResultEngine<Budget> {
        let input = validate(&BudgetInput {
            category: category.to_string(),
            monthly_limit,
            month,
            year,
        })?;

        let query = Query::<BudgetTable>::all()
            .eq(BudgetField::Category, input.category.as_str())
            .eq(BudgetField::Month, input.month)
            .eq(BudgetField::Year, input.year);

        let existing = self
            .fetch(query)
            .await
            .inspect_err(|err| tracing::error!("failed to look up budget for upsert: {err}"))?;

        match existing.first() {
            Some(budget) => {
                tracing::debug!(id = budget.id, category = %input.category, "updating budget");
                self.update::<BudgetTable>(BudgetTable::update_record(budget.id, &input))
                    .await
            }
            None => {
                tracing::debug!(category = %input.category, "creating budget");
                self.create::<BudgetTable>(BudgetTable::create_record(&input))
                    .await
            }
        }
    }
}
