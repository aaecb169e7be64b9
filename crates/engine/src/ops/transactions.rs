use api_types::{
    RecordId, YearMonth,
    transaction::{Transaction, TransactionInput},
};
use backend::{Backend, Query, SortType, TransactionField, TransactionTable};

use crate::ResultEngine;

use super::Engine;

fn newest_first() -> Query<TransactionTable> {
    Query::all().order_by(TransactionField::Date, SortType::Desc)
}

impl<B: Backend> Engine<B> {
    /// All transactions, newest first.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.list(newest_first()).await
    }

    pub async fn transaction(&self, id: RecordId) -> Option<Transaction> {
        self.find::<TransactionTable>(id).await
    }

    pub async fn create_transaction(&self, input: &TransactionInput) -> ResultEngine<Transaction> {
        self.create::<TransactionTable>(TransactionTable::create_record(input))
            .await
    }

    pub async fn update_transaction(
        &self,
        id: RecordId,
        input: &TransactionInput,
    ) -> ResultEngine<Transaction> {
        self.update::<TransactionTable>(TransactionTable::update_record(id, input))
            .await
    }

    pub async fn delete_transaction(&self, id: RecordId) -> ResultEngine<bool> {
        self.remove::<TransactionTable>(id).await
    }

    /// Transactions dated within `month`, newest first.
    pub async fn transactions_by_month(&self, month: YearMonth) -> Vec<Transaction> {
        let query = newest_first().contains(TransactionField::Date, month.to_string());
        self.list(query).await
    }

    /// Transactions booked on the category named `category`, newest first.
    pub async fn transactions_by_category(&self, category: &str) -> Vec<Transaction> {
        let query = newest_first().eq(TransactionField::Category, category);
        self.list(query).await
    }
}
