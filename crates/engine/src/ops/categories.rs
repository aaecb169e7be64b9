use api_types::{
    EntryKind, RecordId,
    category::{Category, CategoryInput, CategoryUpdate},
};
use backend::{Backend, CategoryField, CategoryTable, Query};

use crate::{EngineError, Operation, ResultEngine, util::normalize_required_name};

use super::Engine;

impl<B: Backend> Engine<B> {
    pub async fn categories(&self) -> Vec<Category> {
        self.list(Query::<CategoryTable>::all()).await
    }

    pub async fn category(&self, id: RecordId) -> Option<Category> {
        self.find::<CategoryTable>(id).await
    }

    /// Create a custom category.
    pub async fn create_category(&self, input: &CategoryInput) -> ResultEngine<Category> {
        let input = CategoryInput {
            name: normalize_required_name(&input.name, "category")?,
            kind: input.kind,
        };
        self.create::<CategoryTable>(CategoryTable::create_record(&input))
            .await
    }

    /// Update a custom category. Built-in categories are immutable.
    pub async fn update_category(
        &self,
        id: RecordId,
        input: &CategoryUpdate,
    ) -> ResultEngine<Category> {
        let input = CategoryUpdate {
            name: normalize_required_name(&input.name, "category")?,
            ..input.clone()
        };
        self.custom_category(id, Operation::Update).await?;
        self.update::<CategoryTable>(CategoryTable::update_record(id, &input))
            .await
    }

    /// Delete a custom category.
    ///
    /// Built-in categories are refused before any delete reaches the
    /// backend.
    pub async fn delete_category(&self, id: RecordId) -> ResultEngine<bool> {
        self.custom_category(id, Operation::Delete).await?;
        self.remove::<CategoryTable>(id).await
    }

    pub async fn categories_by_kind(&self, kind: EntryKind) -> Vec<Category> {
        self.list(Query::<CategoryTable>::all().eq(CategoryField::Kind, kind.as_str()))
            .await
    }

    /// The stored category `id`, provided it is custom.
    async fn custom_category(&self, id: RecordId, operation: Operation) -> ResultEngine<Category> {
        let Some(category) = self.category(id).await else {
            tracing::warn!(id, "refusing to {operation} unknown category");
            return Err(EngineError::KeyNotFound(format!("category {id}")));
        };
        if !category.is_custom {
            tracing::warn!(id, name = %category.name, "refusing to {operation} built-in category");
            return Err(EngineError::BuiltInCategory {
                operation,
                name: category.name,
            });
        }
        Ok(category)
    }
}
