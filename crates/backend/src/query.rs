use std::marker::PhantomData;

use api_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collections::{Collection, WireField};

/// Body of a fetch call: which fields to return, how to filter, how to sort.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    pub fields: Vec<Field>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl FetchParams {
    /// Names of the selected fields.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.field.name.as_str())
    }
}

/// `{"field": {"Name": "Amount_c"}}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub field: FieldName,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
    Contains,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    pub field_name: String,
    pub operator: Operator,
    /// The condition holds when the field matches any of the values.
    pub values: Vec<Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

/// Body of create and update calls. Update records carry their `Id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteParams {
    pub records: Vec<Value>,
}

impl WriteParams {
    pub fn single(record: Value) -> Self {
        Self {
            records: vec![record],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteParams {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<RecordId>,
}

/// Typed builder for [`FetchParams`] over one collection.
///
/// Selects every field of the collection; filters and sort keys are named
/// with the collection's field enum so callers never spell wire names.
#[derive(Debug)]
pub struct Query<C: Collection> {
    params: FetchParams,
    collection: PhantomData<C>,
}

impl<C: Collection> Query<C> {
    pub fn all() -> Self {
        let fields = C::FIELDS
            .iter()
            .map(|field| Field {
                field: FieldName {
                    name: field.wire_name().to_string(),
                },
            })
            .collect();

        Self {
            params: FetchParams {
                fields,
                ..FetchParams::default()
            },
            collection: PhantomData,
        }
    }

    pub fn filter(mut self, field: C::Field, operator: Operator, value: impl Into<Value>) -> Self {
        self.params.conditions.push(Condition {
            field_name: field.wire_name().to_string(),
            operator,
            values: vec![value.into()],
        });
        self
    }

    pub fn eq(self, field: C::Field, value: impl Into<Value>) -> Self {
        self.filter(field, Operator::EqualTo, value)
    }

    pub fn contains(self, field: C::Field, value: impl Into<Value>) -> Self {
        self.filter(field, Operator::Contains, value)
    }

    pub fn order_by(mut self, field: C::Field, sort_type: SortType) -> Self {
        self.params.order_by.push(OrderBy {
            field_name: field.wire_name().to_string(),
            sort_type,
        });
        self
    }

    pub fn params(&self) -> &FetchParams {
        &self.params
    }
}
