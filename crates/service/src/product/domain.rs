use chrono::{DateTime, FixedOffset, Utc};
use models::product::{Model, ProductFields};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::repository::Keyed;

/// Product as seen by callers. `id == None` marks a product not yet stored;
/// the timestamps are maintained by the store and ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            price,
            quantity: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            quantity: self.quantity,
        }
    }
}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
            description: m.description,
            price: m.price,
            quantity: m.quantity,
            created_at: Some(m.created_at),
            updated_at: Some(m.updated_at),
        }
    }
}

impl Keyed for Product {
    type Key = i64;

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn with_key(self, key: i64) -> Self {
        self.with_id(key)
    }

    fn validated(self) -> Result<Self, ServiceError> {
        let f = self.fields().validated()?;
        Ok(Self { name: f.name, ..self })
    }

    fn stamped(self, previous: Option<&Self>) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let created_at = previous.and_then(|p| p.created_at).unwrap_or(now);
        Self { created_at: Some(created_at), updated_at: Some(now), ..self }
    }
}
