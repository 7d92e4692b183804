use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Selects which evaluation rule a contract applies to a transfer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum PolicyMethod {
    /// Halves the requested amount inside the validity window.
    #[serde(rename = "travelContract")]
    Travel,
    /// Pays a flat bonus plus a per-activity bonus inside the validity window.
    #[serde(rename = "feedbackContract")]
    Feedback,
    /// Reduces the requested amount by the flat discount rate.
    #[default]
    #[serde(rename = "discountContract")]
    Discount,
}

/// A business policy record that adjusts the amount of a transfer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    pub business_id: String,
    pub business_name: String,
    pub title: String,
    pub description: String,
    /// Human readable terms. Never evaluated.
    pub conditions: Vec<String>,
    pub icon: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub method: PolicyMethod,
    pub discount_rate: Decimal,
}

impl Contract {
    pub const INVALID_TITLE: &'static str = "Invalid Contract";

    /// Whether `at` falls strictly inside the validity window.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start_date < at && at < self.end_date
    }
}

/// Ordered list of every registered contract identifier.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(transparent)]
pub struct ContractIndex(Vec<String>);

impl ContractIndex {
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    /// Appends `id` unless it is already indexed. Returns whether it was added.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id.to_string());
        true
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ContractIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut index = Self::default();
        for id in iter {
            index.insert(id.as_ref());
        }
        index
    }
}
