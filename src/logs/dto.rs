use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Incoming consumption event. `food_id` pins one exact catalog version;
/// `meal_tag` is a free-form label; `logged_at` defaults to now.
#[derive(Debug, Clone, Deserialize)]
pub struct LogDraft {
    pub food_id: Uuid,
    pub amount: f64,
    #[serde(default)]
    pub meal_tag: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

impl LogDraft {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::validation("amount must be a non-negative number"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_amount() {
        let draft = LogDraft {
            food_id: Uuid::nil(),
            amount: -1.0,
            meal_tag: String::new(),
            logged_at: None,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn logged_at_is_optional_in_json() {
        let draft: LogDraft = serde_json::from_value(serde_json::json!({
            "food_id": "0191e2f0-0000-7000-8000-000000000001",
            "amount": 200.0,
            "meal_tag": "breakfast"
        }))
        .unwrap();
        assert!(draft.logged_at.is_none());
        assert_eq!(draft.meal_tag, "breakfast");
    }
}
