use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::FoodKind;

#[derive(Debug, Clone, Deserialize)]
pub struct NutrientDraft {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Incoming definition for a new record or a new version of an existing one.
/// Ingredient keys arrive as strings from the wire and are parsed strictly
/// when the recipe is written.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDraft {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub kind: FoodKind,
    pub measurement_unit: String,
    pub measurement_amount: f64,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub nutrients: Vec<NutrientDraft>,
    #[serde(default)]
    pub ingredients: BTreeMap<String, f64>,
}

impl RecordDraft {
    /// Checks the draft against the kind the new version will actually carry
    /// (the draft's own kind on create, the family's kind on update).
    pub fn validate(&self, kind: FoodKind) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if self.measurement_unit.trim().is_empty() {
            return Err(Error::validation("measurement_unit must not be empty"));
        }
        for (label, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("measurement_amount", self.measurement_amount),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::validation(format!(
                    "{label} must be a non-negative number"
                )));
            }
        }
        for n in &self.nutrients {
            if n.name.trim().is_empty() || n.unit.trim().is_empty() {
                return Err(Error::validation("nutrient name and unit must not be empty"));
            }
            if !n.amount.is_finite() || n.amount < 0.0 {
                return Err(Error::validation(format!(
                    "nutrient {:?} amount must be a non-negative number",
                    n.name
                )));
            }
        }
        if kind == FoodKind::Food && !self.ingredients.is_empty() {
            return Err(Error::validation("only recipes may carry ingredients"));
        }
        for (id, amount) in &self.ingredients {
            if !amount.is_finite() || *amount < 0.0 {
                return Err(Error::validation(format!(
                    "ingredient {id:?} amount must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: FoodKind) -> RecordDraft {
        RecordDraft {
            name: "Banana".into(),
            calories: 89.0,
            protein: 1.1,
            carbs: 22.8,
            fat: 0.3,
            kind,
            measurement_unit: "g".into(),
            measurement_amount: 100.0,
            public: false,
            nutrients: vec![],
            ingredients: BTreeMap::new(),
        }
    }

    #[test]
    fn accepts_plain_food_draft() {
        assert!(draft(FoodKind::Food).validate(FoodKind::Food).is_ok());
    }

    #[test]
    fn rejects_blank_name_and_unit() {
        let mut d = draft(FoodKind::Food);
        d.name = "  ".into();
        assert!(d.validate(FoodKind::Food).is_err());

        let mut d = draft(FoodKind::Food);
        d.measurement_unit = "".into();
        assert!(d.validate(FoodKind::Food).is_err());
    }

    #[test]
    fn rejects_negative_and_non_finite_macros() {
        let mut d = draft(FoodKind::Food);
        d.calories = -1.0;
        assert!(d.validate(FoodKind::Food).is_err());

        let mut d = draft(FoodKind::Food);
        d.fat = f64::NAN;
        assert!(d.validate(FoodKind::Food).is_err());
    }

    #[test]
    fn zero_measurement_amount_is_allowed() {
        // The aggregator skips these rather than dividing by zero.
        let mut d = draft(FoodKind::Food);
        d.measurement_amount = 0.0;
        assert!(d.validate(FoodKind::Food).is_ok());
    }

    #[test]
    fn ingredients_on_a_plain_food_are_rejected() {
        let mut d = draft(FoodKind::Food);
        d.ingredients.insert(uuid::Uuid::nil().to_string(), 50.0);
        assert!(d.validate(FoodKind::Food).is_err());
        assert!(d.validate(FoodKind::Recipe).is_ok());
    }

    #[test]
    fn kind_defaults_to_food_on_deserialize() {
        let d: RecordDraft = serde_json::from_value(serde_json::json!({
            "name": "Oats",
            "measurement_unit": "g",
            "measurement_amount": 40.0
        }))
        .unwrap();
        assert_eq!(d.kind, FoodKind::Food);
        assert!(d.ingredients.is_empty());
    }

    #[test]
    fn ingredient_map_deserializes_from_json_object() {
        let d: RecordDraft = serde_json::from_value(serde_json::json!({
            "name": "Porridge",
            "kind": "recipe",
            "measurement_unit": "g",
            "measurement_amount": 250.0,
            "ingredients": { "0191e2f0-0000-7000-8000-000000000001": 40.0 }
        }))
        .unwrap();
        assert_eq!(d.kind, FoodKind::Recipe);
        assert_eq!(d.ingredients.len(), 1);
    }
}
