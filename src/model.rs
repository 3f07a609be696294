use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "food_kind", rename_all = "lowercase")]
pub enum FoodKind {
    Food,
    Recipe,
}

impl Default for FoodKind {
    fn default() -> Self {
        FoodKind::Food
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub disabled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One immutable version of a food or recipe definition. All versions of the
/// same logical item share a `family_id`; exactly one live row per family is
/// marked current. Macros are given per `measurement_amount` of
/// `measurement_unit`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub family_id: Uuid,
    pub version: i32,
    pub is_current: bool,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub kind: FoodKind,
    pub measurement_unit: String,
    pub measurement_amount: f64,
    pub public: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nutrients: Vec<Nutrient>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<Ingredient>,
}

/// Flexible micro-nutrient row owned by a single food version. No uniqueness
/// key: a version may carry the same (name, unit) twice and aggregation must
/// still sum correctly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Nutrient {
    #[serde(skip_serializing, default = "Uuid::nil")]
    pub food_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Recipe ingredient joined with the pinned food version's name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub amount: f64,
    pub meal_tag: String,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}
