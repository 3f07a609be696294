use serde::Serialize;
use time::OffsetDateTime;

use crate::timeframe::Period;

/// One flexible-nutrient total. Keyed by (name, unit): two foods' "Vitamin C
/// / mg" rows merge, "mg" and "IU" stay apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientTotal {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Truncated integer shares of protein/carbs/fat in the macro total. The
/// three values need not sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacrosPercentage {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

/// Window-scoped aggregate, computed on demand. Carries the resolved
/// `[start, end)` window and period label so the caller can render what was
/// actually summed.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub period: Period,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_nutrients: Vec<NutrientTotal>,
    pub macros_percentage: MacrosPercentage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn report_serializes_with_window_and_period_label() {
        let report = StatsReport {
            period: Period::Month,
            start: datetime!(2023-10-01 00:00 UTC),
            end: datetime!(2023-11-01 00:00 UTC),
            total_calories: 178.0,
            total_protein: 2.2,
            total_carbs: 45.6,
            total_fat: 0.6,
            total_nutrients: vec![NutrientTotal {
                name: "Sodium".into(),
                amount: 2.0,
                unit: "mg".into(),
            }],
            macros_percentage: MacrosPercentage {
                protein: 4,
                carbs: 94,
                fat: 1,
            },
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["period"], "month");
        assert_eq!(v["start"], "2023-10-01T00:00:00Z");
        assert_eq!(v["total_calories"], 178.0);
        assert_eq!(v["total_nutrients"][0]["unit"], "mg");
        assert_eq!(v["macros_percentage"]["carbs"], 94);
    }
}
