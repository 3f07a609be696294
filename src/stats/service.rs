use std::collections::HashMap;

use sqlx::PgPool;
use time::Date;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::model::Nutrient;
use crate::stats::dto::{MacrosPercentage, NutrientTotal, StatsReport};
use crate::stats::repo::{self, LoggedMacros};
use crate::timeframe::{self, Period};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct MacroTotals {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

/// Folds ledger entries into macro totals via ratio scaling, and returns the
/// summed ratio per food version for the nutrient pass. Entries whose pinned
/// version declares a zero measurement amount contribute nothing.
fn fold_macros(rows: &[LoggedMacros]) -> (MacroTotals, HashMap<Uuid, f64>) {
    let mut totals = MacroTotals::default();
    let mut factors: HashMap<Uuid, f64> = HashMap::new();
    for row in rows {
        if row.measurement_amount == 0.0 {
            continue;
        }
        let ratio = row.amount / row.measurement_amount;
        totals.calories += row.calories * ratio;
        totals.protein += row.protein * ratio;
        totals.carbs += row.carbs * ratio;
        totals.fat += row.fat * ratio;
        *factors.entry(row.food_id).or_default() += ratio;
    }
    (totals, factors)
}

/// Scales each nutrient row by its food's accumulated ratio and merges into
/// (name, unit) totals. Duplicate rows within one version simply sum. Output
/// is sorted for a stable result.
fn fold_nutrients(factors: &HashMap<Uuid, f64>, rows: &[Nutrient]) -> Vec<NutrientTotal> {
    let mut sums: HashMap<(String, String), f64> = HashMap::new();
    for row in rows {
        let Some(factor) = factors.get(&row.food_id) else {
            continue;
        };
        *sums
            .entry((row.name.clone(), row.unit.clone()))
            .or_default() += row.amount * factor;
    }
    let mut totals: Vec<NutrientTotal> = sums
        .into_iter()
        .map(|((name, unit), amount)| NutrientTotal { name, amount, unit })
        .collect();
    totals.sort_by(|a, b| (&a.name, &a.unit).cmp(&(&b.name, &b.unit)));
    totals
}

/// Truncated percentage split of the macro total. An all-zero window yields
/// all zeros instead of a division error.
fn macros_percentage(protein: f64, carbs: f64, fat: f64) -> MacrosPercentage {
    let total = protein + carbs + fat;
    if total <= 0.0 {
        return MacrosPercentage {
            protein: 0,
            carbs: 0,
            fat: 0,
        };
    }
    MacrosPercentage {
        protein: (100.0 * protein / total) as i64,
        carbs: (100.0 * carbs / total) as i64,
        fat: (100.0 * fat / total) as i64,
    }
}

/// Aggregates a user's ledger over the window resolved from `period` and the
/// anchor date (today, UTC, when unset). Joins run against the exact pinned
/// versions, so later catalog edits never change a historical report.
#[instrument(skip(db))]
pub async fn get_stats(
    db: &PgPool,
    user_id: Uuid,
    period: Period,
    anchor: Option<Date>,
) -> Result<StatsReport> {
    let anchor = anchor.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let (start, end) = timeframe::resolve_window(period, anchor);

    let rows = repo::select_logged_macros(db, user_id, start, end).await?;
    let (totals, factors) = fold_macros(&rows);

    let total_nutrients = if factors.is_empty() {
        Vec::new()
    } else {
        let food_ids: Vec<Uuid> = factors.keys().copied().collect();
        let nutrient_rows = repo::select_nutrients_for(db, &food_ids).await?;
        fold_nutrients(&factors, &nutrient_rows)
    };

    Ok(StatsReport {
        period,
        start,
        end,
        total_calories: totals.calories,
        total_protein: totals.protein,
        total_carbs: totals.carbs,
        total_fat: totals.fat,
        total_nutrients,
        macros_percentage: macros_percentage(totals.protein, totals.carbs, totals.fat),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(food_id: Uuid, amount: f64, measurement_amount: f64, calories: f64) -> LoggedMacros {
        LoggedMacros {
            food_id,
            amount,
            measurement_amount,
            calories,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        }
    }

    fn nutrient(food_id: Uuid, name: &str, amount: f64, unit: &str) -> Nutrient {
        Nutrient {
            food_id,
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }

    #[test]
    fn ratio_scales_macros() {
        // 200g of a per-100g definition doubles every macro.
        let id = Uuid::new_v4();
        let (totals, factors) = fold_macros(&[row(id, 200.0, 100.0, 89.0)]);
        assert_eq!(totals.calories, 178.0);
        assert_eq!(factors[&id], 2.0);
    }

    #[test]
    fn zero_measurement_amount_is_skipped() {
        let id = Uuid::new_v4();
        let (totals, factors) = fold_macros(&[row(id, 200.0, 0.0, 89.0)]);
        assert_eq!(totals.calories, 0.0);
        assert!(factors.is_empty());
    }

    #[test]
    fn repeated_entries_accumulate_per_food_factors() {
        let id = Uuid::new_v4();
        let (totals, factors) =
            fold_macros(&[row(id, 50.0, 100.0, 100.0), row(id, 150.0, 100.0, 100.0)]);
        assert_eq!(totals.calories, 200.0);
        assert_eq!(factors[&id], 2.0);
    }

    #[test]
    fn nutrients_merge_on_name_and_unit_across_foods() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let factors = HashMap::from([(a, 2.0), (b, 1.0)]);
        let totals = fold_nutrients(
            &factors,
            &[
                nutrient(a, "Sodium", 10.0, "mg"),
                nutrient(b, "Sodium", 5.0, "mg"),
            ],
        );
        assert_eq!(
            totals,
            vec![NutrientTotal {
                name: "Sodium".into(),
                amount: 25.0,
                unit: "mg".into()
            }]
        );
    }

    #[test]
    fn different_units_stay_separate() {
        let a = Uuid::new_v4();
        let factors = HashMap::from([(a, 1.0)]);
        let totals = fold_nutrients(
            &factors,
            &[
                nutrient(a, "Vitamin C", 60.0, "mg"),
                nutrient(a, "Vitamin C", 100.0, "IU"),
            ],
        );
        assert_eq!(totals.len(), 2);
        // Sorted by (name, unit): IU before mg.
        assert_eq!(totals[0].unit, "IU");
        assert_eq!(totals[1].unit, "mg");
    }

    #[test]
    fn duplicate_nutrient_rows_within_one_version_sum() {
        // No uniqueness constraint on (food_id, name, unit): both rows count.
        let a = Uuid::new_v4();
        let factors = HashMap::from([(a, 1.0)]);
        let totals = fold_nutrients(
            &factors,
            &[nutrient(a, "Iron", 2.0, "mg"), nutrient(a, "Iron", 3.0, "mg")],
        );
        assert_eq!(totals[0].amount, 5.0);
    }

    #[test]
    fn nutrients_of_unlogged_foods_are_ignored() {
        let factors = HashMap::from([(Uuid::new_v4(), 1.0)]);
        let totals = fold_nutrients(&factors, &[nutrient(Uuid::new_v4(), "Zinc", 1.0, "mg")]);
        assert!(totals.is_empty());
    }

    #[test]
    fn macro_percentages_truncate() {
        let pct = macros_percentage(1.0, 1.0, 1.0);
        assert_eq!(
            pct,
            MacrosPercentage {
                protein: 33,
                carbs: 33,
                fat: 33
            }
        );
    }

    #[test]
    fn zero_macro_total_yields_zero_percentages() {
        let pct = macros_percentage(0.0, 0.0, 0.0);
        assert_eq!(
            pct,
            MacrosPercentage {
                protein: 0,
                carbs: 0,
                fat: 0
            }
        );
    }
}
