use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::dto::StopWithActivities;

/// Spending of one city; a city visited twice is one entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityCost {
    pub city_name: String,
    pub total: Decimal,
    pub activity_count: usize,
    pub percent_of_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub id: String,
    pub name: String,
    pub city_name: String,
    pub cost: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub budget: Option<Decimal>,
    pub total_cost: Decimal,
    pub remaining: Option<Decimal>,
    /// None unless the budget is strictly positive
    pub percent_used: Option<Decimal>,
    pub activity_count: usize,
    pub by_city: Vec<CityCost>,
    pub activities: Vec<BudgetLine>,
}

pub struct BudgetService;

impl BudgetService {
    /// Totals over the stops (already in itinerary order) and their activities.
    /// Costs are summed as given, whatever their currency.
    pub fn summarize(budget: Option<Decimal>, stops: &[StopWithActivities]) -> BudgetSummary {
        let mut by_city: Vec<CityCost> = Vec::new();
        let mut activities = Vec::new();

        for entry in stops {
            let city_name = &entry.stop.city_name;
            let position = match by_city.iter().position(|c| &c.city_name == city_name) {
                Some(i) => i,
                None => {
                    by_city.push(CityCost {
                        city_name: city_name.clone(),
                        total: Decimal::ZERO,
                        activity_count: 0,
                        percent_of_total: Decimal::ZERO,
                    });
                    by_city.len() - 1
                }
            };

            for activity in &entry.activities {
                by_city[position].total += activity.cost;
                by_city[position].activity_count += 1;
                activities.push(BudgetLine {
                    id: activity.id.clone(),
                    name: activity.name.clone(),
                    city_name: city_name.clone(),
                    cost: activity.cost,
                    currency: activity.currency.clone(),
                });
            }
        }

        let total_cost: Decimal = by_city.iter().map(|c| c.total).sum();
        for city in &mut by_city {
            city.percent_of_total = percent(city.total, total_cost).unwrap_or(Decimal::ZERO);
        }

        BudgetSummary {
            budget,
            total_cost,
            remaining: budget.map(|b| b - total_cost),
            percent_used: budget.and_then(|b| percent(total_cost, b)),
            activity_count: activities.len(),
            by_city,
            activities,
        }
    }
}

/// part / whole * 100 to one decimal place, half away from zero.
/// None when `whole` is not strictly positive or the result overflows.
pub fn percent(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole <= Decimal::ZERO {
        return None;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(whole)
        .map(|p| p.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}
