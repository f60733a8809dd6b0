use std::collections::HashMap;

use crate::models::account::AccountBalance;
use crate::models::classified::{AssetClassSummary, ClassifiedPortfolio, ClassifiedPosition};
use crate::taxonomy::{class_ids, Taxonomy};

/// Annual safe-withdrawal rate (the classic 4% rule).
const SAFE_WITHDRAWAL_RATE: f64 = 0.04;

/// Rolls classified positions plus account balances up into the portfolio
/// view: per-class summaries, concentration metrics, and headline totals.
///
/// Pure and stateless. Degenerate input (no positions, no accounts) yields a
/// well-formed zero portfolio — the dashboard must always have something to
/// render, so there are no error paths here.
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Produce the consolidated portfolio view.
    ///
    /// `positions` is the union of classified positions across all accounts;
    /// `accounts` supplies cash balances (non-liability accounts) and
    /// liability values (credit/loan accounts, reported negative).
    #[must_use]
    pub fn aggregate(
        &self,
        taxonomy: &Taxonomy,
        mut positions: Vec<ClassifiedPosition>,
        accounts: &[AccountBalance],
    ) -> ClassifiedPortfolio {
        let cash_total: f64 = accounts
            .iter()
            .filter(|a| !a.category.is_liability())
            .filter_map(|a| a.cash_balance)
            .sum();
        let liability_total: f64 = accounts
            .iter()
            .filter(|a| a.category.is_liability())
            .filter_map(|a| a.liquidation_value)
            .sum();

        let position_total: f64 = positions.iter().map(ClassifiedPosition::market_value).sum();
        let total_value = position_total + cash_total + liability_total;

        let day_change: f64 = positions
            .iter()
            .filter_map(|p| p.position.current_day_profit_loss)
            .sum();
        let day_change_pct = safe_pct(day_change, total_value - day_change);

        for position in &mut positions {
            position.allocation_pct = safe_pct(position.market_value(), total_value);
        }

        // HHI measures single-position concentration, so only individual
        // positions count — the pseudo cash/debt holdings are excluded.
        let concentration_hhi: f64 = positions.iter().map(|p| p.allocation_pct.powi(2)).sum();
        let diversification_score = diversification_score(concentration_hhi);

        let holding_count = positions.len();
        let classes =
            self.class_summaries(taxonomy, positions, total_value, cash_total, liability_total);

        ClassifiedPortfolio {
            total_value,
            day_change,
            day_change_pct,
            holding_count,
            cash_value: cash_total,
            cash_pct: safe_pct(cash_total, total_value),
            liability_value: liability_total,
            liability_pct: safe_pct(liability_total, total_value),
            classes,
            concentration_hhi,
            diversification_score,
            safe_withdrawal_annual: total_value * SAFE_WITHDRAWAL_RATE,
        }
    }

    /// Group positions by assigned class, fold the cash and liability
    /// buckets into their classes, and drop classes that ended up empty.
    ///
    /// Classes are emitted in taxonomy definition order, with any class ids
    /// unknown to the taxonomy appended in first-seen order, so the result
    /// is stable for a fixed input.
    fn class_summaries(
        &self,
        taxonomy: &Taxonomy,
        positions: Vec<ClassifiedPosition>,
        total_value: f64,
        cash_total: f64,
        liability_total: f64,
    ) -> Vec<AssetClassSummary> {
        let mut grouped: HashMap<String, Vec<ClassifiedPosition>> = HashMap::new();
        let mut class_order: Vec<String> = taxonomy.classes().iter().map(|c| c.id.clone()).collect();
        for position in positions {
            if !class_order.contains(&position.asset_class_id) {
                class_order.push(position.asset_class_id.clone());
            }
            grouped
                .entry(position.asset_class_id.clone())
                .or_default()
                .push(position);
        }

        let mut summaries = Vec::new();
        for class_id in class_order {
            let mut class_positions = grouped.remove(&class_id).unwrap_or_default();

            let mut market_value: f64 = class_positions
                .iter()
                .map(ClassifiedPosition::market_value)
                .sum();
            let day_change: f64 = class_positions
                .iter()
                .filter_map(|p| p.position.current_day_profit_loss)
                .sum();
            let mut holding_count = class_positions.len();

            // Non-position contributions: account cash folds into the cash
            // class, liability balances into the debt class, each counting
            // as one pseudo-holding when nonzero.
            if class_id == class_ids::CASH && cash_total != 0.0 {
                market_value += cash_total;
                holding_count += 1;
            }
            if class_id == class_ids::DEBT && liability_total != 0.0 {
                market_value += liability_total;
                holding_count += 1;
            }

            if market_value == 0.0 && holding_count == 0 {
                continue;
            }

            // Largest positions first; stable sort keeps equal-value
            // positions in input order for reproducibility.
            class_positions.sort_by(|a, b| {
                b.market_value()
                    .abs()
                    .partial_cmp(&a.market_value().abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            summaries.push(AssetClassSummary {
                class_name: taxonomy.class_name(&class_id),
                class_id,
                market_value,
                day_change,
                allocation_pct: safe_pct(market_value, total_value),
                holding_count,
                positions: class_positions,
            });
        }
        summaries
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// `numerator / denominator × 100`, yielding 0 for a zero denominator.
fn safe_pct(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        (numerator / denominator) * 100.0
    }
}

/// Map HHI (0–10000) onto a 1–10 diversification score. Higher HHI means a
/// more concentrated portfolio, hence a lower score. The formula is fixed:
/// `clamp(round(10 − (HHI/10000) × 9), 1, 10)`.
fn diversification_score(hhi: f64) -> u8 {
    let score = (10.0 - (hhi / 10_000.0) * 9.0).round();
    score.clamp(1.0, 10.0) as u8
}
