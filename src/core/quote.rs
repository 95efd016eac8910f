//! Pricing of an explicit bundle (a set of tier units) and of the manager
//! time it needs.

use crate::core::engine::tier_cost;
use crate::domain::model::{Catalog, ManagerRates, Tier, TierCost, TierId};
use crate::utils::error::{AdvisorError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteLine {
    pub tier: TierId,
    pub units: u64,
    pub unit_price: u64,
    pub line_cost: u64,
    pub daily_capacity: u64,
}

/// A single-tier stack that covers the requested volume for less.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheaperAlternative {
    pub cost: TierCost,
    pub savings: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleQuote {
    pub lines: Vec<QuoteLine>,
    pub total_monthly_cost: u64,
    pub total_daily_capacity: u64,
    /// Tickets/day above capacity for the requested volume, 0 when covered.
    pub shortfall: u64,
    pub alternative: Option<CheaperAlternative>,
}

impl BundleQuote {
    pub fn covers(&self) -> bool {
        self.shortfall == 0
    }

    pub fn is_efficient(&self) -> bool {
        self.alternative.is_none()
    }
}

fn overflow(reason: String) -> AdvisorError {
    AdvisorError::QuoteOverflow { reason }
}

/// Prices `units` (tier id, count) against the catalog. Repeated ids are
/// merged; lines come out in catalog order. With a `volume`, the quote also
/// carries the cheapest single-tier stack covering it when that costs less.
pub fn quote_bundle(
    catalog: &Catalog,
    units: &[(TierId, u64)],
    volume: Option<u32>,
) -> Result<BundleQuote> {
    let mut counts = vec![0u64; catalog.len()];
    for (id, count) in units {
        let tier = catalog.require(id.as_str())?;
        // require() succeeded, so the tier has a position
        if let Some(idx) = catalog.position(&tier.id) {
            counts[idx] = counts[idx]
                .checked_add(*count)
                .ok_or_else(|| overflow(format!("{} unit count", tier.id)))?;
        }
    }

    let mut lines = Vec::new();
    for (tier, count) in catalog.tiers().iter().zip(counts) {
        if count == 0 {
            continue;
        }
        let line_cost = count
            .checked_mul(tier.monthly_price)
            .ok_or_else(|| overflow(format!("{} line cost", tier.id)))?;
        let daily_capacity = count
            .checked_mul(u64::from(tier.daily_capacity))
            .ok_or_else(|| overflow(format!("{} daily capacity", tier.id)))?;
        lines.push(QuoteLine {
            tier: tier.id.clone(),
            units: count,
            unit_price: tier.monthly_price,
            line_cost,
            daily_capacity,
        });
    }

    let mut total_monthly_cost = 0u64;
    let mut total_daily_capacity = 0u64;
    for line in &lines {
        total_monthly_cost = total_monthly_cost
            .checked_add(line.line_cost)
            .ok_or_else(|| overflow("total monthly cost".to_string()))?;
        total_daily_capacity = total_daily_capacity
            .checked_add(line.daily_capacity)
            .ok_or_else(|| overflow("total daily capacity".to_string()))?;
    }

    let shortfall = volume
        .map(|v| u64::from(v).saturating_sub(total_daily_capacity))
        .unwrap_or(0);
    let alternative = volume.and_then(|v| cheaper_alternative(catalog, v, total_monthly_cost));

    tracing::debug!(
        lines = lines.len(),
        total_monthly_cost,
        total_daily_capacity,
        shortfall,
        efficient = alternative.is_none(),
        "quoted bundle"
    );

    Ok(BundleQuote {
        lines,
        total_monthly_cost,
        total_daily_capacity,
        shortfall,
        alternative,
    })
}

/// Cheapest single-tier stack for `volume`, fewer units winning ties, kept
/// only when it undercuts `current_cost`.
pub fn cheaper_alternative(
    catalog: &Catalog,
    volume: u32,
    current_cost: u64,
) -> Option<CheaperAlternative> {
    catalog
        .tiers()
        .iter()
        .map(|tier| tier_cost(volume, tier))
        .min_by_key(|cost| (cost.monthly_cost, cost.units))
        .filter(|cost| cost.monthly_cost < current_cost)
        .map(|cost| CheaperAlternative {
            savings: current_cost - cost.monthly_cost,
            cost,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManagerCost {
    pub hours_per_month: f64,
    pub monthly_cost: f64,
}

/// Oversight time for `units` of `tier`. Informational; never feeds the
/// integer cost model.
pub fn manager_cost(tier: &Tier, units: u64, rates: &ManagerRates) -> ManagerCost {
    let hours = tier.manager_hours_per_day * units as f64 * f64::from(rates.working_days);
    ManagerCost {
        hours_per_month: round2(hours),
        monthly_cost: round2(hours * rates.hourly_rate),
    }
}

/// Sums [`manager_cost`] over every line of a quote.
pub fn quote_manager_cost(
    catalog: &Catalog,
    quote: &BundleQuote,
    rates: &ManagerRates,
) -> ManagerCost {
    let (hours, cost) = quote
        .lines
        .iter()
        .filter_map(|line| catalog.get(line.tier.as_str()).map(|t| (t, line.units)))
        .map(|(tier, units)| manager_cost(tier, units, rates))
        .fold((0.0, 0.0), |(h, c), m| (h + m.hours_per_month, c + m.monthly_cost));
    ManagerCost {
        hours_per_month: round2(hours),
        monthly_cost: round2(cost),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AdvisorError;

    fn units(pairs: &[(&str, u64)]) -> Vec<(TierId, u64)> {
        pairs.iter().map(|(id, n)| (TierId::new(*id), *n)).collect()
    }

    #[test]
    fn test_quote_two_minis() {
        let quote = quote_bundle(Catalog::reference(), &units(&[("mini", 2)]), Some(350)).unwrap();
        assert_eq!(quote.total_monthly_cost, 2000);
        assert_eq!(quote.total_daily_capacity, 400);
        assert!(quote.covers());
    }

    #[test]
    fn test_quote_merges_and_orders_lines() {
        let quote = quote_bundle(
            Catalog::reference(),
            &units(&[("trivyaHigh", 1), ("mini", 1), ("mini", 2)]),
            None,
        )
        .unwrap();

        assert_eq!(quote.lines.len(), 2);
        assert_eq!(quote.lines[0].tier, "mini");
        assert_eq!(quote.lines[0].units, 3);
        assert_eq!(quote.lines[1].tier, "trivyaHigh");
        assert_eq!(quote.total_monthly_cost, 7000);
        assert_eq!(quote.total_daily_capacity, 1600);
        assert_eq!(quote.shortfall, 0);
    }

    #[test]
    fn test_quote_shortfall() {
        let quote = quote_bundle(Catalog::reference(), &units(&[("trivya", 1)]), Some(650)).unwrap();
        assert_eq!(quote.shortfall, 250);
        assert!(!quote.covers());
    }

    #[test]
    fn test_quote_unknown_tier() {
        let err = quote_bundle(Catalog::reference(), &units(&[("platinum", 1)]), None).unwrap_err();
        assert!(matches!(err, AdvisorError::UnknownTier { ref id } if id == "platinum"));
    }

    #[test]
    fn test_quote_flags_stacked_minis() {
        let quote = quote_bundle(Catalog::reference(), &units(&[("mini", 5)]), Some(650)).unwrap();
        assert_eq!(quote.total_monthly_cost, 5000);
        assert!(!quote.is_efficient());

        // mini x4 also costs 4000; one unit wins the tie
        let alt = quote.alternative.unwrap();
        assert_eq!(alt.cost.tier, "trivyaHigh");
        assert_eq!(alt.cost.units, 1);
        assert_eq!(alt.cost.monthly_cost, 4000);
        assert_eq!(alt.savings, 1000);
    }

    #[test]
    fn test_quote_without_cheaper_option() {
        let catalog = Catalog::reference();
        let quote = quote_bundle(catalog, &units(&[("trivyaHigh", 1)]), Some(650)).unwrap();
        assert!(quote.is_efficient());

        // 3 x mini is short of 650 but nothing covers it for under 3000
        let quote = quote_bundle(catalog, &units(&[("mini", 3)]), Some(650)).unwrap();
        assert_eq!(quote.shortfall, 50);
        assert_eq!(quote.alternative, None);

        let quote = quote_bundle(catalog, &units(&[("mini", 5)]), None).unwrap();
        assert_eq!(quote.alternative, None);
    }

    #[test]
    fn test_quote_overflow_is_an_error() {
        let err = quote_bundle(Catalog::reference(), &units(&[("mini", u64::MAX)]), None).unwrap_err();
        assert!(matches!(err, AdvisorError::QuoteOverflow { .. }));

        let err = quote_bundle(
            Catalog::reference(),
            &units(&[("mini", u64::MAX), ("mini", 1)]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AdvisorError::QuoteOverflow { ref reason } if reason.contains("unit count")));
    }

    #[test]
    fn test_manager_cost() {
        let rates = ManagerRates::default();
        let mini = Catalog::reference().get("mini").unwrap();
        let cost = manager_cost(mini, 2, &rates);
        // 4h * 2 units * 22 days
        assert_eq!(cost.hours_per_month, 176.0);
        assert_eq!(cost.monthly_cost, 8800.0);

        let high = Catalog::reference().get("trivyaHigh").unwrap();
        let cost = manager_cost(high, 1, &rates);
        assert_eq!(cost.hours_per_month, 5.5);
        assert_eq!(cost.monthly_cost, 275.0);
    }

    #[test]
    fn test_quote_manager_cost() {
        let catalog = Catalog::reference();
        let quote = quote_bundle(catalog, &units(&[("mini", 1), ("trivya", 1)]), None).unwrap();
        let cost = quote_manager_cost(catalog, &quote, &ManagerRates::default());
        // (4 + 0.5) * 22 = 99h
        assert_eq!(cost.hours_per_month, 99.0);
        assert_eq!(cost.monthly_cost, 4950.0);
    }
}
