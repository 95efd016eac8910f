//! Bundle recommendation engine.
//!
//! Pure functions over an immutable [`Catalog`]. The same `(volume, catalog)`
//! always yields the same answer.

use crate::domain::model::{
    AdvisorSettings, Catalog, PairingRule, Recommendation, Tier, TierCost,
};

/// Whole units of `tier` needed to absorb `volume` tickets/day (at least 1).
pub fn units_needed(volume: u32, tier: &Tier) -> u64 {
    u64::from(volume.div_ceil(tier.daily_capacity)).max(1)
}

/// Monthly cost of covering `volume` with whole units of `tier`.
pub fn monthly_cost(volume: u32, tier: &Tier) -> u64 {
    units_needed(volume, tier) * tier.monthly_price
}

pub fn savings_between(volume: u32, a: &Tier, b: &Tier) -> u64 {
    monthly_cost(volume, a).abs_diff(monthly_cost(volume, b))
}

fn recommended_index(volume: u32, catalog: &Catalog) -> usize {
    catalog
        .tiers()
        .iter()
        .position(|t| t.daily_capacity >= volume)
        .unwrap_or(catalog.len() - 1)
}

/// Lowest-capacity tier that absorbs `volume` in one unit, else the highest tier.
pub fn recommend_tier(volume: u32, catalog: &Catalog) -> &Tier {
    &catalog.tiers()[recommended_index(volume, catalog)]
}

/// Adjacent pair shown side by side, using the default [`PairingRule`].
pub fn display_pair(volume: u32, catalog: &Catalog) -> (&Tier, &Tier) {
    display_pair_with(volume, catalog, PairingRule::default())
}

/// Two distinct tiers, adjacent in capacity order, one of which is the
/// recommended tier. Lower-capacity tier first.
pub fn display_pair_with(volume: u32, catalog: &Catalog, rule: PairingRule) -> (&Tier, &Tier) {
    let tiers = catalog.tiers();
    let last = tiers.len() - 1;
    let idx = recommended_index(volume, catalog);

    let lower = match rule {
        PairingRule::LowerNeighbor => idx.saturating_sub(1),
        PairingRule::UpperNeighbor => idx.min(last - 1),
    };
    (&tiers[lower], &tiers[lower + 1])
}

/// Savings messaging only makes sense once the cheapest tier no longer fits.
pub fn show_savings(volume: u32, catalog: &Catalog) -> bool {
    volume > catalog.lowest().daily_capacity
}

pub fn tier_cost(volume: u32, tier: &Tier) -> TierCost {
    let units = units_needed(volume, tier);
    TierCost {
        tier: tier.id.clone(),
        units,
        unit_price: tier.monthly_price,
        monthly_cost: units * tier.monthly_price,
    }
}

#[derive(Debug, Clone)]
pub struct BundleAdvisor {
    catalog: Catalog,
    pairing: PairingRule,
}

impl BundleAdvisor {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            pairing: PairingRule::default(),
        }
    }

    pub fn reference() -> Self {
        Self::new(Catalog::reference().clone())
    }

    pub fn from_settings(settings: &AdvisorSettings) -> Self {
        Self::new(settings.catalog.clone()).with_pairing(settings.pairing)
    }

    pub fn with_pairing(mut self, pairing: PairingRule) -> Self {
        self.pairing = pairing;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pairing(&self) -> PairingRule {
        self.pairing
    }

    pub fn recommend_tier(&self, volume: u32) -> &Tier {
        recommend_tier(volume, &self.catalog)
    }

    pub fn display_pair(&self, volume: u32) -> (&Tier, &Tier) {
        display_pair_with(volume, &self.catalog, self.pairing)
    }

    pub fn recommend(&self, volume: u32) -> Recommendation {
        let recommended = self.recommend_tier(volume);
        let (a, b) = self.display_pair(volume);
        let savings = savings_between(volume, a, b);

        tracing::debug!(
            volume,
            recommended = %recommended.id,
            pair_a = %a.id,
            pair_b = %b.id,
            savings,
            "computed recommendation"
        );

        Recommendation {
            volume,
            recommended: recommended.id.clone(),
            pair: (a.id.clone(), b.id.clone()),
            costs: self
                .catalog
                .tiers()
                .iter()
                .map(|t| tier_cost(volume, t))
                .collect(),
            savings,
            show_savings: show_savings(volume, &self.catalog),
        }
    }
}
