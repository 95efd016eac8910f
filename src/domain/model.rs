use crate::utils::error::{AdvisorError, Result};
use crate::utils::validation::find_duplicate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Upper bound on a tier's monthly price. Keeps `units * price` inside `u64`
/// for any `u32` volume.
pub const MAX_MONTHLY_PRICE: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(String);

impl TierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TierId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<&str> for TierId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A fixed pricing plan. One purchased unit absorbs `daily_capacity` tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
    pub name: String,
    pub monthly_price: u64,
    pub daily_capacity: u32,
    #[serde(default)]
    pub manager_hours_per_day: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Tier {
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Ordered tier list, ascending by daily capacity.
///
/// Construction validates the invariants the engine depends on, so every
/// `Catalog` in the program has at least two tiers with unique ids and
/// strictly ascending capacities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    tiers: Vec<Tier>,
}

impl Catalog {
    pub fn new(tiers: Vec<Tier>) -> Result<Self> {
        if tiers.len() < 2 {
            return Err(invalid(format!(
                "at least 2 tiers are required, found {}",
                tiers.len()
            )));
        }

        if let Some(dup) = find_duplicate(tiers.iter().map(|t| t.id.as_str())) {
            return Err(invalid(format!("duplicate tier id '{}'", dup)));
        }

        for tier in &tiers {
            if tier.id.as_str().trim().is_empty() {
                return Err(invalid("tier id cannot be empty".to_string()));
            }
            if tier.name.trim().is_empty() {
                return Err(invalid(format!("tier '{}' has an empty name", tier.id)));
            }
            if tier.monthly_price == 0 || tier.monthly_price > MAX_MONTHLY_PRICE {
                return Err(invalid(format!(
                    "tier '{}' price must be between 1 and {}",
                    tier.id, MAX_MONTHLY_PRICE
                )));
            }
            if tier.daily_capacity == 0 {
                return Err(invalid(format!(
                    "tier '{}' daily capacity must be positive",
                    tier.id
                )));
            }
            if !tier.manager_hours_per_day.is_finite() || tier.manager_hours_per_day < 0.0 {
                return Err(invalid(format!(
                    "tier '{}' manager hours must be a non-negative number",
                    tier.id
                )));
            }
        }

        for pair in tiers.windows(2) {
            if pair[0].daily_capacity >= pair[1].daily_capacity {
                return Err(invalid(format!(
                    "capacities must be strictly ascending: '{}' ({}) is not below '{}' ({})",
                    pair[0].id, pair[0].daily_capacity, pair[1].id, pair[1].daily_capacity
                )));
            }
        }

        Ok(Self { tiers })
    }

    /// The three-tier catalog of the product's pricing page.
    pub fn reference() -> &'static Catalog {
        static REFERENCE: OnceLock<Catalog> = OnceLock::new();
        REFERENCE.get_or_init(|| Catalog {
            tiers: reference_tiers(),
        })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn lowest(&self) -> &Tier {
        &self.tiers[0]
    }

    pub fn highest(&self) -> &Tier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn get(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id.as_str() == id)
    }

    pub fn require(&self, id: &str) -> Result<&Tier> {
        self.get(id).ok_or_else(|| AdvisorError::UnknownTier { id: id.to_string() })
    }

    pub fn position(&self, id: &TierId) -> Option<usize> {
        self.tiers.iter().position(|t| &t.id == id)
    }
}

fn invalid(reason: String) -> AdvisorError {
    AdvisorError::InvalidCatalog { reason }
}

fn reference_tiers() -> Vec<Tier> {
    fn tier(
        id: &str,
        name: &str,
        monthly_price: u64,
        daily_capacity: u32,
        manager_hours_per_day: f64,
        features: &[&str],
    ) -> Tier {
        Tier {
            id: TierId::new(id),
            name: name.to_string(),
            monthly_price,
            daily_capacity,
            manager_hours_per_day,
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }

    vec![
        tier(
            "mini",
            "Mini Trivya",
            1000,
            200,
            4.0,
            &[
                "Handles up to 200 tickets/day",
                "Basic automation",
                "Email & chat support",
                "8/5 availability",
            ],
        ),
        tier(
            "trivya",
            "Trivya",
            2500,
            400,
            0.5,
            &[
                "Handles up to 400 tickets/day",
                "Advanced automation",
                "Multi-channel support",
                "24/7 availability",
                "Pattern learning",
                "Basic analytics",
            ],
        ),
        tier(
            "trivyaHigh",
            "Trivya High",
            4000,
            1000,
            0.25,
            &[
                "Handles 1000+ tickets/day",
                "Premium automation",
                "Omni-channel support",
                "24/7 availability",
                "Advanced AI learning",
                "Comprehensive analytics",
                "Dedicated account manager",
            ],
        ),
    ]
}

/// Cost of covering a volume with whole units of one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierCost {
    pub tier: TierId,
    pub units: u64,
    pub unit_price: u64,
    pub monthly_cost: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub volume: u32,
    pub recommended: TierId,
    pub pair: (TierId, TierId),
    pub costs: Vec<TierCost>,
    pub savings: u64,
    pub show_savings: bool,
}

impl Recommendation {
    pub fn cost_of(&self, id: &TierId) -> Option<&TierCost> {
        self.costs.iter().find(|c| &c.tier == id)
    }
}

/// Which neighbour the recommended tier is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PairingRule {
    /// Pair with the next cheaper tier; the lowest tier pairs upward.
    #[default]
    #[cfg_attr(feature = "cli", value(name = "lower", alias = "lower-neighbor"))]
    LowerNeighbor,
    /// Pair with the next larger tier; the highest tier pairs downward.
    #[cfg_attr(feature = "cli", value(name = "upper", alias = "upper-neighbor"))]
    UpperNeighbor,
}

/// Bounds of the volume input control. The engine never enforces these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

impl Default for VolumeRange {
    fn default() -> Self {
        Self {
            min: 50,
            max: 1000,
            step: 10,
            default: 200,
        }
    }
}

impl VolumeRange {
    pub fn contains(&self, volume: i64) -> bool {
        volume >= i64::from(self.min) && volume <= i64::from(self.max)
    }

    pub fn check(&self, volume: i64) -> Result<u32> {
        if !self.contains(volume) {
            return Err(AdvisorError::VolumeOutOfRange {
                volume,
                min: self.min,
                max: self.max,
            });
        }
        // contains() guarantees the value fits
        Ok(volume as u32)
    }

    /// Clamps into `[min, max]` and rounds to the nearest step counted from
    /// `min`. The result is always a value [`values`](Self::values) yields.
    pub fn snap(&self, volume: i64) -> u32 {
        debug_assert!(self.min <= self.max, "inverted volume range {:?}", self);
        let min = i64::from(self.min);
        let max = i64::from(self.max.max(self.min));
        let step = i64::from(self.step.max(1));
        let last = min + ((max - min) / step) * step;
        let clamped = volume.max(min).min(max);
        let offset = clamped - min;
        let snapped = min + ((offset + step / 2) / step) * step;
        // last <= max <= u32::MAX
        snapped.min(last) as u32
    }

    /// Every selectable volume from `min` to `max`.
    pub fn values(&self) -> impl Iterator<Item = u32> {
        let step = self.step.max(1) as usize;
        (self.min..=self.max).step_by(step)
    }
}

/// Rates used to price manager oversight time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManagerRates {
    pub hourly_rate: f64,
    pub working_days: u32,
}

impl Default for ManagerRates {
    fn default() -> Self {
        Self {
            hourly_rate: 50.0,
            working_days: 22,
        }
    }
}

/// Everything a settings source provides to the advisor.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorSettings {
    pub name: String,
    pub catalog: Catalog,
    pub volume_range: VolumeRange,
    pub pairing: PairingRule,
    pub manager_rates: ManagerRates,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            name: "Trivya bundles".to_string(),
            catalog: Catalog::reference().clone(),
            volume_range: VolumeRange::default(),
            pairing: PairingRule::default(),
            manager_rates: ManagerRates::default(),
        }
    }
}
