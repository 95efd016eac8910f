//! Side-by-side comparison of the display pair and the savings banner.

use crate::core::engine::{savings_between, show_savings, units_needed, BundleAdvisor};
use crate::domain::model::{Catalog, Recommendation, Tier};
use crate::utils::format::{format_currency, format_hours};
use serde::Serialize;

const ROUND_THE_CLOCK: &str = "24/7 availability";
const PATTERN_LEARNING: &str = "Pattern learning";
const ADVANCED_LEARNING: &str = "Advanced AI learning";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonTable {
    pub volume: u32,
    pub left: String,
    pub right: String,
    pub rows: Vec<ComparisonRow>,
    pub savings_summary: String,
}

impl ComparisonTable {
    pub fn build(advisor: &BundleAdvisor, volume: u32) -> Self {
        let catalog = advisor.catalog();
        let (a, b) = advisor.display_pair(volume);
        let savings = if show_savings(volume, catalog) {
            savings_between(volume, a, b)
        } else {
            0
        };

        let rows = vec![
            row("Monthly Cost", a, b, |t| format_currency(t.monthly_price)),
            row("Daily Capacity", a, b, |t| format!("{} tickets", t.daily_capacity)),
            row("Manager Time", a, b, |t| {
                format!("{} hrs/day", format_hours(t.manager_hours_per_day))
            }),
            row("Support", a, b, |t| support_level(t).to_string()),
            ComparisonRow {
                label: "AI Learning".to_string(),
                left: entry_learning_level(a).to_string(),
                right: learning_level(b).to_string(),
            },
            row("Best For", a, b, |t| audience(catalog, t).to_string()),
            row("Estimated Monthly Cost", a, b, |t| estimated_cost(volume, t)),
        ];

        Self {
            volume,
            left: a.name.clone(),
            right: b.name.clone(),
            rows,
            savings_summary: savings_summary(savings, a, b),
        }
    }

    pub fn row(&self, label: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

fn row<F>(label: &str, a: &Tier, b: &Tier, render: F) -> ComparisonRow
where
    F: Fn(&Tier) -> String,
{
    ComparisonRow {
        label: label.to_string(),
        left: render(a),
        right: render(b),
    }
}

pub fn support_level(tier: &Tier) -> &'static str {
    if tier.has_feature(ROUND_THE_CLOCK) {
        "24/7"
    } else {
        "Business Hours"
    }
}

/// Learning level of the lower-capacity column, rated against its upgrade.
pub fn entry_learning_level(tier: &Tier) -> &'static str {
    if tier.has_feature(PATTERN_LEARNING) {
        "Basic"
    } else {
        "Limited"
    }
}

pub fn learning_level(tier: &Tier) -> &'static str {
    if tier.has_feature(ADVANCED_LEARNING) {
        "Advanced"
    } else if tier.has_feature(PATTERN_LEARNING) {
        "Standard"
    } else {
        "Basic"
    }
}

/// Audience label by position in the catalog.
pub fn audience(catalog: &Catalog, tier: &Tier) -> &'static str {
    match catalog.position(&tier.id) {
        Some(0) => "Small businesses",
        Some(i) if i + 1 == catalog.len() => "Enterprises",
        _ => "Growing businesses",
    }
}

fn estimated_cost(volume: u32, tier: &Tier) -> String {
    let units = units_needed(volume, tier);
    format!(
        "{} ({} × {})",
        format_currency(units * tier.monthly_price),
        units,
        format_currency(tier.monthly_price)
    )
}

/// Names the pair member with the lower list price.
fn savings_summary(savings: u64, a: &Tier, b: &Tier) -> String {
    if savings == 0 {
        return format!("{} No significant savings", format_currency(0));
    }
    let cheaper = if a.monthly_price < b.monthly_price { a } else { b };
    format!("{} savings with {}", format_currency(savings), cheaper.name)
}

/// Banner text, present only when the volume outgrows the cheapest tier.
pub fn savings_message(catalog: &Catalog, recommendation: &Recommendation) -> Option<String> {
    if !recommendation.show_savings {
        return None;
    }
    let name = catalog
        .get(recommendation.recommended.as_str())
        .map(|t| t.name.as_str())
        .unwrap_or(recommendation.recommended.as_str());
    Some(format!(
        "You could save up to {}/month by choosing {} for your volume!",
        format_currency(recommendation.savings),
        name
    ))
}
