use crate::core::comparison::ComparisonTable;
use crate::core::engine::BundleAdvisor;
use crate::core::quote::{quote_bundle, quote_manager_cost, BundleQuote, ManagerCost};
use crate::core::sweep::{sweep, write_sweep_csv};
use crate::core::visualizer::{VisualizerEvent, VisualizerState, VisualizerView};
use crate::domain::model::{AdvisorSettings, PairingRule, Tier, TierId, VolumeRange};
use crate::domain::ports::SettingsSource;
use crate::utils::error::{AdvisorError, Result};
use crate::utils::format::{format_currency, format_hours};
use crate::utils::validation::{validate_positive_number, validate_range};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Serialize)]
struct RecommendReport<'a> {
    generated_at: DateTime<Utc>,
    source: &'a str,
    pairing: PairingRule,
    #[serde(flatten)]
    view: &'a VisualizerView,
}

#[derive(Debug, Serialize)]
struct CatalogReport<'a> {
    generated_at: DateTime<Utc>,
    source: &'a str,
    name: &'a str,
    volume_range: VolumeRange,
    pairing: PairingRule,
    tiers: &'a [Tier],
}

#[derive(Debug, Serialize)]
struct QuoteReport<'a> {
    generated_at: DateTime<Utc>,
    source: &'a str,
    quote: &'a BundleQuote,
    manager: ManagerCost,
}

/// Runs CLI commands against settings loaded once from a [`SettingsSource`].
#[derive(Debug, Clone)]
pub struct CommandRunner {
    source_name: String,
    settings: AdvisorSettings,
}

impl CommandRunner {
    pub fn from_source(source: &dyn SettingsSource) -> Result<Self> {
        let source_name = source.source_name();
        tracing::debug!("Loading settings from {}", source_name);
        let settings = source.load_settings()?;
        Ok(Self::new(source_name, settings))
    }

    pub fn new(source_name: impl Into<String>, settings: AdvisorSettings) -> Self {
        Self {
            source_name: source_name.into(),
            settings,
        }
    }

    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    fn advisor(&self, pairing: Option<PairingRule>) -> BundleAdvisor {
        BundleAdvisor::from_settings(&self.settings)
            .with_pairing(pairing.unwrap_or(self.settings.pairing))
    }

    pub fn recommend(
        &self,
        volume: Option<i64>,
        compare: bool,
        pairing: Option<PairingRule>,
        format: OutputFormat,
    ) -> Result<String> {
        let range = self.settings.volume_range;
        let volume = range.check(volume.unwrap_or_else(|| i64::from(range.default)))?;
        let advisor = self.advisor(pairing);

        let mut state = VisualizerState::with_volume(range, volume);
        if compare {
            state.apply(VisualizerEvent::ToggleComparison);
        }
        let view = state.view(&advisor);

        tracing::info!(
            "🎯 {} tickets/day -> {}",
            volume,
            view.recommendation.recommended
        );

        match format {
            OutputFormat::Json => {
                let report = RecommendReport {
                    generated_at: Utc::now(),
                    source: &self.source_name,
                    pairing: advisor.pairing(),
                    view: &view,
                };
                Ok(serde_json::to_string_pretty(&report)?)
            }
            OutputFormat::Human => Ok(render_recommendation(&advisor, &view)),
        }
    }

    pub fn catalog(&self, format: OutputFormat) -> Result<String> {
        let settings = &self.settings;
        match format {
            OutputFormat::Json => {
                let report = CatalogReport {
                    generated_at: Utc::now(),
                    source: &self.source_name,
                    name: &settings.name,
                    volume_range: settings.volume_range,
                    pairing: settings.pairing,
                    tiers: settings.catalog.tiers(),
                };
                Ok(serde_json::to_string_pretty(&report)?)
            }
            OutputFormat::Human => Ok(render_catalog(&self.source_name, settings)),
        }
    }

    /// CSV bytes for every volume in the configured range, with overrides.
    pub fn sweep(&self, min: Option<u32>, max: Option<u32>, step: Option<u32>) -> Result<Vec<u8>> {
        let base = self.settings.volume_range;
        let range = VolumeRange {
            min: min.unwrap_or(base.min),
            max: max.unwrap_or(base.max),
            step: step.unwrap_or(base.step),
            default: base.default,
        };
        validate_positive_number("sweep.min", range.min, 1)?;
        validate_positive_number("sweep.step", range.step, 1)?;
        validate_range("sweep.max", range.max, range.min, u32::MAX)?;

        let rows = sweep(&self.advisor(None), &range);
        tracing::info!(
            "📈 Swept {} volumes from {} to {} (step {})",
            rows.len(),
            range.min,
            range.max,
            range.step
        );

        let mut buffer = Vec::new();
        write_sweep_csv(&rows, &mut buffer)?;
        Ok(buffer)
    }

    pub fn quote(
        &self,
        units: &[(TierId, u64)],
        volume: Option<i64>,
        format: OutputFormat,
    ) -> Result<String> {
        let volume = volume
            .map(|v| {
                u32::try_from(v).map_err(|_| AdvisorError::VolumeOutOfRange {
                    volume: v,
                    min: 0,
                    max: u32::MAX,
                })
            })
            .transpose()?;

        let catalog = &self.settings.catalog;
        let quote = quote_bundle(catalog, units, volume)?;
        let manager = quote_manager_cost(catalog, &quote, &self.settings.manager_rates);

        if !quote.covers() {
            tracing::warn!(
                "⚠️ Bundle is {} tickets/day short of the requested volume",
                quote.shortfall
            );
        }
        if let Some(alt) = &quote.alternative {
            tracing::warn!(
                "💸 {} × {} covers the volume for {} less per month",
                alt.cost.units,
                alt.cost.tier,
                alt.savings
            );
        }

        match format {
            OutputFormat::Json => {
                let report = QuoteReport {
                    generated_at: Utc::now(),
                    source: &self.source_name,
                    quote: &quote,
                    manager,
                };
                Ok(serde_json::to_string_pretty(&report)?)
            }
            OutputFormat::Human => Ok(render_quote(&self.settings, &quote, &manager, volume)),
        }
    }
}

fn tier_name<'a>(advisor: &'a BundleAdvisor, id: &'a TierId) -> &'a str {
    advisor
        .catalog()
        .get(id.as_str())
        .map(|t| t.name.as_str())
        .unwrap_or(id.as_str())
}

fn render_recommendation(advisor: &BundleAdvisor, view: &VisualizerView) -> String {
    let rec = &view.recommendation;
    let mut out = String::new();

    let _ = writeln!(out, "📊 Bundle recommendation for {} tickets/day", rec.volume);
    let _ = writeln!(out, "  Recommended: {}", tier_name(advisor, &rec.recommended));
    let _ = writeln!(
        out,
        "  Compare: {} vs {}",
        tier_name(advisor, &rec.pair.0),
        tier_name(advisor, &rec.pair.1)
    );
    let _ = writeln!(out, "  Monthly cost at this volume:");
    for cost in &rec.costs {
        let _ = writeln!(
            out,
            "    {:<16} {} × {} = {}",
            tier_name(advisor, &cost.tier),
            cost.units,
            format_currency(cost.unit_price),
            format_currency(cost.monthly_cost)
        );
    }

    if let Some(banner) = &view.banner {
        let _ = writeln!(out);
        let _ = writeln!(out, "💰 {}", banner);
    }

    if let Some(table) = &view.comparison {
        let _ = writeln!(out);
        out.push_str(&render_comparison(table));
    }

    out
}

fn render_comparison(table: &ComparisonTable) -> String {
    let label_width = table
        .rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Feature".len());
    let left_width = table
        .rows
        .iter()
        .map(|r| r.left.chars().count())
        .chain(std::iter::once(table.left.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<lw$}  {:>cw$}  {}",
        "Feature",
        table.left,
        table.right,
        lw = label_width,
        cw = left_width
    );
    for row in &table.rows {
        let _ = writeln!(
            out,
            "  {:<lw$}  {:>cw$}  {}",
            row.label,
            row.left,
            row.right,
            lw = label_width,
            cw = left_width
        );
    }
    let _ = writeln!(out, "  {:<lw$}  {}", "Savings", table.savings_summary, lw = label_width);
    out
}

fn render_catalog(source: &str, settings: &AdvisorSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📚 Catalog: {} ({})", settings.name, source);
    let range = settings.volume_range;
    let _ = writeln!(
        out,
        "  Volume range: {}..={} step {} (default {})",
        range.min, range.max, range.step, range.default
    );
    let _ = writeln!(out, "  Pairing: {:?}", settings.pairing);
    let _ = writeln!(out);

    for tier in settings.catalog.tiers() {
        let _ = writeln!(
            out,
            "  {:<12} {:<16} {:>8}/month  {:>5} tickets/day  ~{} hrs/day",
            tier.id.as_str(),
            tier.name,
            format_currency(tier.monthly_price),
            tier.daily_capacity,
            format_hours(tier.manager_hours_per_day)
        );
        for feature in &tier.features {
            let _ = writeln!(out, "      ✓ {}", feature);
        }
    }
    out
}

fn render_quote(
    settings: &AdvisorSettings,
    quote: &BundleQuote,
    manager: &ManagerCost,
    volume: Option<u32>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🧾 Bundle quote");
    for line in &quote.lines {
        let name = settings
            .catalog
            .get(line.tier.as_str())
            .map(|t| t.name.as_str())
            .unwrap_or(line.tier.as_str());
        let _ = writeln!(
            out,
            "  {:<16} {} × {} = {}",
            name,
            line.units,
            format_currency(line.unit_price),
            format_currency(line.line_cost)
        );
    }
    let _ = writeln!(
        out,
        "  Total: {}/month for {} tickets/day",
        format_currency(quote.total_monthly_cost),
        quote.total_daily_capacity
    );
    let _ = writeln!(
        out,
        "  Manager time: {} hrs/month (~${:.2} at ${:.2}/hr)",
        format_hours(manager.hours_per_month),
        manager.monthly_cost,
        settings.manager_rates.hourly_rate
    );

    if let Some(volume) = volume {
        if quote.covers() {
            let _ = writeln!(out, "  ✅ Covers {} tickets/day", volume);
        } else {
            let _ = writeln!(
                out,
                "  ⚠️ Short by {} tickets/day for {} tickets/day",
                quote.shortfall, volume
            );
        }
    }

    if let Some(alt) = &quote.alternative {
        let name = settings
            .catalog
            .get(alt.cost.tier.as_str())
            .map(|t| t.name.as_str())
            .unwrap_or(alt.cost.tier.as_str());
        let _ = writeln!(
            out,
            "  💡 Cheaper: {} × {} = {}/month (saves {})",
            alt.cost.units,
            name,
            format_currency(alt.cost.monthly_cost),
            format_currency(alt.savings)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::BuiltinSettings;

    fn runner() -> CommandRunner {
        CommandRunner::from_source(&BuiltinSettings).unwrap()
    }

    #[test]
    fn test_recommend_human() {
        let out = runner()
            .recommend(Some(250), false, None, OutputFormat::Human)
            .unwrap();
        assert!(out.contains("Recommended: Trivya"));
        assert!(out.contains("Compare: Mini Trivya vs Trivya"));
        assert!(out.contains("2 × $1,000 = $2,000"));
        assert!(out.contains("You could save up to $500/month"));
        assert!(!out.contains("Feature"));
    }

    #[test]
    fn test_recommend_with_comparison() {
        let out = runner()
            .recommend(Some(450), true, None, OutputFormat::Human)
            .unwrap();
        assert!(out.contains("Feature"));
        assert!(out.contains("Enterprises"));
        assert!(out.contains("savings with Trivya"));
    }

    #[test]
    fn test_recommend_default_volume_has_no_banner() {
        let out = runner().recommend(None, false, None, OutputFormat::Human).unwrap();
        assert!(out.contains("for 200 tickets/day"));
        assert!(!out.contains("💰"));
    }

    #[test]
    fn test_recommend_rejects_out_of_range_volume() {
        let err = runner()
            .recommend(Some(20), false, None, OutputFormat::Human)
            .unwrap_err();
        assert!(matches!(err, AdvisorError::VolumeOutOfRange { volume: 20, .. }));
    }

    #[test]
    fn test_recommend_json() {
        let out = runner()
            .recommend(Some(300), false, Some(PairingRule::UpperNeighbor), OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["source"], "builtin");
        assert_eq!(value["pairing"], "upper_neighbor");
        assert_eq!(value["recommendation"]["recommended"], "trivya");
        assert_eq!(value["recommendation"]["pair"][1], "trivyaHigh");
        assert_eq!(value["recommendation"]["savings"], 1500);
        assert!(value["comparison"].is_null());
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_catalog_outputs() {
        let human = runner().catalog(OutputFormat::Human).unwrap();
        assert!(human.contains("Mini Trivya"));
        assert!(human.contains("✓ 24/7 availability"));

        let json = runner().catalog(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tiers"].as_array().unwrap().len(), 3);
        assert_eq!(value["volume_range"]["default"], 200);
    }

    #[test]
    fn test_sweep_csv() {
        let csv = runner().sweep(Some(390), Some(410), Some(10)).unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "390,trivya,mini,trivya,2000,2500,500");
        assert_eq!(lines[3], "410,trivyaHigh,trivya,trivyaHigh,5000,4000,1000");
    }

    #[test]
    fn test_sweep_rejects_inverted_range() {
        assert!(runner().sweep(Some(500), Some(100), None).is_err());
    }

    #[test]
    fn test_quote_human() {
        let units = vec![(TierId::new("mini"), 2)];
        let out = runner().quote(&units, Some(500), OutputFormat::Human).unwrap();
        assert!(out.contains("Total: $2,000/month for 400 tickets/day"));
        assert!(out.contains("Short by 100 tickets/day"));
        assert!(out.contains("176 hrs/month"));
    }

    #[test]
    fn test_quote_suggests_cheaper_stack() {
        let units = vec![(TierId::new("mini"), 5)];
        let out = runner().quote(&units, Some(650), OutputFormat::Human).unwrap();
        assert!(out.contains("Cheaper: 1 × Trivya High = $4,000/month (saves $1,000)"));

        let json = runner().quote(&units, Some(650), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["quote"]["alternative"]["cost"]["tier"], "trivyaHigh");
        assert_eq!(value["quote"]["alternative"]["savings"], 1000);

        let out = runner().quote(&units, None, OutputFormat::Human).unwrap();
        assert!(!out.contains("Cheaper"));
    }

    #[test]
    fn test_quote_overflow_is_reported() {
        let units = vec![(TierId::new("mini"), u64::MAX)];
        let err = runner().quote(&units, None, OutputFormat::Json).unwrap_err();
        assert!(matches!(err, AdvisorError::QuoteOverflow { .. }));
    }

    #[test]
    fn test_quote_rejects_negative_volume() {
        let units = vec![(TierId::new("mini"), 1)];
        assert!(runner().quote(&units, Some(-1), OutputFormat::Human).is_err());
    }
}
