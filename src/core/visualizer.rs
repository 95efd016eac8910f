use crate::core::comparison::{savings_message, ComparisonTable};
use crate::core::engine::BundleAdvisor;
use crate::domain::model::{Recommendation, VolumeRange};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizerEvent {
    /// Raw slider input; clamped and snapped to the range.
    SetVolume(i64),
    /// Move by this many steps.
    Nudge(i64),
    ToggleComparison,
}

/// Widget state for the bundle visualizer, changed only through events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizerState {
    range: VolumeRange,
    volume: u32,
    show_comparison: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualizerView {
    pub recommendation: Recommendation,
    pub banner: Option<String>,
    pub comparison: Option<ComparisonTable>,
}

impl VisualizerState {
    pub fn new(range: VolumeRange) -> Self {
        Self {
            volume: range.snap(i64::from(range.default)),
            range,
            show_comparison: false,
        }
    }

    /// Starts at `volume` clamped into the range. Only slider events snap to the step.
    pub fn with_volume(range: VolumeRange, volume: u32) -> Self {
        Self {
            volume: volume.max(range.min).min(range.max.max(range.min)),
            range,
            show_comparison: false,
        }
    }

    pub fn volume(&self) -> u32 {
        self.volume
    }

    pub fn show_comparison(&self) -> bool {
        self.show_comparison
    }

    pub fn range(&self) -> &VolumeRange {
        &self.range
    }

    pub fn apply(&mut self, event: VisualizerEvent) {
        match event {
            VisualizerEvent::SetVolume(raw) => {
                self.volume = self.range.snap(raw);
            }
            VisualizerEvent::Nudge(steps) => {
                let delta = steps.saturating_mul(i64::from(self.range.step));
                self.volume = self.range.snap(i64::from(self.volume).saturating_add(delta));
            }
            VisualizerEvent::ToggleComparison => {
                self.show_comparison = !self.show_comparison;
            }
        }
        tracing::debug!(
            ?event,
            volume = self.volume,
            show_comparison = self.show_comparison,
            "visualizer event applied"
        );
    }

    pub fn view(&self, advisor: &BundleAdvisor) -> VisualizerView {
        let recommendation = advisor.recommend(self.volume);
        let banner = savings_message(advisor.catalog(), &recommendation);
        let comparison = self
            .show_comparison
            .then(|| ComparisonTable::build(advisor, self.volume));

        VisualizerView {
            recommendation,
            banner,
            comparison,
        }
    }
}

impl Default for VisualizerState {
    fn default() -> Self {
        Self::new(VolumeRange::default())
    }
}
