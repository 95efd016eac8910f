use crate::domain::model::AdvisorSettings;
use crate::utils::error::Result;

/// Somewhere the tier catalog and advisor settings can be loaded from.
pub trait SettingsSource {
    fn source_name(&self) -> String;
    fn load_settings(&self) -> Result<AdvisorSettings>;
}
