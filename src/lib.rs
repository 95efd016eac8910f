pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use app::commands::{CommandRunner, OutputFormat};
pub use config::catalog_file::{CatalogFile, CatalogFileSource};
pub use config::cli::{BuiltinSettings, OutputTarget};
pub use core::engine::{
    display_pair, display_pair_with, monthly_cost, recommend_tier, savings_between, show_savings,
    units_needed, BundleAdvisor,
};
pub use domain::model::{
    AdvisorSettings, Catalog, PairingRule, Recommendation, Tier, TierCost, TierId, VolumeRange,
};
pub use utils::error::{AdvisorError, Result};
