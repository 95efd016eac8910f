pub mod comparison;
pub mod engine;
pub mod quote;
pub mod sweep;
pub mod visualizer;

pub use crate::domain::model::{Catalog, Recommendation, Tier, TierCost, TierId};
pub use crate::domain::ports::SettingsSource;
pub use crate::utils::error::Result;
