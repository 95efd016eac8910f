use crate::domain::model::{
    AdvisorSettings, Catalog, ManagerRates, PairingRule, Tier, TierId, VolumeRange,
};
use crate::domain::ports::SettingsSource;
use crate::utils::error::{AdvisorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_required_field,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub catalog: CatalogInfo,
    pub volume: Option<VolumeConfig>,
    pub pairing: Option<PairingConfig>,
    pub manager: Option<ManagerConfig>,
    #[serde(default)]
    pub tiers: Vec<TierConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeConfig {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub step: Option<u32>,
    pub default: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingConfig {
    pub rule: PairingRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    pub hourly_rate: Option<f64>,
    pub working_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    pub id: Option<String>,
    pub name: Option<String>,
    pub monthly_price: Option<u64>,
    pub daily_capacity: Option<u32>,
    pub manager_hours_per_day: Option<f64>,
    pub features: Option<Vec<String>>,
}

impl CatalogFile {
    /// 從 TOML 檔案載入目錄
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdvisorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析目錄
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdvisorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PRICING_MINI_COST})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdvisorError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn volume_range(&self) -> VolumeRange {
        let defaults = VolumeRange::default();
        match &self.volume {
            Some(v) => VolumeRange {
                min: v.min.unwrap_or(defaults.min),
                max: v.max.unwrap_or(defaults.max),
                step: v.step.unwrap_or(defaults.step),
                default: v.default.unwrap_or(defaults.default),
            },
            None => defaults,
        }
    }

    pub fn pairing_rule(&self) -> PairingRule {
        self.pairing.as_ref().map(|p| p.rule).unwrap_or_default()
    }

    pub fn manager_rates(&self) -> ManagerRates {
        let defaults = ManagerRates::default();
        match &self.manager {
            Some(m) => ManagerRates {
                hourly_rate: m.hourly_rate.unwrap_or(defaults.hourly_rate),
                working_days: m.working_days.unwrap_or(defaults.working_days),
            },
            None => defaults,
        }
    }

    /// 驗證設定，不含目錄本身的排序規則
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("catalog.name", &self.catalog.name)?;

        let range = self.volume_range();
        validate_positive_number("volume.min", range.min, 1)?;
        validate_positive_number("volume.step", range.step, 1)?;
        validate_range("volume.max", range.max, range.min, u32::MAX)?;
        validate_range("volume.default", range.default, range.min, range.max)?;

        let rates = self.manager_rates();
        validate_positive_number("manager.hourly_rate", rates.hourly_rate, 0.0)?;
        validate_range("manager.working_days", rates.working_days, 1, 31)?;

        for (i, tier) in self.tiers.iter().enumerate() {
            let id = validate_required_field(&format!("tiers[{}].id", i), &tier.id)?;
            validate_non_empty_string(&format!("tiers[{}].id", i), id)?;
            let name = validate_required_field(&format!("tiers[{}].name", i), &tier.name)?;
            validate_non_empty_string(&format!("tiers[{}].name", i), name)?;
            validate_required_field(&format!("tiers[{}].monthly_price", i), &tier.monthly_price)?;
            validate_required_field(&format!("tiers[{}].daily_capacity", i), &tier.daily_capacity)?;
        }

        Ok(())
    }

    pub fn to_catalog(&self) -> Result<Catalog> {
        let mut tiers = Vec::with_capacity(self.tiers.len());
        for (i, tier) in self.tiers.iter().enumerate() {
            tiers.push(Tier {
                id: TierId::new(validate_required_field(&format!("tiers[{}].id", i), &tier.id)?.as_str()),
                name: validate_required_field(&format!("tiers[{}].name", i), &tier.name)?.clone(),
                monthly_price: *validate_required_field(
                    &format!("tiers[{}].monthly_price", i),
                    &tier.monthly_price,
                )?,
                daily_capacity: *validate_required_field(
                    &format!("tiers[{}].daily_capacity", i),
                    &tier.daily_capacity,
                )?,
                manager_hours_per_day: tier.manager_hours_per_day.unwrap_or(0.0),
                features: tier.features.clone().unwrap_or_default(),
            });
        }
        Catalog::new(tiers)
    }

    pub fn to_settings(&self) -> Result<AdvisorSettings> {
        self.validate_config()?;
        Ok(AdvisorSettings {
            name: self.catalog.name.clone(),
            catalog: self.to_catalog()?,
            volume_range: self.volume_range(),
            pairing: self.pairing_rule(),
            manager_rates: self.manager_rates(),
        })
    }
}

impl Validate for CatalogFile {
    fn validate(&self) -> Result<()> {
        self.validate_config()?;
        self.to_catalog().map(|_| ())
    }
}

/// Settings loaded from a TOML catalog file on disk.
#[derive(Debug, Clone)]
pub struct CatalogFileSource {
    path: PathBuf,
}

impl CatalogFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsSource for CatalogFileSource {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn load_settings(&self) -> Result<AdvisorSettings> {
        let file = CatalogFile::from_file(&self.path)?;
        let settings = file.to_settings()?;
        tracing::info!(
            "📚 Loaded catalog '{}' with {} tiers from {}",
            settings.name,
            settings.catalog.len(),
            self.path.display()
        );
        Ok(settings)
    }
}
