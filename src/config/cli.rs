use crate::domain::model::AdvisorSettings;
use crate::domain::ports::SettingsSource;
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The reference catalog compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct BuiltinSettings;

impl SettingsSource for BuiltinSettings {
    fn source_name(&self) -> String {
        "builtin".to_string()
    }

    fn load_settings(&self) -> Result<AdvisorSettings> {
        Ok(AdvisorSettings::default())
    }
}

/// Where a report ends up: stdout, or a file under its parent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_option(path: Option<&str>) -> Self {
        match path {
            Some(p) if p != "-" => OutputTarget::File(PathBuf::from(p)),
            _ => OutputTarget::Stdout,
        }
    }

    pub fn write(&self, data: &[u8]) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush()?;
            }
            OutputTarget::File(path) => write_file(path, data)?,
        }
        Ok(())
    }
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, data)?;
    Ok(())
}
