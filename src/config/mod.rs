pub mod catalog_file;
pub mod cli;

#[cfg(feature = "cli")]
pub use self::args::{parse_units, CliConfig, Command};

#[cfg(feature = "cli")]
mod args {
    use crate::app::commands::OutputFormat;
    use crate::domain::model::{PairingRule, TierId};
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_path, validate_positive_number, Validate};
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "bundle-advisor")]
    #[command(about = "Recommend a support bundle tier for a daily ticket volume")]
    pub struct CliConfig {
        /// TOML catalog file; the built-in catalog is used when omitted
        #[arg(long, global = true, env = "BUNDLE_ADVISOR_CATALOG")]
        pub catalog: Option<String>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Recommend a tier and compare it with its neighbour
        Recommend {
            /// Estimated tickets per day (defaults to the range default)
            #[arg(long, allow_negative_numbers = true)]
            volume: Option<i64>,

            /// Include the side-by-side comparison table
            #[arg(long)]
            compare: bool,

            /// Override the catalog's pairing rule
            #[arg(long, value_enum)]
            pairing: Option<PairingRule>,

            #[arg(long, value_enum, default_value = "human")]
            format: OutputFormat,
        },

        /// List the tiers of the catalog
        Catalog {
            #[arg(long, value_enum, default_value = "human")]
            format: OutputFormat,
        },

        /// Recommendation for every selectable volume, as CSV
        Sweep {
            #[arg(long)]
            min: Option<u32>,

            #[arg(long)]
            max: Option<u32>,

            #[arg(long)]
            step: Option<u32>,

            /// Output file; stdout when omitted or "-"
            #[arg(short, long)]
            output: Option<String>,
        },

        /// Price an explicit bundle, e.g. --units mini=2 --units trivya
        Quote {
            #[arg(long = "units", value_parser = parse_units, required = true)]
            units: Vec<(TierId, u64)>,

            /// Daily volume to check the bundle's capacity against
            #[arg(long, allow_negative_numbers = true)]
            volume: Option<i64>,

            #[arg(long, value_enum, default_value = "human")]
            format: OutputFormat,
        },
    }

    /// Parses `id=count`, or a bare `id` meaning one unit.
    pub fn parse_units(value: &str) -> std::result::Result<(TierId, u64), String> {
        let (id, count) = match value.split_once('=') {
            Some((id, count)) => {
                let count = count
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| format!("invalid unit count '{}': {}", count, e))?;
                (id.trim(), count)
            }
            None => (value.trim(), 1),
        };
        if id.is_empty() {
            return Err(format!("missing tier id in '{}'", value));
        }
        if count == 0 {
            return Err(format!("unit count for '{}' must be at least 1", id));
        }
        Ok((TierId::new(id), count))
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if let Some(path) = &self.catalog {
                validate_path("catalog", path)?;
            }
            if let Command::Sweep { step, output, .. } = &self.command {
                if let Some(step) = step {
                    validate_positive_number("sweep.step", *step, 1)?;
                }
                if let Some(output) = output {
                    validate_path("sweep.output", output)?;
                }
            }
            Ok(())
        }
    }

}
