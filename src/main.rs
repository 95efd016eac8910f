use bundle_advisor::domain::ports::SettingsSource;
use bundle_advisor::utils::error::{AdvisorError, ErrorSeverity};
use bundle_advisor::utils::{logger, validation::Validate};
use bundle_advisor::{
    BuiltinSettings, CatalogFileSource, CliConfig, Command, CommandRunner, OutputTarget,
};
use clap::Parser;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting bundle-advisor CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證參數
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(config) {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,    // 警告，但成功
            ErrorSeverity::Medium => 2, // 檔案存取錯誤
            ErrorSeverity::High => 1,   // 輸入或設定錯誤
            ErrorSeverity::Critical => 3, // 目錄無法使用
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(config: CliConfig) -> Result<(), AdvisorError> {
    // 選擇目錄來源
    let source: Box<dyn SettingsSource> = match &config.catalog {
        Some(path) => Box::new(CatalogFileSource::new(path)),
        None => Box::new(BuiltinSettings),
    };
    tracing::info!("📁 Using catalog source: {}", source.source_name());

    let runner = CommandRunner::from_source(source.as_ref())?;

    match config.command {
        Command::Recommend {
            volume,
            compare,
            pairing,
            format,
        } => {
            let output = runner.recommend(volume, compare, pairing, format)?;
            println!("{}", output.trim_end());
        }
        Command::Catalog { format } => {
            let output = runner.catalog(format)?;
            println!("{}", output.trim_end());
        }
        Command::Sweep {
            min,
            max,
            step,
            output,
        } => {
            let csv = runner.sweep(min, max, step)?;
            let target = OutputTarget::from_option(output.as_deref());
            target.write(&csv)?;
            if let OutputTarget::File(path) = &target {
                tracing::info!("✅ Sweep saved to: {}", path.display());
            }
        }
        Command::Quote {
            units,
            volume,
            format,
        } => {
            let output = runner.quote(&units, volume, format)?;
            println!("{}", output.trim_end());
        }
    }

    Ok(())
}
