use anyhow::Context;
use clap::Parser;
use fmv_engine::cli::{Cli, Commands};
use fmv_engine::config::Config;
use fmv_engine::equipment::StandardEquipmentValues;
use fmv_engine::money::format_usd;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration; a missing file means defaults, an invalid one is an error
    let config = if std::path::Path::new(&cli.config).exists() {
        Config::load(&cli.config)
            .with_context(|| format!("Invalid configuration in {}", cli.config))?
    } else {
        eprintln!("Warning: {} not found, using default configuration", cli.config);
        Config::default()
    };

    // Initialize telemetry
    fmv_engine::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Analyze(args) => {
            tracing::info!("Starting market analysis");
            args.execute(&config)?;
        }
        Commands::Score(args) => {
            tracing::info!("Scoring comparables");
            args.execute(&config)?;
        }
        Commands::Equipment => {
            let lookup = StandardEquipmentValues::from_config(&config.equipment);
            println!("Equipment values ({} features):", lookup.len());
            for (name, value) in lookup.entries() {
                println!("  {:<28} {:>10}", name, format_usd(value));
            }
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
