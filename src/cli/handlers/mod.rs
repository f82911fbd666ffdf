mod classify;
pub use classify::{TraceError, TraceEvent, TraceEventKind, classify_trace, read_trace};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::gesture::GestureClassifier;
use crate::io::config_io;

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config = config_io::load_config(&cli.config)?;
    log::debug!("loaded config from {}", cli.config.display());

    match cli.command {
        Commands::Classify(args) => {
            let events = read_trace(&args.trace)?;
            let classifier = GestureClassifier::new(config.gesture);
            let reports = classify_trace(&classifier, &events)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for line in format_reports(&reports) {
                    println!("{line}");
                }
            }
            Ok(())
        }
        Commands::Config => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", config_io::config_to_toml(&config)?);
            }
            Ok(())
        }
    }
}
