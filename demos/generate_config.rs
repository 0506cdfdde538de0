//! Generate the default classifier configuration file
//!
//! Creates a JSON config with all default parameters

use season_scan::ClassifierConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} config/classifier.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = ClassifierConfig::default();

    let json = match config.to_json_pretty() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing config: {}", e.user_message());
            process::exit(1);
        }
    };

    match std::fs::write(output_path, json) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!(
                "  Conversion: illuminant {}, {} decimals",
                config.conversion.illuminant, config.conversion.precision
            );
            eprintln!(
                "  Confidence: max ΔE {:.0}, metric {:?}",
                config.confidence.max_distance, config.confidence.distance_metric
            );
            eprintln!(
                "  Cache: {} (capacity {}, {:?})",
                if config.cache.enabled { "enabled" } else { "disabled" },
                config.cache.capacity,
                config.cache.eviction
            );
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
