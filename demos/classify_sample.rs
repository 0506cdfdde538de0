//! Classify a skin-color sample from the command line
//!
//! Accepts a hex color or three Lab components, and optionally a JSON
//! configuration file. Prints the result as JSON.

use season_scan::{ClassifierConfig, LabColor, SeasonClassifier};
use std::{env, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut values = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a path");
                    process::exit(1);
                }
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg => values.push(arg.to_string()),
        }
        i += 1;
    }

    let classifier = match config_path {
        Some(path) => {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading {}: {}", path, e);
                    process::exit(1);
                }
            };
            match ClassifierConfig::from_json(&content).and_then(|c| c.build_classifier_lenient()) {
                Ok(classifier) => classifier,
                Err(e) => {
                    eprintln!("Error: {}", e.user_message());
                    process::exit(1);
                }
            }
        }
        None => SeasonClassifier::new(),
    };

    let result = match values.as_slice() {
        [hex] => classifier.classify_hex(hex),
        [l, a, b] => match (l.parse(), a.parse(), b.parse()) {
            (Ok(l), Ok(a), Ok(b)) => classifier.classify(LabColor::new(l, a, b)),
            _ => {
                eprintln!("Error: Lab components must be numbers");
                process::exit(1);
            }
        },
        _ => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    match result {
        Ok(result) => {
            eprintln!("{} (range fit {:.0}%)", result.label(), result.confidence);
            for (season, probability) in result.ranked_seasons() {
                eprintln!("  {:<7} {:>5.1}%", season, probability * 100.0);
            }
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing result: {}", e);
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            process::exit(1);
        }
    }
}

fn print_help(program: &str) {
    eprintln!("Usage: {} [--config <config.json>] <#RRGGBB | L a b>", program);
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} '#BE9D87'", program);
    eprintln!("  {} 67 9 16", program);
}
