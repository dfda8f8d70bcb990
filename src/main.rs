use binwise::classifier::classify;
use binwise::config::Config;
use binwise::server::{self, AppState};
use binwise::vision::VisionClient;
use clap::{Arg, Command};
use log::LevelFilter;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let matches = Command::new("binwise")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Image-based waste sorting service: label detection + category rules")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/binwise.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the built-in default configuration to FILE")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the rule table and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("test-labels")
                .long("test-labels")
                .value_name("LABELS")
                .help("Classify a comma-separated label list offline and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("listen")
                .short('l')
                .long("listen")
                .value_name("ADDR")
                .help("Override the configured listen address"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        println!("Testing configuration: {config_path}");
        println!("Number of categories: {}", config.categories.len());
        for (i, rule) in config.categories.iter().enumerate() {
            println!(
                "  Category {}: {} ({} keywords)",
                i + 1,
                rule.name,
                rule.keywords.len()
            );
        }
        match config.rule_table() {
            Ok(_) => println!("Rule table validated successfully."),
            Err(e) => {
                println!("Configuration validation failed: {e}");
                process::exit(1);
            }
        }
        return;
    }

    // Rule table problems are fatal before anything is served.
    let table = match config.rule_table() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Some(raw_labels) = matches.get_one::<String>("test-labels") {
        let labels: Vec<String> = raw_labels
            .split(',')
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();

        println!("Classifying labels: {labels:?}");
        let result = classify(&labels, &table);
        println!("Category: {}", result.category);
        println!("Disposal: {}", result.disposal);
        return;
    }

    let api_key = match std::env::var(&config.vision.api_key_env) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!(
                "Error: environment variable '{}' is not set; the label detection \
                 service needs an API key",
                config.vision.api_key_env
            );
            process::exit(1);
        }
    };

    let vision = match VisionClient::new(&config.vision, api_key) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating label detection client: {e}");
            process::exit(1);
        }
    };

    let listen_addr = matches
        .get_one::<String>("listen")
        .cloned()
        .unwrap_or_else(|| config.listen_addr.clone());

    log::info!(
        "starting binwise with {} categories, labeling via {}",
        table.len(),
        config.vision.endpoint
    );

    let state = AppState {
        table: Arc::new(table),
        vision: Arc::new(vision),
    };

    if let Err(e) = server::start(&listen_addr, state).await {
        eprintln!("Server error: {e}");
        process::exit(1);
    }
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path)
    } else {
        log::warn!("Configuration file '{path}' not found, using default configuration");
        Ok(Config::default())
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}
