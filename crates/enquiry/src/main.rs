//! `enquiry` - CLI for the enquiry form
//!
//! This binary runs an interactive form session in the terminal and offers
//! a few commands for inspecting configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use clap::Parser;

use enquiry::cli::{run_shell, Cli, Command, ConfigCommand, Shell};
use enquiry::notify::ChannelNotifier;
use enquiry::{init_logging, Config, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Shell => handle_shell(&config),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_shell(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let (notifier, notifications) = ChannelNotifier::new();
    let session = Session::from_config(config, Arc::new(notifier));
    let mut shell = Shell::new(session, notifications);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    runtime.block_on(run_shell(&mut shell, stdin.lock(), stdout.lock()))?;
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Relay]");
                println!("  Kind:               {:?}", config.relay.kind);
                println!("  Endpoint:           {}", config.relay.endpoint);
                println!("  Service ID:         {}", config.relay.service_id);
                println!("  Template ID:        {}", config.relay.template_id);
                match config.relay_timeout() {
                    Some(timeout) => println!("  Timeout:            {timeout:?}"),
                    None => println!("  Timeout:            none"),
                }
                println!();
                println!("[Export]");
                println!("  PDF path:           {}", config.pdf_path().display());
                println!("  Print view path:    {}", config.print_path().display());
                println!(
                    "  Print command:      {}",
                    if config.export.print_command.is_empty() {
                        "none (write file only)".to_string()
                    } else {
                        config.export.print_command.join(" ")
                    }
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
