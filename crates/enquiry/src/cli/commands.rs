//! CLI command definitions.
//!
//! This module defines the top-level subcommands and the commands accepted
//! line by line inside the interactive shell.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// One line typed into the shell.
#[derive(Debug, Parser)]
#[command(name = "enquiry>", no_binary_name = true)]
#[command(disable_version_flag = true)]
pub struct ShellLine {
    /// The command on this line
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Commands available inside the shell.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ShellCommand {
    /// Set a form field (username, email, phoneNumber, gender, age, birthDay)
    Set {
        /// Field name
        field: String,
        /// New value; omit to clear the field
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },

    /// Submit the form (or save the row being edited)
    Submit,

    /// Load a row into the form for editing
    Edit {
        /// Row number as shown by `list`
        index: usize,
    },

    /// Delete a row
    Delete {
        /// Row number as shown by `list`
        index: usize,
    },

    /// Show the submitted rows
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the form as currently filled in
    Draft,

    /// Type the SMS message text
    Message {
        /// Message text
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Set the SMS recipient email address
    To {
        /// Recipient address; checked when sending
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        address: Vec<String>,
    },

    /// Send the SMS message
    Send,

    /// Show messages sent so far
    History,

    /// Save the table as a PDF
    Pdf,

    /// Open the printable view of the table
    Print,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}
