//! Printable HTML view of the table.
//!
//! The page asks the browser to print as soon as it loads, so opening it
//! with the host's default viewer brings up the print dialog.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::entry::{Entry, COLUMN_HEADERS};
use crate::error::{Error, Result};

/// Somewhere an HTML page can be opened and printed.
pub trait PrintSurface: Send + Sync {
    /// Open `html` and trigger the host's print action on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be opened.
    fn open_and_print(&self, html: &str) -> Result<()>;
}

/// The host's default viewer for a file.
#[must_use]
pub fn default_print_command() -> Vec<String> {
    let argv: &[&str] = if cfg!(target_os = "macos") {
        &["open"]
    } else if cfg!(windows) {
        &["cmd", "/C", "start", ""]
    } else {
        &["xdg-open"]
    };
    argv.iter().map(ToString::to_string).collect()
}

/// An external program that opens or prints a file.
///
/// The file path is passed as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintCommand {
    program: String,
    args: Vec<String>,
}

impl PrintCommand {
    /// Run `program` with `args` followed by the file path.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split an argv list into program and arguments. `None` when empty.
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    /// The program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the command on `path` and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PrintCommand`] if the program cannot be started or
    /// exits unsuccessfully.
    pub fn run(&self, path: &Path) -> Result<()> {
        debug!(program = %self.program, path = %path.display(), "Starting print command");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|err| self.failure(err.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(self.failure(status.to_string()))
        }
    }

    fn failure(&self, message: String) -> Error {
        Error::PrintCommand {
            program: self.program.clone(),
            message,
        }
    }
}

/// Print surface that writes the page to a file and hands it to a
/// [`PrintCommand`].
#[derive(Debug, Clone)]
pub struct FilePrintSurface {
    path: PathBuf,
    command: Option<PrintCommand>,
}

impl FilePrintSurface {
    /// Surface writing to `path`, then running `command` on it if set.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, command: Option<PrintCommand>) -> Self {
        Self {
            path: path.into(),
            command,
        }
    }

    /// Where the page is written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrintSurface for FilePrintSurface {
    fn open_and_print(&self, html: &str) -> Result<()> {
        super::ensure_parent_dir(&self.path)?;
        std::fs::write(&self.path, html)?;

        match &self.command {
            Some(command) => {
                command.run(&self.path)?;
                info!(path = %self.path.display(), program = command.program(), "Print view opened");
            }
            None => info!(path = %self.path.display(), "Print view written"),
        }
        Ok(())
    }
}

/// Render every entry as a minimal printable HTML page.
#[must_use]
pub fn render_print_view(entries: &[Entry]) -> String {
    let mut html = String::from(
        "<html><head><title>Table Data</title></head><body onload=\"window.print()\">\
         <h1>Submitted Data</h1>\
         <table border=\"1\"><thead><tr>",
    );
    for header in COLUMN_HEADERS {
        let _ = write!(html, "<th>{header}</th>");
    }
    html.push_str("</tr></thead><tbody>");

    for entry in entries {
        html.push_str("<tr>");
        for cell in entry.cells() {
            let _ = write!(html, "<td>{}</td>", escape_html(cell));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table></body></html>");
    html
}

/// Render the entries and hand them to `surface`.
///
/// # Errors
///
/// Returns an error if the surface fails to open.
pub fn print(entries: &[Entry], surface: &dyn PrintSurface) -> Result<()> {
    surface.open_and_print(&render_print_view(entries))
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
