//! Interactive shell driving one [`Session`].
//!
//! Each input line is parsed as a [`ShellCommand`] and applied to the
//! session. Notifications raised by the command are printed right after it,
//! which is this front-end's version of a toast.

use std::io::{BufRead, Write};

use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use super::commands::{ShellCommand, ShellLine};
use crate::entry::{Field, COLUMN_HEADERS};
use crate::error::{Error, Result};
use crate::form::FormMode;
use crate::notify::{drain, Notification};
use crate::session::Session;

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// A session plus the receiving end of its notifications.
#[derive(Debug)]
pub struct Shell {
    session: Session,
    notifications: UnboundedReceiver<Notification>,
}

impl Shell {
    /// Wrap a session whose notifier feeds `notifications`.
    #[must_use]
    pub fn new(session: Session, notifications: UnboundedReceiver<Notification>) -> Self {
        Self {
            session,
            notifications,
        }
    }

    /// The wrapped session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply `command`. Free-text values are taken from `line` verbatim so
    /// repeated or whitespace-only input survives.
    async fn execute<W: Write>(
        &mut self,
        command: ShellCommand,
        line: &str,
        out: &mut W,
    ) -> Result<Flow> {
        let s = &mut self.session;
        match command {
            ShellCommand::Set { field, .. } => {
                s.set_field_by_name(&field, raw_tail(line, 2))?;
            }
            ShellCommand::Submit => {
                s.submit()?;
            }
            ShellCommand::Edit { index } => {
                s.request_edit(index)?;
                writeln!(out, "Editing row {index}; `submit` to save.")?;
            }
            ShellCommand::Delete { index } => {
                s.request_delete(index)?;
            }
            ShellCommand::List { json } => {
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(s.records().entries())?)?;
                } else {
                    write_table(s, out)?;
                }
            }
            ShellCommand::Draft => write_draft(s, out)?,
            ShellCommand::Message { .. } => s.set_message_body(raw_tail(line, 1)),
            ShellCommand::To { .. } => s.set_recipient_address(raw_tail(line, 1)),
            ShellCommand::Send => {
                s.send_message().await?;
            }
            ShellCommand::History => {
                for sent in s.sent_history() {
                    writeln!(
                        out,
                        "{}  to {}: {}",
                        sent.sent_at.format("%Y-%m-%d %H:%M:%S"),
                        sent.recipient,
                        sent.body
                    )?;
                }
            }
            ShellCommand::Pdf => {
                let path = s.save_document()?;
                writeln!(out, "Saved {}", path.display())?;
            }
            ShellCommand::Print => s.print()?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Parse and apply one input line, then flush pending notifications.
    ///
    /// Returns `false` once the user asks to quit.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` fails. Command failures are
    /// reported on `out` and the shell carries on.
    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<bool> {
        if line.trim().is_empty() {
            return Ok(true);
        }

        let flow = match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => match self.execute(parsed.command, line, out).await {
                Ok(flow) => flow,
                Err(err) => {
                    report(&err, out)?;
                    Flow::Continue
                }
            },
            Err(err) => {
                write!(out, "{}", err.render())?;
                Flow::Continue
            }
        };

        for notification in drain(&mut self.notifications) {
            writeln!(out, "{notification}")?;
        }
        out.flush()?;
        Ok(flow == Flow::Continue)
    }
}

/// Read commands from `input` until it ends or the user quits.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run_shell<R: BufRead, W: Write>(
    shell: &mut Shell,
    input: R,
    mut out: W,
) -> Result<()> {
    writeln!(out, "Enquiry form. Type `help` for commands.")?;
    prompt(shell, &mut out)?;
    for line in input.lines() {
        let line = line?;
        if !shell.handle_line(&line, &mut out).await? {
            debug!("Shell closed by user");
            return Ok(());
        }
        prompt(shell, &mut out)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Text following the first `words` words of `line`, without the single
/// separator after them. Inner and trailing whitespace are kept.
fn raw_tail(line: &str, words: usize) -> &str {
    let mut rest = line;
    for _ in 0..words {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = &rest[end..];
    }
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => rest,
    }
}

fn prompt<W: Write>(shell: &Shell, out: &mut W) -> Result<()> {
    let label = match shell.session.mode() {
        FormMode::Creating => "new".to_string(),
        FormMode::Editing(index) => format!("edit {index}"),
    };
    write!(out, "enquiry[{label}]> ")?;
    out.flush()?;
    Ok(())
}

/// Validation failures already reached the user as notifications; only
/// other failures need their own line.
fn report<W: Write>(err: &Error, out: &mut W) -> Result<()> {
    if err.is_validation() || err.is_relay_error() {
        debug!(error = %err, "Command refused");
        return Ok(());
    }
    writeln!(out, "error: {err}")?;
    Ok(())
}

fn write_table<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let records = session.records();
    if records.is_empty() {
        writeln!(out, "(no rows)")?;
        return Ok(());
    }

    let mut widths = COLUMN_HEADERS.map(str::len);
    for entry in records {
        for (w, cell) in widths.iter_mut().zip(entry.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write!(out, "{:>3} ", "#")?;
    for (header, w) in COLUMN_HEADERS.iter().zip(widths) {
        write!(out, " {header:<w$}")?;
    }
    writeln!(out)?;

    for (index, entry) in records.iter().enumerate() {
        write!(out, "{index:>3} ")?;
        for (cell, w) in entry.cells().iter().zip(widths) {
            write!(out, " {cell:<w$}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_draft<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let draft = session.draft();
    for (field, header) in Field::ALL.iter().zip(COLUMN_HEADERS) {
        let marker = if field.is_required() { "*" } else { " " };
        writeln!(out, "{marker}{header:<13} {}", draft.get(*field))?;
    }
    writeln!(out, "[{}]", session.mode().submit_label())?;
    if !session.message_body().is_empty() || !session.recipient_address().is_empty() {
        writeln!(
            out,
            "SMS to {:?}: {:?}",
            session.recipient_address(),
            session.message_body()
        )?;
    }
    Ok(())
}
