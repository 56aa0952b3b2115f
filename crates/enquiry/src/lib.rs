//! `enquiry` - A small enquiry form with a table, exports and messaging
//!
//! This library provides the core of an enquiry session: a draft form that
//! creates or edits rows of a table, a message box that sends a short note
//! through a pluggable relay, and PDF and print exports of the table. Every
//! outcome the user should see is delivered as a [`Notification`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod export;
pub mod form;
pub mod logging;
pub mod messaging;
pub mod notify;
pub mod session;
pub mod store;

pub use config::Config;
pub use entry::{Entry, Field};
pub use error::{Error, Result, ValidationError};
pub use form::{FormController, FormMode, SubmitOutcome};
pub use logging::init_logging;
pub use notify::{Notification, Notifier, Severity};
pub use session::Session;
pub use store::RecordStore;
