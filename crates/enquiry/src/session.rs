//! One enquiry session.
//!
//! A [`Session`] owns the form, the message box, and the collaborators that
//! reach outside the process (relay, print surface, PDF destination). It is
//! the single entry point a front-end drives. Nothing in it is shared with
//! other sessions or persisted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::entry::{Entry, Field};
use crate::error::Result;
use crate::export::{self, FilePrintSurface, PdfDocument, PrintSurface};
use crate::form::{FormController, FormMode, SubmitOutcome};
use crate::messaging::{relay_from_config, Messenger, Relay, SentMessage};
use crate::notify::{Notification, Notifier};
use crate::store::RecordStore;

/// State and collaborators for a single user session.
pub struct Session {
    form: FormController,
    messenger: Messenger,
    relay: Box<dyn Relay>,
    surface: Box<dyn PrintSurface>,
    pdf_path: PathBuf,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("form", &self.form)
            .field("messenger", &self.messenger)
            .field("relay", &self.relay.name())
            .field("pdf_path", &self.pdf_path)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Assemble a session from explicit collaborators.
    #[must_use]
    pub fn new(
        notifier: Arc<dyn Notifier>,
        relay: Box<dyn Relay>,
        surface: Box<dyn PrintSurface>,
        pdf_path: impl Into<PathBuf>,
        relay_timeout: Option<std::time::Duration>,
    ) -> Self {
        Self {
            form: FormController::new(Arc::clone(&notifier)),
            messenger: Messenger::new(Arc::clone(&notifier), relay_timeout),
            relay,
            surface,
            pdf_path: pdf_path.into(),
            notifier,
        }
    }

    /// Assemble a session from configuration.
    #[must_use]
    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            notifier,
            relay_from_config(&config.relay),
            Box::new(FilePrintSurface::new(
                config.print_path(),
                config.print_command(),
            )),
            config.pdf_path(),
            config.relay_timeout(),
        )
    }

    // === Form ===

    /// The in-progress entry.
    #[must_use]
    pub fn draft(&self) -> &Entry {
        self.form.draft()
    }

    /// Create or edit mode.
    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.form.mode()
    }

    /// Committed entries.
    #[must_use]
    pub fn records(&self) -> &RecordStore {
        self.form.store()
    }

    /// Set one draft field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    /// Set a draft field by form name.
    ///
    /// # Errors
    ///
    /// See [`FormController::set_field_by_name`].
    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.form.set_field_by_name(name, value)
    }

    /// Commit the draft.
    ///
    /// # Errors
    ///
    /// See [`FormController::submit`].
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        self.form.submit()
    }

    /// Start editing a row.
    ///
    /// # Errors
    ///
    /// See [`FormController::request_edit`].
    pub fn request_edit(&mut self, index: usize) -> Result<()> {
        self.form.request_edit(index)
    }

    /// Delete a row.
    ///
    /// # Errors
    ///
    /// See [`FormController::request_delete`].
    pub fn request_delete(&mut self, index: usize) -> Result<Entry> {
        self.form.request_delete(index)
    }

    // === Messaging ===

    /// Current message text.
    #[must_use]
    pub fn message_body(&self) -> &str {
        self.messenger.message_body()
    }

    /// Current recipient.
    #[must_use]
    pub fn recipient_address(&self) -> &str {
        self.messenger.recipient_address()
    }

    /// Messages delivered so far.
    #[must_use]
    pub fn sent_history(&self) -> &[SentMessage] {
        self.messenger.history()
    }

    /// Replace the message text.
    pub fn set_message_body(&mut self, text: impl Into<String>) {
        self.messenger.set_message_body(text);
    }

    /// Replace the recipient address.
    pub fn set_recipient_address(&mut self, text: impl Into<String>) {
        self.messenger.set_recipient_address(text);
    }

    /// Send the message box contents, signed with the current draft's name
    /// and email.
    ///
    /// # Errors
    ///
    /// See [`Messenger::send`].
    pub async fn send_message(&mut self) -> Result<()> {
        let sender = self.form.draft().clone();
        self.messenger.send(&sender, self.relay.as_ref()).await
    }

    // === Export ===

    /// Lay out the committed entries as a PDF document.
    #[must_use]
    pub fn generate_document(&self) -> PdfDocument {
        export::generate_document(self.records().entries())
    }

    /// Where [`Session::save_document`] writes.
    #[must_use]
    pub fn pdf_path(&self) -> &Path {
        &self.pdf_path
    }

    /// Render and save the PDF export.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written. The failure is also
    /// reported to the user.
    pub fn save_document(&self) -> Result<PathBuf> {
        export::save_document(self.records().entries(), &self.pdf_path).map_err(|err| {
            warn!(error = %err, "PDF export failed");
            self.notifier
                .notify(Notification::error("Failed to generate PDF"));
            err
        })
    }

    /// Render the printable view and hand it to the print surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be opened. The failure is also
    /// reported to the user.
    pub fn print(&self) -> Result<()> {
        debug!(rows = self.records().len(), "Printing table");
        export::print(self.records().entries(), self.surface.as_ref()).map_err(|err| {
            warn!(error = %err, "Print failed");
            self.notifier
                .notify(Notification::error("Failed to open print view"));
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::{Error, ValidationError};
    use crate::messaging::LogRelay;
    use crate::notify::{drain, ChannelNotifier, Severity};
    use tokio::sync::mpsc::UnboundedReceiver;

    #[derive(Default)]
    struct CapturingSurface {
        pages: Arc<Mutex<Vec<String>>>,
    }

    impl PrintSurface for CapturingSurface {
        fn open_and_print(&self, html: &str) -> Result<()> {
            self.pages.lock().unwrap().push(html.to_string());
            Ok(())
        }
    }

    struct BrokenSurface;

    impl PrintSurface for BrokenSurface {
        fn open_and_print(&self, _html: &str) -> Result<()> {
            Err(std::io::Error::other("no display").into())
        }
    }

    fn session_with(
        surface: Box<dyn PrintSurface>,
        pdf_path: PathBuf,
    ) -> (Session, UnboundedReceiver<Notification>) {
        let (notifier, rx) = ChannelNotifier::new();
        let session = Session::new(Arc::new(notifier), Box::new(LogRelay), surface, pdf_path, None);
        (session, rx)
    }

    fn session() -> (Session, UnboundedReceiver<Notification>) {
        session_with(
            Box::new(CapturingSurface::default()),
            PathBuf::from("unused.pdf"),
        )
    }

    fn fill_ann(session: &mut Session) {
        session.set_field(Field::Username, "Ann");
        session.set_field(Field::Email, "a@x.com");
        session.set_field(Field::PhoneNumber, "555");
        session.set_field(Field::Gender, "F");
    }

    #[test]
    fn test_submit_edit_scenario() {
        let (mut s, mut rx) = session();
        fill_ann(&mut s);
        assert_eq!(s.submit().unwrap(), SubmitOutcome::Created(0));

        s.request_edit(0).unwrap();
        assert_eq!(s.mode(), FormMode::Editing(0));
        s.set_field_by_name("phoneNumber", "999").unwrap();
        assert_eq!(s.submit().unwrap(), SubmitOutcome::Updated(0));

        assert_eq!(s.records().len(), 1);
        assert_eq!(s.records().get(0).unwrap().phone_number, "999");
        assert_eq!(s.records().get(0).unwrap().username, "Ann");
        assert_eq!(s.mode(), FormMode::Creating);

        let severities: Vec<_> = drain(&mut rx).into_iter().map(|n| n.severity).collect();
        assert_eq!(severities, vec![Severity::Success, Severity::Success]);
    }

    #[tokio::test]
    async fn test_send_message_signs_with_draft() {
        let (mut s, mut rx) = session();
        fill_ann(&mut s);
        s.set_message_body("hello");
        s.set_recipient_address("a@b.co");

        s.send_message().await.unwrap();
        assert_eq!(s.sent_history().len(), 1);
        assert!(s.message_body().is_empty());
        assert!(s.recipient_address().is_empty());
        // Sending does not touch the form
        assert_eq!(s.draft().username, "Ann");
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_with_bad_address() {
        let (mut s, mut rx) = session();
        s.set_message_body("hello");
        s.set_recipient_address("not-an-email");

        let err = s.send_message().await.unwrap_err();
        assert_eq!(err.as_validation(), Some(ValidationError::InvalidAddress));
        assert!(s.sent_history().is_empty());

        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Error);
    }

    #[test]
    fn test_generate_document_on_empty_store() {
        let (s, mut rx) = session();
        let doc = s.generate_document();
        assert_eq!(doc.row_count(), 0);
        assert_eq!(doc.page_count(), 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_save_document() {
        let dir = tempfile::tempdir().unwrap();
        let (mut s, _rx) = session_with(
            Box::new(CapturingSurface::default()),
            dir.path().join(export::PDF_FILE_NAME),
        );
        fill_ann(&mut s);
        s.submit().unwrap();

        let path = s.save_document().unwrap();
        assert_eq!(path, s.pdf_path());
        assert!(std::fs::read(path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_save_document_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let (s, mut rx) = session_with(
            Box::new(CapturingSurface::default()),
            blocker.join("out").join(export::PDF_FILE_NAME),
        );

        let err = s.save_document().unwrap_err();
        assert!(matches!(err, Error::DirectoryCreate { .. }));
        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Error);
    }

    #[test]
    fn test_print_reads_store_only() {
        let surface = CapturingSurface::default();
        let pages = Arc::clone(&surface.pages);
        let (mut s, _rx) = session_with(Box::new(surface), PathBuf::from("unused.pdf"));
        fill_ann(&mut s);
        s.submit().unwrap();
        let before = s.records().clone();

        s.print().unwrap();
        assert_eq!(s.records(), &before);
        let pages = pages.lock().unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("<td>Ann</td>"));
    }

    #[test]
    fn test_print_failure_is_reported() {
        let (s, mut rx) = session_with(Box::new(BrokenSurface), PathBuf::from("unused.pdf"));
        assert!(s.print().is_err());
        assert_eq!(drain(&mut rx)[0].severity, Severity::Error);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_print_command_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let surface = FilePrintSurface::new(
            dir.path().join(export::PRINT_FILE_NAME),
            Some(export::PrintCommand::new("false", Vec::new())),
        );
        let (s, mut rx) = session_with(Box::new(surface), PathBuf::from("unused.pdf"));

        let err = s.print().unwrap_err();
        assert!(matches!(err, Error::PrintCommand { .. }));
        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "Failed to open print view");
    }

    #[test]
    fn test_from_config_uses_configured_paths() {
        let mut config = Config::default();
        config.export.output_dir = Some(PathBuf::from("/tmp/enquiry-out"));
        let (notifier, _rx) = ChannelNotifier::new();

        let s = Session::from_config(&config, Arc::new(notifier));
        assert_eq!(s.pdf_path(), Path::new("/tmp/enquiry-out/user_data.pdf"));
        assert!(format!("{s:?}").contains("\"log\""));
    }
}
