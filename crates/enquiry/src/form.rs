//! Form controller.
//!
//! Owns the draft bound to the form inputs, the committed [`RecordStore`]
//! and the create/edit mode. Every state-changing action reports its outcome
//! through the shared notifier.
//!
//! Mode transitions:
//!
//! ```text
//! Creating   --request_edit(i)----> Editing(i)
//! Editing(i) --request_edit(j)----> Editing(j)
//! Editing(i) --submit ok----------> Creating
//! Editing(i) --request_delete(i)--> Creating   (draft discarded)
//! Creating   --submit ok----------> Creating
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::entry::{Entry, Field};
use crate::error::{Error, Result, ValidationError};
use crate::notify::{Notification, Notifier};
use crate::store::RecordStore;

const MSG_INCOMPLETE: &str = "Please fill out all fields before submitting.";
const TITLE_INCOMPLETE: &str = "Form Incomplete";
const MSG_CREATED: &str = "Your Form Submitted Successfully";
const MSG_UPDATED: &str = "Row Data Updated Successfully";
const MSG_DELETED: &str = "Row Data Deleted Successfully";

/// Whether the next submit appends or overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// Submit appends a new entry.
    #[default]
    Creating,
    /// Submit replaces the entry at this index.
    Editing(usize),
}

impl FormMode {
    /// The row a submit will overwrite, if any.
    #[must_use]
    pub fn edit_target(self) -> Option<usize> {
        match self {
            Self::Creating => None,
            Self::Editing(index) => Some(index),
        }
    }

    /// Label for the submit button in this mode.
    #[must_use]
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Creating => "Submit",
            Self::Editing(_) => "Update",
        }
    }
}

/// What a successful submit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new entry was appended at this index.
    Created(usize),
    /// The entry at this index was replaced.
    Updated(usize),
}

/// Drives the enquiry form.
pub struct FormController {
    draft: Entry,
    mode: FormMode,
    store: RecordStore,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("draft", &self.draft)
            .field("mode", &self.mode)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl FormController {
    /// Create a controller with an empty draft and store.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            draft: Entry::default(),
            mode: FormMode::Creating,
            store: RecordStore::new(),
            notifier,
        }
    }

    /// The in-progress entry.
    #[must_use]
    pub fn draft(&self) -> &Entry {
        &self.draft
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Committed entries.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Set one draft field. No validation happens here.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Set a draft field by its form name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if `name` is not a form field.
    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field: Field = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    /// Commit the draft.
    ///
    /// Appends in [`FormMode::Creating`], replaces in [`FormMode::Editing`].
    /// On success the draft is reset and the mode returns to `Creating`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteForm`] if a required field is
    /// empty. Draft, store and mode are left untouched.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            debug!(?missing, "Submit refused");
            self.notifier
                .notify(Notification::warning(MSG_INCOMPLETE).with_title(TITLE_INCOMPLETE));
            return Err(ValidationError::IncompleteForm.into());
        }

        let outcome = match self.mode {
            FormMode::Editing(index) => {
                self.store.replace(index, self.draft.clone())?;
                self.mode = FormMode::Creating;
                info!(index, "Entry updated");
                self.notifier.notify(Notification::success(MSG_UPDATED));
                SubmitOutcome::Updated(index)
            }
            FormMode::Creating => {
                let index = self.store.append(self.draft.clone())?;
                info!(index, "Entry submitted");
                self.notifier.notify(Notification::success(MSG_CREATED));
                SubmitOutcome::Created(index)
            }
        };

        self.draft = Entry::default();
        Ok(outcome)
    }

    /// Load the entry at `index` into the draft and switch to editing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchEntry`] for an out-of-range index; nothing
    /// changes in that case.
    pub fn request_edit(&mut self, index: usize) -> Result<()> {
        let entry = self.store.get(index).ok_or_else(|| {
            let err = Error::NoSuchEntry {
                index,
                len: self.store.len(),
            };
            warn!(%err, "Edit request ignored");
            err
        })?;
        self.draft = entry.clone();
        self.mode = FormMode::Editing(index);
        debug!(index, "Editing entry");
        Ok(())
    }

    /// Remove the entry at `index`.
    ///
    /// Deleting the row being edited abandons the edit: the draft is reset
    /// and the mode returns to `Creating`. Deleting a row above it keeps the
    /// edit pointed at the same entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchEntry`] for an out-of-range index; nothing
    /// changes in that case.
    pub fn request_delete(&mut self, index: usize) -> Result<Entry> {
        let removed = self.store.remove(index).map_err(|err| {
            warn!(%err, "Delete request ignored");
            err
        })?;

        if let FormMode::Editing(target) = self.mode {
            if target == index {
                debug!(index, "Edited entry deleted, discarding draft");
                self.mode = FormMode::Creating;
                self.draft = Entry::default();
            } else if target > index {
                self.mode = FormMode::Editing(target - 1);
            }
        }

        info!(index, "Entry deleted");
        self.notifier.notify(Notification::info(MSG_DELETED));
        Ok(removed)
    }
}
