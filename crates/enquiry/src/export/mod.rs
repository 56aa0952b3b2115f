//! Table exports.
//!
//! Both exports are pure reads of the committed entries:
//!
//! - **PDF**: a paginated six-column table saved under a fixed file name.
//! - **Print view**: a minimal HTML page handed to a [`PrintSurface`].

mod pdf;
mod print;

use std::path::{Path, PathBuf};

use tracing::info;

pub use pdf::{generate_document, PdfDocument};
pub use print::{
    default_print_command, print, render_print_view, FilePrintSurface, PrintCommand, PrintSurface,
};

use crate::entry::Entry;
use crate::error::{Error, Result};

/// Default file name of the PDF export.
pub const PDF_FILE_NAME: &str = "user_data.pdf";

/// Default file name of the printable view.
pub const PRINT_FILE_NAME: &str = "print_view.html";

/// Render `entries` to PDF and write it to `path`.
///
/// Parent directories are created as needed. Returns the path written.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_document(entries: &[Entry], path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref().to_path_buf();
    ensure_parent_dir(&path)?;

    let doc = generate_document(entries);
    let file = std::fs::File::create(&path)?;
    doc.write_to(std::io::BufWriter::new(file))?;

    info!(
        path = %path.display(),
        rows = doc.row_count(),
        pages = doc.page_count(),
        "PDF saved"
    );
    Ok(path)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
