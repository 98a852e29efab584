//! File-import collaborator and the pending-import queue.
//!
//! Adding an embedded image needs a native file picker, which resolves
//! asynchronously. The core never awaits it: the request is parked as a
//! ticket, the host runs the picker, and the outcome is handed back with the
//! ticket. Other interaction carries on in between.

#[cfg(test)]
#[path = "import_test.rs"]
mod import_test;

use std::collections::HashMap;
use std::future::Future;

use crate::element::ElementId;
use crate::error::ErrorCode;
use crate::input::PointerEvent;

/// Error returned by a [`FileImporter`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// The user closed the picker without choosing a file.
    #[error("image import cancelled")]
    Cancelled,
    /// The chosen file had no content.
    #[error("imported image is empty")]
    Empty,
    /// The file could not be read.
    #[error("failed to read image: {0}")]
    Read(String),
}

impl ErrorCode for ImportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => "E_IMPORT_CANCELLED",
            Self::Empty => "E_IMPORT_EMPTY",
            Self::Read(_) => "E_IMPORT_READ",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

/// Raw bytes of a user-picked image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedImage {
    pub name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Opens a file picker and reads the chosen image.
pub trait FileImporter {
    fn pick_image(&self) -> impl Future<Output = Result<ImportedImage, ImportError>>;
}

/// Run `importer` for a pending ticket and pair the outcome with it, ready
/// for `EngineCore::complete_image_import`.
pub async fn fulfil<I: FileImporter>(
    importer: &I,
    ticket: ImportTicket,
) -> (ImportTicket, Result<ImportedImage, ImportError>) {
    let outcome = importer.pick_image().await.and_then(|image| {
        if image.bytes.is_empty() {
            return Err(ImportError::Empty);
        }
        Ok(image)
    });
    (ticket, outcome)
}

/// Identifies one pending "add embedded image" flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImportTicket(u64);

/// A parked import: which page asked, and the right-click it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingImport {
    pub page: ElementId,
    pub event: PointerEvent,
}

/// Pending imports keyed by ticket.
#[derive(Debug, Default)]
pub struct ImportQueue {
    pending: HashMap<ImportTicket, PendingImport>,
    next: u64,
}

impl ImportQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, page: ElementId, event: PointerEvent) -> ImportTicket {
        self.next += 1;
        let ticket = ImportTicket(self.next);
        self.pending.insert(ticket, PendingImport { page, event });
        ticket
    }

    /// Remove and return a pending import. Each ticket resolves once.
    pub fn take(&mut self, ticket: ImportTicket) -> Option<PendingImport> {
        self.pending.remove(&ticket)
    }

    /// Drop every pending import for a page that no longer exists.
    pub fn forget_page(&mut self, page: ElementId) {
        self.pending.retain(|_, p| p.page != page);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
