//! Render request and response types

use std::sync::Arc;

use super::types::PageSurface;

/// Unique identifier for render requests.
///
/// Ids are issued in strictly increasing order; a completed render is applied
/// only while its id is still the latest one issued, so a slow render can
/// never paint over a newer page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Parameters for rendering a page
#[derive(Clone, Copy, Debug)]
pub struct RenderParams {
    /// Zoom factor
    pub scale: f32,
    /// Tint endpoint for black page content (RGB)
    pub black: i32,
    /// Tint endpoint for the white page background (RGB)
    pub white: i32,
}

/// Request sent to the render worker
#[derive(Debug)]
pub enum RenderRequest {
    /// Rasterize a page (1-based)
    Page {
        id: RequestId,
        page: u32,
        params: RenderParams,
    },

    /// Reopen the document and re-report its metadata
    Reload,

    /// Shutdown the worker
    Shutdown,
}

/// Errors from the render worker.
///
/// Document-open failures and page-render failures are distinct so the UI can
/// show a full-screen failure state for the former and keep the last good
/// page for the latter.
#[derive(Debug, thiserror::Error)]
pub enum RenderFault {
    #[error("failed to open document: {0}")]
    Open(#[source] mupdf::error::Error),

    #[error("failed to render page {page}: {source}")]
    Render {
        page: u32,
        #[source]
        source: mupdf::error::Error,
    },

    #[error("{detail}")]
    Surface { detail: String },
}

impl RenderFault {
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface { detail: msg.into() }
    }
}

/// Response from the render worker
#[derive(Debug)]
pub enum RenderResponse {
    /// Document metadata, sent once per (re)open
    DocumentInfo {
        page_count: u32,
        title: Option<String>,
    },

    /// The document could not be opened
    LoadFailed { fault: RenderFault },

    /// Rendered page pixels
    Page {
        id: RequestId,
        page: u32,
        surface: Arc<PageSurface>,
    },

    /// A page failed to rasterize
    PageFailed {
        id: RequestId,
        page: u32,
        fault: RenderFault,
    },
}
