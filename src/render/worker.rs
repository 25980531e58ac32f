//! Render worker - runs in a dedicated thread that owns the MuPDF document

use std::path::Path;
use std::sync::Arc;

use flume::{Receiver, Sender};
use log::{debug, info, warn};
use mupdf::{Colorspace, Document, Matrix, Pixmap};

use super::request::{RenderFault, RenderParams, RenderRequest, RenderResponse, RequestId};
use super::types::PageSurface;

/// Main worker function.
///
/// Opens the document, reports its metadata, then serves page requests until
/// shutdown. Opening happens here rather than on the UI thread so a slow or
/// failing parse never blocks input handling.
pub fn render_worker(
    doc_path: &Path,
    requests: &Receiver<RenderRequest>,
    responses: &Sender<RenderResponse>,
) {
    let mut doc = open_document(doc_path, responses);

    for request in requests.iter() {
        match request {
            RenderRequest::Page { id, page, params } => match &doc {
                Some(doc) => handle_page_request(doc, id, page, &params, responses),
                None => {
                    // No document; the UI is already in the failed state.
                    debug!("dropping render request {id:?} for page {page}: no document");
                }
            },

            RenderRequest::Reload => {
                info!("reloading {}", doc_path.display());
                doc = open_document(doc_path, responses);
            }

            RenderRequest::Shutdown => break,
        }
    }
}

/// Open the document and report metadata or a load fault.
fn open_document(doc_path: &Path, responses: &Sender<RenderResponse>) -> Option<Document> {
    let doc = match Document::open(doc_path.to_string_lossy().as_ref()) {
        Ok(doc) => doc,
        Err(e) => {
            let _ = responses.send(RenderResponse::LoadFailed {
                fault: RenderFault::Open(e),
            });
            return None;
        }
    };

    let page_count = match doc.page_count() {
        Ok(n) if n > 0 => n as u32,
        Ok(_) => {
            let _ = responses.send(RenderResponse::LoadFailed {
                fault: RenderFault::surface("document has no pages"),
            });
            return None;
        }
        Err(e) => {
            let _ = responses.send(RenderResponse::LoadFailed {
                fault: RenderFault::Open(e),
            });
            return None;
        }
    };

    let title = doc
        .metadata(mupdf::MetadataName::Title)
        .ok()
        .filter(|t| !t.is_empty());

    info!("opened {} ({page_count} pages)", doc_path.display());
    let _ = responses.send(RenderResponse::DocumentInfo { page_count, title });

    Some(doc)
}

fn handle_page_request(
    doc: &Document,
    id: RequestId,
    page: u32,
    params: &RenderParams,
    responses: &Sender<RenderResponse>,
) {
    match render_page(doc, page, params) {
        Ok(surface) => {
            let _ = responses.send(RenderResponse::Page {
                id,
                page,
                surface: Arc::new(surface),
            });
        }
        Err(fault) => {
            warn!("render of page {page} failed: {fault}");
            let _ = responses.send(RenderResponse::PageFailed { id, page, fault });
        }
    }
}

/// Rasterize a single page (1-based) at the requested scale.
pub fn render_page(
    doc: &Document,
    page: u32,
    params: &RenderParams,
) -> Result<PageSurface, RenderFault> {
    let fault = |source| RenderFault::Render { page, source };

    let page_obj = doc.load_page(page.saturating_sub(1) as i32).map_err(fault)?;

    let transform = Matrix::new_scale(params.scale, params.scale);
    let rgb = Colorspace::device_rgb();
    let mut pixmap = page_obj
        .to_pixmap(&transform, &rgb, false, false)
        .map_err(fault)?;

    pixmap.tint(params.white, params.black).map_err(fault)?;

    let width_px = pixmap.width();
    let height_px = pixmap.height();
    let pixels = pixmap_to_rgb(&pixmap)?;

    PageSurface::new(pixels, width_px, height_px)
        .ok_or_else(|| RenderFault::surface("pixmap buffer size mismatch"))
}

/// Strip stride padding and extra channels down to packed RGB.
fn pixmap_to_rgb(pixmap: &Pixmap) -> Result<Vec<u8>, RenderFault> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(RenderFault::surface(format!(
            "unsupported pixmap format: {n} channels"
        )));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let stride = pixmap.stride() as usize;
    let samples = pixmap.samples();
    let row_bytes = width * n;
    if samples.len() < stride.saturating_mul(height) || row_bytes > stride {
        return Err(RenderFault::surface("pixmap buffer size mismatch"));
    }

    let mut out = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row = &samples[y * stride..y * stride + row_bytes];
        if n == 3 {
            out.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(n) {
                out.extend_from_slice(&px[..3]);
            }
        }
    }

    Ok(out)
}
