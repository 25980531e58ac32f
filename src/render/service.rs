//! Render service - owns the worker thread and the request id sequence

use std::path::PathBuf;

use flume::{Receiver, Sender};

use super::request::{RenderParams, RenderRequest, RenderResponse, RequestId};
use super::worker::render_worker;

/// Handle to the render worker.
///
/// One worker thread per service; the MuPDF document lives on that thread and
/// is never shared. Requests carry ids from a monotonically increasing
/// sequence so callers can recognize stale completions.
pub struct RenderService {
    request_tx: Sender<RenderRequest>,
    response_rx: Receiver<RenderResponse>,
    next_request_id: u64,
}

impl RenderService {
    /// Spawn the worker for a document. Opening starts immediately; the
    /// outcome arrives as a [`RenderResponse`] on the response channel.
    #[must_use]
    pub fn spawn(doc_path: PathBuf) -> Self {
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        std::thread::spawn(move || {
            render_worker(&doc_path, &request_rx, &response_tx);
        });

        Self {
            request_tx,
            response_rx,
            next_request_id: 1,
        }
    }

    /// Build a service with no worker behind it, exposing both channel ends.
    /// Lets tests play the worker's role.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn detached() -> (Self, Receiver<RenderRequest>, Sender<RenderResponse>) {
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        (
            Self {
                request_tx,
                response_rx,
                next_request_id: 1,
            },
            request_rx,
            response_tx,
        )
    }

    /// Request a page render; returns the id the completion will carry.
    pub fn request_page(&mut self, page: u32, params: RenderParams) -> RequestId {
        let id = self.next_id();
        let _ = self
            .request_tx
            .send(RenderRequest::Page { id, page, params });
        id
    }

    /// Ask the worker to reopen the document.
    pub fn reload(&self) {
        let _ = self.request_tx.send(RenderRequest::Reload);
    }

    /// Drain all responses that have arrived so far.
    pub fn poll_responses(&self) -> Vec<RenderResponse> {
        let mut responses = vec![];
        while let Ok(response) = self.response_rx.try_recv() {
            responses.push(response);
        }
        responses
    }

    fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        id
    }
}

impl Drop for RenderService {
    fn drop(&mut self) {
        let _ = self.request_tx.send(RenderRequest::Shutdown);
    }
}
