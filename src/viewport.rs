//! Viewport controller - bridges the session store and the render backend
//!
//! Session effects become render requests; render responses become session
//! writes (the page count) and the displayed surface. Every request carries a
//! fresh id and only the latest issued id may paint, so overlapping renders
//! resolve by issue order, never by completion order.

use std::path::PathBuf;
use std::sync::Arc;

use log::debug;

use crate::notification::NoticeBoard;
use crate::render::{PageSurface, RenderParams, RenderResponse, RenderService, RequestId};
use crate::session::{Command, Effect, ReaderSession};
use crate::theme;

/// Where the document open stands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

pub struct Viewport {
    service: RenderService,
    scale: f32,
    latest_request: Option<RequestId>,
    surface: Option<Arc<PageSurface>>,
    load_state: LoadState,
    title: Option<String>,
}

impl Viewport {
    /// Start opening the document on the worker thread.
    #[must_use]
    pub fn open(doc_path: PathBuf, scale: f32) -> Self {
        Self::with_service(RenderService::spawn(doc_path), scale)
    }

    /// Build around an existing service. Tests inject a detached one.
    #[must_use]
    pub fn with_service(service: RenderService, scale: f32) -> Self {
        Self {
            service,
            scale,
            latest_request: None,
            surface: None,
            load_state: LoadState::Loading,
            title: None,
        }
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&PageSurface> {
        self.surface.as_deref()
    }

    /// React to session effects by requesting renders.
    pub fn handle_effects(&mut self, effects: &[Effect], session: &ReaderSession) {
        for effect in effects {
            match effect {
                Effect::RenderCurrentPage | Effect::ThemeChanged => {
                    self.request_render(session);
                }
            }
        }
    }

    /// Re-render the current page, e.g. after a transient failure.
    pub fn refresh(&mut self, session: &ReaderSession) {
        self.request_render(session);
    }

    /// Reopen the document after a load failure.
    pub fn reload(&mut self) {
        self.load_state = LoadState::Loading;
        self.surface = None;
        self.latest_request = None;
        self.service.reload();
    }

    /// Drain worker responses; returns true if the display changed.
    pub fn poll(&mut self, session: &mut ReaderSession, notices: &mut NoticeBoard) -> bool {
        let mut dirty = false;

        for response in self.service.poll_responses() {
            match response {
                RenderResponse::DocumentInfo { page_count, title } => {
                    self.title = title;
                    self.load_state = LoadState::Ready;
                    let effects = session.apply(Command::SetTotalPages(page_count));
                    self.handle_effects(&effects, session);
                    dirty = true;
                }

                RenderResponse::LoadFailed { fault } => {
                    self.load_state = LoadState::Failed(fault.to_string());
                    notices.error(fault.to_string());
                    dirty = true;
                }

                RenderResponse::Page { id, page, surface } => {
                    if self.latest_request == Some(id) {
                        self.surface = Some(surface);
                        dirty = true;
                    } else {
                        debug!("dropping stale render of page {page} ({id:?})");
                    }
                }

                RenderResponse::PageFailed { id, page, fault } => {
                    // Keep whatever page is on screen; the failure is
                    // recoverable via refresh.
                    if self.latest_request == Some(id) {
                        self.latest_request = None;
                    }
                    notices.error(format!("page {page}: {fault}"));
                    dirty = true;
                }
            }
        }

        dirty
    }

    fn request_render(&mut self, session: &ReaderSession) {
        if self.load_state != LoadState::Ready {
            return;
        }

        let colors = theme::palette(session.is_dark());
        let params = RenderParams {
            scale: self.scale,
            black: colors.page_black,
            white: colors.page_white,
        };
        let id = self.service.request_page(session.current_page(), params);
        self.latest_request = Some(id);
    }
}
