//! End-to-end flows through the app with a scripted render backend.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use flume::{Receiver, Sender};

use pageturn::app::App;
use pageturn::render::{
    PageSurface, RenderFault, RenderParams, RenderRequest, RenderResponse, RenderService,
    RequestId,
};
use pageturn::theme;
use pageturn::viewport::{LoadState, Viewport};

struct Harness {
    app: App,
    requests: Receiver<RenderRequest>,
    responses: Sender<RenderResponse>,
}

impl Harness {
    fn new() -> Self {
        let (service, requests, responses) = RenderService::detached();
        let app = App::with_viewport(
            "sample.pdf".to_string(),
            Viewport::with_service(service, 1.5),
            false,
        );
        Self {
            app,
            requests,
            responses,
        }
    }

    /// Report a successfully opened document and deliver it to the app.
    fn load_document(&mut self, page_count: u32) {
        self.responses
            .send(RenderResponse::DocumentInfo {
                page_count,
                title: None,
            })
            .unwrap();
        assert!(self.app.on_tick());
    }

    fn press(&mut self, code: KeyCode) -> bool {
        self.app.handle_key(KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        })
    }

    fn next_page_request(&self) -> (RequestId, u32, RenderParams) {
        match self.requests.try_recv() {
            Ok(RenderRequest::Page { id, page, params }) => (id, page, params),
            Ok(other) => panic!("expected a page request, got {other:?}"),
            Err(_) => panic!("expected a page request, channel empty"),
        }
    }

    fn assert_no_requests(&self) {
        assert!(self.requests.try_recv().is_err());
    }
}

/// Surface whose width encodes the page it was rendered for.
fn tagged_surface(page: u32) -> Arc<PageSurface> {
    Arc::new(PageSurface::new(vec![0; page as usize * 3], page, 1).unwrap())
}

#[test]
fn document_load_triggers_first_render() {
    let mut h = Harness::new();
    assert_eq!(*h.app.viewport().load_state(), LoadState::Loading);

    h.load_document(10);

    assert_eq!(*h.app.viewport().load_state(), LoadState::Ready);
    assert_eq!(h.app.session().total_pages(), 10);
    let (_, page, params) = h.next_page_request();
    assert_eq!(page, 1);
    assert_eq!(params.white, theme::LIGHT.page_white);
}

#[test]
fn stale_render_completion_is_not_applied() {
    let mut h = Harness::new();
    h.load_document(10);
    let _ = h.next_page_request();

    assert!(h.press(KeyCode::Char('l')));
    let (stale_id, page, _) = h.next_page_request();
    assert_eq!(page, 2);

    assert!(h.press(KeyCode::Char('l')));
    let (latest_id, page, _) = h.next_page_request();
    assert_eq!(page, 3);

    // The newer request finishes first; the older one limps in afterwards.
    h.responses
        .send(RenderResponse::Page {
            id: latest_id,
            page: 3,
            surface: tagged_surface(3),
        })
        .unwrap();
    assert!(h.app.on_tick());
    assert_eq!(h.app.viewport().surface().unwrap().width_px, 3);

    h.responses
        .send(RenderResponse::Page {
            id: stale_id,
            page: 2,
            surface: tagged_surface(2),
        })
        .unwrap();
    assert!(!h.app.on_tick());
    assert_eq!(h.app.viewport().surface().unwrap().width_px, 3);
}

#[test]
fn seek_keys_resolve_to_ceiling_page() {
    let mut h = Harness::new();
    h.load_document(20);
    let _ = h.next_page_request();

    assert!(h.press(KeyCode::Char('5')));
    assert_eq!(h.app.session().current_page(), 10);
    assert_eq!(h.app.session().progress(), 50.0);
    let (_, page, _) = h.next_page_request();
    assert_eq!(page, 10);

    // Seeking to the same spot again changes nothing and renders nothing.
    assert!(!h.press(KeyCode::Char('5')));
    h.assert_no_requests();
}

#[test]
fn bound_navigation_issues_no_renders() {
    let mut h = Harness::new();
    h.load_document(3);
    let _ = h.next_page_request();

    assert!(!h.press(KeyCode::Char('h')));
    h.assert_no_requests();

    h.press(KeyCode::End);
    let (_, page, _) = h.next_page_request();
    assert_eq!(page, 3);

    assert!(!h.press(KeyCode::Char('l')));
    h.assert_no_requests();
    assert_eq!(h.app.session().current_page(), 3);
}

#[test]
fn theme_toggle_rerenders_with_dark_tint() {
    let mut h = Harness::new();
    h.load_document(5);
    let _ = h.next_page_request();

    assert!(h.press(KeyCode::Char('t')));
    assert!(h.app.session().is_dark());
    let (_, page, params) = h.next_page_request();
    assert_eq!(page, 1);
    assert_eq!(params.white, theme::DARK.page_white);
    assert_eq!(params.black, theme::DARK.page_black);

    assert!(h.press(KeyCode::Char('t')));
    assert!(!h.app.session().is_dark());
    let (_, _, params) = h.next_page_request();
    assert_eq!(params.white, theme::LIGHT.page_white);
}

#[test]
fn page_failure_keeps_previous_surface() {
    let mut h = Harness::new();
    h.load_document(10);
    let (first_id, _, _) = h.next_page_request();

    h.responses
        .send(RenderResponse::Page {
            id: first_id,
            page: 1,
            surface: tagged_surface(1),
        })
        .unwrap();
    assert!(h.app.on_tick());

    h.press(KeyCode::Char('l'));
    let (second_id, _, _) = h.next_page_request();
    h.responses
        .send(RenderResponse::PageFailed {
            id: second_id,
            page: 2,
            fault: RenderFault::surface("boom"),
        })
        .unwrap();
    assert!(h.app.on_tick());

    // Page 1 stays on screen and recovery via `r` re-requests page 2.
    assert_eq!(h.app.viewport().surface().unwrap().width_px, 1);
    assert!(h.press(KeyCode::Char('r')));
    let (_, page, _) = h.next_page_request();
    assert_eq!(page, 2);
}

#[test]
fn load_failure_is_recoverable_with_retry() {
    let mut h = Harness::new();
    h.responses
        .send(RenderResponse::LoadFailed {
            fault: RenderFault::surface("not a pdf"),
        })
        .unwrap();
    assert!(h.app.on_tick());

    assert!(matches!(h.app.viewport().load_state(), LoadState::Failed(_)));

    // Navigation is absorbed while nothing is loaded.
    assert!(!h.press(KeyCode::Char('l')));
    h.assert_no_requests();

    assert!(h.press(KeyCode::Char('r')));
    assert!(matches!(h.requests.try_recv(), Ok(RenderRequest::Reload)));
    assert_eq!(*h.app.viewport().load_state(), LoadState::Loading);

    h.load_document(7);
    assert_eq!(*h.app.viewport().load_state(), LoadState::Ready);
    assert_eq!(h.app.session().total_pages(), 7);
}
