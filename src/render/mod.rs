//! Page rasterization backend

mod request;
mod service;
mod types;
mod worker;

pub use request::{RenderFault, RenderParams, RenderRequest, RenderResponse, RequestId};
pub use service::RenderService;
pub use types::PageSurface;

/// Default zoom factor applied when rasterizing a page
pub const DEFAULT_SCALE: f32 = 1.5;
