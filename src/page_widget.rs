//! Half-block page painting
//!
//! Each terminal cell shows two vertically stacked pixels: the upper half
//! block glyph with the top pixel as foreground and the bottom pixel as
//! background. The rendered surface is downscaled to fit the cell grid,
//! preserving aspect ratio, and centered.

use image::RgbImage;
use image::imageops::{self, FilterType};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::render::PageSurface;

const UPPER_HALF_BLOCK: &str = "\u{2580}";

pub struct PageWidget<'a> {
    surface: &'a PageSurface,
    /// Fill for the area around the page and for the odd trailing pixel row
    backdrop: Color,
}

impl<'a> PageWidget<'a> {
    #[must_use]
    pub fn new(surface: &'a PageSurface, backdrop: Color) -> Self {
        Self { surface, backdrop }
    }
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((target_w, target_h)) = fit_pixels(
            (self.surface.width_px, self.surface.height_px),
            (u32::from(area.width), u32::from(area.height) * 2),
        ) else {
            return;
        };

        let scaled = scale_surface(self.surface, target_w, target_h);
        let Some(scaled) = scaled else { return };

        let cell_w = target_w as u16;
        let cell_h = target_h.div_ceil(2) as u16;
        let x0 = area.x + (area.width.saturating_sub(cell_w)) / 2;
        let y0 = area.y + (area.height.saturating_sub(cell_h)) / 2;

        for cy in 0..cell_h {
            for cx in 0..cell_w {
                let top = pixel_color(&scaled, u32::from(cx), u32::from(cy) * 2);
                let bottom_y = u32::from(cy) * 2 + 1;
                let bottom = if bottom_y < target_h {
                    pixel_color(&scaled, u32::from(cx), bottom_y)
                } else {
                    self.backdrop
                };

                if let Some(cell) = buf.cell_mut((x0 + cx, y0 + cy)) {
                    cell.set_symbol(UPPER_HALF_BLOCK).set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

/// Scale pixel dimensions to fit the available pixel grid, keeping aspect.
/// Returns None when either side would vanish.
fn fit_pixels(surface: (u32, u32), avail: (u32, u32)) -> Option<(u32, u32)> {
    let (sw, sh) = surface;
    let (aw, ah) = avail;
    if sw == 0 || sh == 0 || aw == 0 || ah == 0 {
        return None;
    }

    let scale = f64::min(f64::from(aw) / f64::from(sw), f64::from(ah) / f64::from(sh));
    let w = ((f64::from(sw) * scale) as u32).clamp(1, aw);
    let h = ((f64::from(sh) * scale) as u32).clamp(1, ah);
    Some((w, h))
}

fn scale_surface(surface: &PageSurface, w: u32, h: u32) -> Option<RgbImage> {
    let img = RgbImage::from_raw(surface.width_px, surface.height_px, surface.pixels.clone())?;
    if (w, h) == (surface.width_px, surface.height_px) {
        return Some(img);
    }
    Some(imageops::resize(&img, w, h, FilterType::Triangle))
}

fn pixel_color(img: &RgbImage, x: u32, y: u32) -> Color {
    let [r, g, b] = img.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}
