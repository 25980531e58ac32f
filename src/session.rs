//! Reader session state management

/// Navigation position, derived progress and theme for the open document.
///
/// Fields are private so every mutation goes through [`ReaderSession::apply`],
/// which recomputes progress in the same step. Callers can never observe a
/// page/progress combination that disagrees.
#[derive(Clone, Debug)]
pub struct ReaderSession {
    /// Current page (1-based)
    current_page: u32,

    /// Total page count; 0 until the document finishes opening
    total_pages: u32,

    /// Position within the document as a percentage in [0, 100]
    progress: f64,

    /// Dark theme flag
    is_dark: bool,
}

impl Default for ReaderSession {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ReaderSession {
    #[must_use]
    pub fn new(is_dark: bool) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            progress: 0.0,
            is_dark,
        }
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::SetCurrentPage(page) => self.go_to(page),

            Command::SetTotalPages(total) => {
                if self.total_pages == total {
                    // Repeated reports from the backend change nothing.
                    self.recompute_progress();
                    return vec![];
                }

                self.total_pages = total;
                self.current_page = self.current_page.clamp(1, total.max(1));
                self.recompute_progress();
                vec![Effect::RenderCurrentPage]
            }

            Command::NextPage => {
                if self.current_page < self.total_pages {
                    self.go_to(self.current_page + 1)
                } else {
                    vec![]
                }
            }

            Command::PrevPage => {
                if self.current_page > 1 {
                    self.go_to(self.current_page - 1)
                } else {
                    vec![]
                }
            }

            Command::SeekPercent(raw) => {
                if self.total_pages == 0 {
                    return vec![];
                }
                self.go_to(page_for_percent(raw, self.total_pages))
            }

            Command::ToggleTheme => {
                self.is_dark = !self.is_dark;
                vec![Effect::ThemeChanged]
            }
        }
    }

    fn go_to(&mut self, page: u32) -> Vec<Effect> {
        let clamped = page.clamp(1, self.total_pages.max(1));
        if self.current_page == clamped {
            return vec![];
        }

        self.current_page = clamped;
        self.recompute_progress();
        vec![Effect::RenderCurrentPage]
    }

    fn recompute_progress(&mut self) {
        self.progress = if self.total_pages > 0 {
            f64::from(self.current_page) * 100.0 / f64::from(self.total_pages)
        } else {
            0.0
        };
    }
}

/// Resolve a raw percentage (0..=100) to a page: ceiling of the fraction,
/// never below page 1.
#[must_use]
pub fn page_for_percent(raw: u8, total_pages: u32) -> u32 {
    let raw = u32::from(raw.min(100));
    (raw * total_pages).div_ceil(100).clamp(1, total_pages.max(1))
}

/// Commands that mutate the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Jump to a page; out-of-range input is clamped, not rejected
    SetCurrentPage(u32),
    /// Record the page count reported by the backend
    SetTotalPages(u32),
    /// Advance one page; no-op at the last page
    NextPage,
    /// Retreat one page; no-op at page 1
    PrevPage,
    /// Jump to a position given as a percentage of the document
    SeekPercent(u8),
    /// Flip the light/dark theme
    ToggleTheme,
}

/// Effects produced by session changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The visible page changed; a fresh render is needed
    RenderCurrentPage,
    /// The theme changed; restyle and re-tint the current page
    ThemeChanged,
}
