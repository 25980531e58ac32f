//! Application shell: key handling, layout and the run loop
//!
//! Presentation only. Keys become session commands, session effects become
//! viewport work; no decision logic lives here.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Gauge, Paragraph};

use crate::event_source::{Event, EventSource, KeyCode, KeyEvent, KeyEventKind};
use crate::notification::{NoticeBoard, NoticeLevel};
use crate::page_widget::PageWidget;
use crate::session::{Command, ReaderSession};
use crate::settings::Settings;
use crate::theme::{self, Palette};
use crate::viewport::{LoadState, Viewport};

const TICK_RATE: Duration = Duration::from_millis(50);

pub struct App {
    session: ReaderSession,
    viewport: Viewport,
    notices: NoticeBoard,
    doc_name: String,
    should_quit: bool,
}

impl App {
    /// Open a document and start the render backend.
    #[must_use]
    pub fn new(doc_path: &Path, settings: &Settings) -> Self {
        let doc_name = doc_path
            .file_name()
            .map_or_else(|| doc_path.display().to_string(), |n| n.to_string_lossy().into_owned());

        Self::with_viewport(
            doc_name,
            Viewport::open(doc_path.to_path_buf(), settings.scale),
            settings.dark,
        )
    }

    /// Assemble from parts; tests pass a viewport over a detached service.
    #[must_use]
    pub fn with_viewport(doc_name: String, viewport: Viewport, dark: bool) -> Self {
        Self {
            session: ReaderSession::new(dark),
            viewport,
            notices: NoticeBoard::new(),
            doc_name,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &ReaderSession {
        &self.session
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle one key press; returns true if the display changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                true
            }

            KeyCode::Char('l') | KeyCode::Right => self.dispatch(Command::NextPage),
            KeyCode::Char('h') | KeyCode::Left => self.dispatch(Command::PrevPage),
            KeyCode::Char('g') | KeyCode::Home => self.dispatch(Command::SetCurrentPage(1)),
            KeyCode::Char('G') | KeyCode::End => {
                self.dispatch(Command::SetCurrentPage(self.session.total_pages()))
            }
            KeyCode::Char('t') => self.dispatch(Command::ToggleTheme),

            KeyCode::Char(c) if c.is_ascii_digit() => {
                let percent = (c as u8 - b'0') * 10;
                self.dispatch(Command::SeekPercent(percent))
            }

            KeyCode::Char('r') => {
                match self.viewport.load_state() {
                    LoadState::Failed(_) => {
                        self.notices.info(format!("reopening {}", self.doc_name));
                        self.viewport.reload();
                    }
                    LoadState::Ready => self.viewport.refresh(&self.session),
                    LoadState::Loading => {}
                }
                true
            }

            _ => false,
        }
    }

    fn dispatch(&mut self, cmd: Command) -> bool {
        let effects = self.session.apply(cmd);
        self.viewport.handle_effects(&effects, &self.session);
        !effects.is_empty()
    }

    /// Periodic work between input events; returns true if a redraw is due.
    pub fn on_tick(&mut self) -> bool {
        let mut dirty = self.viewport.poll(&mut self.session, &mut self.notices);
        dirty |= self.notices.update();
        dirty
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let colors = theme::palette(self.session.is_dark());

        let backdrop = Block::default().style(Style::default().bg(colors.bg).fg(colors.fg));
        frame.render_widget(backdrop, frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0], colors);
        self.draw_content(frame, chunks[1], colors);
        self.draw_notice(frame, chunks[2], colors);
        self.draw_progress(frame, chunks[3], colors);
        self.draw_help(frame, chunks[4], colors);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect, colors: &Palette) {
        let title = self.viewport.title().unwrap_or(&self.doc_name);
        let title = Paragraph::new(Line::from(Span::styled(
            title,
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, area);

        if self.session.total_pages() > 0 {
            let indicator = Paragraph::new(format!(
                "Page {} of {}",
                self.session.current_page(),
                self.session.total_pages()
            ))
            .alignment(Alignment::Right);
            frame.render_widget(indicator, area);
        }
    }

    fn draw_content(&self, frame: &mut Frame, area: Rect, colors: &Palette) {
        match self.viewport.load_state() {
            LoadState::Loading => {
                self.draw_message(frame, area, &format!("Opening {}\u{2026}", self.doc_name), colors.muted);
            }

            LoadState::Failed(reason) => {
                let lines = vec![
                    Line::from(Span::styled(
                        reason.clone(),
                        Style::default().fg(colors.error),
                    )),
                    Line::default(),
                    Line::from(Span::styled(
                        "press r to retry",
                        Style::default().fg(colors.muted),
                    )),
                ];
                let message = Paragraph::new(lines).alignment(Alignment::Center);
                frame.render_widget(message, vertical_center(area, 3));
            }

            LoadState::Ready => match self.viewport.surface() {
                Some(surface) => {
                    frame.render_widget(PageWidget::new(surface, colors.bg), area);
                }
                None => self.draw_message(frame, area, "Rendering\u{2026}", colors.muted),
            },
        }
    }

    fn draw_message(&self, frame: &mut Frame, area: Rect, text: &str, color: ratatui::style::Color) {
        let message = Paragraph::new(Span::styled(text, Style::default().fg(color)))
            .alignment(Alignment::Center);
        frame.render_widget(message, vertical_center(area, 1));
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, colors: &Palette) {
        let Some(notice) = self.notices.current() else {
            return;
        };
        let color = match notice.level {
            NoticeLevel::Info => colors.muted,
            NoticeLevel::Error => colors.error,
        };
        let line = Paragraph::new(Span::styled(
            notice.message.clone(),
            Style::default().fg(color),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(line, area);
    }

    fn draw_progress(&self, frame: &mut Frame, area: Rect, colors: &Palette) {
        let ratio = (self.session.progress() / 100.0).clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .ratio(ratio)
            .label(format!("{:.0}%", self.session.progress()))
            .gauge_style(Style::default().fg(colors.accent).bg(colors.muted));
        frame.render_widget(gauge, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect, colors: &Palette) {
        let help = Paragraph::new("h/l page \u{b7} g/G first/last \u{b7} 0-9 seek \u{b7} t theme \u{b7} r reload \u{b7} q quit")
            .style(Style::default().fg(colors.muted))
            .alignment(Alignment::Center);
        frame.render_widget(help, area);
    }
}

/// Band of the given height vertically centered within the area
fn vertical_center(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let y = area.y + (area.height - height) / 2;
    Rect::new(area.x, y, area.width, height)
}

/// Drive the app until quit: draw when dirty, read input, drain the backend.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut impl EventSource,
) -> Result<()> {
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|frame| app.draw(frame))?;
            dirty = false;
        }

        if events.poll(TICK_RATE)? {
            match events.read()? {
                Event::Key(key) => dirty |= app.handle_key(key),
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        dirty |= app.on_tick();

        if app.should_quit() {
            return Ok(());
        }
    }
}
