use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, WriteLogger};

use pageturn::app::{App, run_app};
use pageturn::event_source::KeyboardEvents;
use pageturn::panic_handler;
use pageturn::settings::Settings;

#[derive(Parser)]
#[command(name = "pageturn", version, about = "A terminal-based PDF page viewer")]
struct Cli {
    /// PDF document to view
    #[arg(value_name = "FILE")]
    document: PathBuf,

    /// Zoom factor for page rasterization
    #[arg(long, value_name = "FACTOR")]
    scale: Option<f32>,

    /// Start in dark theme
    #[arg(long)]
    dark: bool,

    /// Log file path
    #[arg(long, value_name = "PATH", default_value = "pageturn.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load();
    if let Some(scale) = cli.scale {
        ensure!(
            scale.is_finite() && scale > 0.0,
            "--scale must be a positive number"
        );
        settings.scale = scale;
    }
    if cli.dark {
        settings.dark = true;
    }

    WriteLogger::init(
        settings.level_filter(),
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("cannot create log file {}", cli.log_file.display()))?,
    )?;
    info!("starting pageturn");

    ensure!(
        cli.document.is_file(),
        "no such file: {}",
        cli.document.display()
    );

    panic_handler::initialize_panic_handler();

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut app = App::new(&cli.document, &settings);
    let res = run_app(&mut terminal, &mut app, &mut KeyboardEvents);

    panic_handler::restore_terminal();

    if let Err(err) = &res {
        error!("application error: {err:?}");
    }
    info!("shutting down");

    res
}
