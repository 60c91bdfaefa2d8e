mod events;
mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::time::Duration;

use clap::Parser as ClapParser;
use color_eyre::eyre::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use downline::app::App;
use downline::config::ViewConfig;
use downline::hierarchy::{self, Agent};
use downline::report::{JsonFormatter, LayoutFormatter, TextFormatter};
use downline::{compute_layout, CollapseState, Density};
use events::AppEvent;

#[derive(ClapParser, Debug)]
#[command(name = "downline", about = "Lay out and browse an agency's agent hierarchy")]
struct Cli {
    /// JSON snapshot of agents (array of {id, parentId, path, depth, status}).
    #[arg(short, long)]
    agents: PathBuf,

    /// Optional TOML view config.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Display density; overrides the config file.
    #[arg(long, value_enum)]
    density: Option<Density>,

    /// Start collapsed below this depth.
    #[arg(long)]
    depth: Option<usize>,

    /// Collapse this agent on startup (repeatable).
    #[arg(long = "collapse", value_name = "ID")]
    collapse: Vec<String>,

    /// Print the layout to stdout instead of launching the TUI.
    #[arg(long)]
    dump: bool,

    /// Output format for --dump.
    #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
    format: DumpFormat,

    /// Write logs to this file (the TUI owns the terminal otherwise).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DumpFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.dump)?;

    let mut config = match &cli.config {
        Some(path) => ViewConfig::load(path)?,
        None => ViewConfig::default(),
    };
    if let Some(density) = cli.density {
        config.density = density;
    }
    if cli.depth.is_some() {
        config.initial_depth = cli.depth;
    }

    let agents = hierarchy::load_agents(&cli.agents)?;

    if cli.dump {
        return dump_layout(&agents, &config, &cli.collapse, cli.format);
    }

    let mut app = App::new(agents, config);
    for id in &cli.collapse {
        app.collapse.collapse(id);
    }
    app.relayout();

    // Launch TUI.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui(&mut terminal, &mut app, &cli.agents);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn init_tracing(log_file: Option<&Path>, dump: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("downline=info".parse()?);
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if dump => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        // Without a log file the TUI would be drawn over; stay silent.
        None => {}
    }
    Ok(())
}

fn dump_layout(
    agents: &[Agent],
    config: &ViewConfig,
    collapse_ids: &[String],
    format: DumpFormat,
) -> Result<()> {
    let mut collapsed = CollapseState::new();
    if let Some(depth) = config.initial_depth {
        collapsed.collapse_below_depth(agents, depth);
    }
    for id in collapse_ids {
        collapsed.collapse(id);
    }

    let layout = compute_layout(agents, &collapsed, config.spacing())?;
    let output = match format {
        DumpFormat::Text => TextFormatter::default().format(&layout),
        DumpFormat::Json => JsonFormatter.format(&layout),
    };
    println!("{output}");
    Ok(())
}

fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    snapshot: &Path,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();

    events::spawn_input_reader(tx.clone());

    // Tick timer (250ms); snapshot reloads are batched onto ticks.
    events::spawn_tick_timer(tx.clone(), Duration::from_millis(250));

    let _watcher = events::watch_snapshot(tx.clone(), snapshot)?;
    let mut pending_reload: Option<PathBuf> = None;

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(AppEvent::Key(key)) => app.handle_key(key),
            Ok(AppEvent::Mouse(mouse)) => app.handle_mouse(mouse),
            Ok(AppEvent::SnapshotChanged(path)) => pending_reload = Some(path),
            Ok(AppEvent::Tick) => {
                if let Some(path) = pending_reload.take() {
                    reload_snapshot(app, &path);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Re-read the snapshot. On a read or parse failure the previous agents stay
/// on screen and the error is shown.
fn reload_snapshot(app: &mut App, path: &Path) {
    match hierarchy::load_agents(path) {
        Ok(agents) => {
            tracing::info!(count = agents.len(), "reloaded agent snapshot");
            app.replace_agents(agents);
        }
        Err(err) => {
            tracing::warn!(%err, "keeping previous agent snapshot");
            app.error = Some(err.to_string());
        }
    }
}
