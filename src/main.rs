use std::env;
use std::fs::{create_dir_all, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;
use tracing::warn;

mod config;
mod errors;
mod hiscores;
mod model;
mod theme;
mod ui;

use hiscores::HiscoresClient;
use model::{AppEvent, AppState, Focus, COLUMNS};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_cli()?;
    init_tracing(&cli)?;

    // Persisted configuration: endpoint override and last queried user
    let mut app_cfg = match config::load() {
        Ok(c) => c,
        Err(err) => {
            eprintln!("Failed to load config: {err:?}. Using defaults.");
            config::AppConfig::default()
        }
    };

    let client = HiscoresClient::new(config::resolve_api_url(&app_cfg));

    // Lookup completion channel
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut state = AppState::default();

    // Deep-link analog of the original's `?user=` query parameter: a
    // username passed on the command line (or remembered from the last
    // run) pre-fills the search field and submits immediately.
    let startup_user = cli.username.clone().or_else(|| app_cfg.last_user.clone());
    if let Some(user) = startup_user {
        if !user.trim().is_empty() {
            state.username = user;
            submit(&mut state, &mut app_cfg, &client, &tx);
        }
    }

    // TUI init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // App loop
    let tick = Duration::from_millis(100);
    let mut last_draw: Option<Instant> = None;
    let mut running = true;

    while running {
        // Drain lookup completions into state
        while let Ok(evt) = rx.try_recv() {
            state.apply(evt);
        }

        // Draw at most every tick interval or immediately on first loop
        if last_draw.map_or(true, |at| at.elapsed() >= tick) {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_draw = Some(Instant::now());
        }

        // Non-blocking input with small timeout so we keep redrawing
        if event::poll(Duration::from_millis(10))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        running = false;
                        continue;
                    }
                    match state.focus {
                        Focus::Search => match key.code {
                            KeyCode::Esc => running = false,
                            KeyCode::Tab => state.focus = Focus::Table,
                            KeyCode::Enter => {
                                submit(&mut state, &mut app_cfg, &client, &tx);
                            }
                            KeyCode::Backspace => {
                                // Search control is disabled while a fetch
                                // is outstanding
                                if !state.fetching {
                                    state.username.pop();
                                }
                            }
                            KeyCode::Char(ch) => {
                                if !state.fetching {
                                    state.username.push(ch);
                                }
                            }
                            _ => {}
                        },
                        Focus::Table => match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => running = false,
                            KeyCode::Char('/') | KeyCode::Tab => state.focus = Focus::Search,
                            KeyCode::Char(ch @ '1'..='5') => {
                                let index = ch as usize - '1' as usize;
                                state.click_column(COLUMNS[index]);
                            }
                            _ => {}
                        },
                    }
                }
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        let width = terminal.size()?.width;
                        if let Some(column) =
                            ui::header_click_column(mouse.column, mouse.row, width)
                        {
                            state.focus = Focus::Table;
                            state.click_column(column);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Kick off a lookup: tag it with the next sequence number, persist the
/// username for the next launch, and spawn the fetch task. Completions
/// carrying an out-of-date tag are discarded by `AppState::apply`, so only
/// the most recent lookup's result is ever displayed.
fn submit(
    state: &mut AppState,
    cfg: &mut config::AppConfig,
    client: &HiscoresClient,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    if state.fetching {
        return;
    }
    let user = state.username.trim().to_string();
    let seq = state.begin_lookup();
    state.focus = Focus::Table;

    cfg.last_user = Some(user.clone());
    if let Err(err) = config::save(cfg) {
        warn!(error = ?err, "Failed to persist last user");
    }

    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        match client.lookup(&user).await {
            Ok(stats) => {
                let _ = tx.send(AppEvent::LookupLoaded { seq, stats });
            }
            Err(err) => {
                let _ = tx.send(AppEvent::LookupFailed {
                    seq,
                    message: err.to_string(),
                });
            }
        }
    });
}

#[derive(Debug, Default)]
struct CliArgs {
    debug: Option<DebugTarget>,
    username: Option<String>,
}

#[derive(Debug)]
enum DebugTarget {
    Default,
    Path(PathBuf),
}

fn parse_cli() -> Result<CliArgs> {
    let mut debug = None;
    let mut username = None;

    for arg in env::args().skip(1) {
        if arg == "--debug" {
            if debug.is_some() {
                bail!("`--debug` specified more than once");
            }
            debug = Some(DebugTarget::Default);
        } else if let Some(rest) = arg.strip_prefix("--debug=") {
            if debug.is_some() {
                bail!("`--debug` specified more than once");
            }
            if rest.is_empty() {
                debug = Some(DebugTarget::Default);
            } else {
                debug = Some(DebugTarget::Path(PathBuf::from(rest)));
            }
        } else if arg.starts_with('-') {
            bail!("unknown argument: {arg}");
        } else if username.is_none() {
            username = Some(arg);
        } else {
            bail!("unexpected argument: {arg}");
        }
    }

    Ok(CliArgs { debug, username })
}

fn init_tracing(cli: &CliArgs) -> Result<()> {
    if let Some(target) = &cli.debug {
        let log_path = match target {
            DebugTarget::Default => config::config_dir().join("debug.log"),
            DebugTarget::Path(path) => path.clone(),
        };

        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent).with_context(|| {
                    format!("failed to create log directory {}", parent.display())
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("failed to open log file {}", log_path.display()))?;

        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || file.try_clone().expect("failed to clone log file handle"))
            .with_ansi(false)
            .with_target(false)
            .with_max_level(LevelFilter::DEBUG);

        subscriber.try_init().map_err(|err| {
            anyhow::anyhow!(
                "failed to initialize logging to {}: {}",
                log_path.display(),
                err
            )
        })?;
    }

    Ok(())
}
