mod app;
mod clipboard;
mod ui;

use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use quillcheck_config::Config;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    time::Instant,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let initial_text = if args.len() == 2 {
        // Optional file whose contents seed the editor; nothing is written back.
        match std::fs::read_to_string(&args[1]) {
            Ok(content) => Some(content),
            Err(e) => {
                eprintln!("Error: failed to read '{}': {e}", args[1]);
                process::exit(1);
            }
        }
    } else if args.len() == 1 {
        None
    } else {
        eprintln!("Usage: {} [text-file]", args[0]);
        process::exit(1);
    };

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };

    init_logging(config.log_file.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, initial_text)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Logging goes to a file (the TUI owns the terminal) and stays off unless a
/// log file is configured or QUILLCHECK_LOG points at one.
fn init_logging(log_file: Option<PathBuf>) {
    let path = log_file.or_else(|| env::var("QUILLCHECK_LOG").ok().map(PathBuf::from));
    let Some(path) = path else {
        return;
    };

    let file = match std::fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file '{}': {e}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        // Poll with a timeout so debounce deadlines and check responses are
        // handled even when no key is pressed; typing stays responsive while
        // a check is in flight.
        let now = Instant::now();
        if event::poll(app.poll_timeout(now))?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(key, Instant::now());
        }
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}
