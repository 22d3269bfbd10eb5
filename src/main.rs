mod app;
mod domain;
mod form;
mod input;
mod lifecycle;
mod notifications;
mod persistence;
mod scheduler;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{format_due_date, format_local_timestamp, Goal, ListItem, Payload, Reminder, Section, Task};
use notifications::{effective_permission, DesktopNotifier, Notifier, SilentNotifier};
use persistence::{
    ensure_data_dir, init_local_data_dir, load_settings, log_file, settings_file, FileStore,
    KeyValueStore, ListStore, MemoryStore,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use scheduler::ReminderScheduler;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "planboard")]
#[command(about = "A terminal to-do list, reminder board and goal tracker", long_about = None)]
struct Cli {
    /// Never send desktop notifications this session
    #[arg(long, global = true)]
    no_notify: bool,

    /// Keep lists in memory only; nothing is written to the data directory
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .planboard directory in the current directory
    Init,
    /// Print a stored list (tasks, reminders or goals)
    List {
        /// Which list to print
        section: String,
    },
    /// Print the reminder alarms that would be armed right now
    Alarms,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let data_dir = init_local_data_dir()?;
        println!("Initialized data directory: {}", data_dir.display());
        println!();
        println!("planboard will now keep its lists in this directory.");
        return Ok(());
    }

    let data_dir = ensure_data_dir()?;
    init_logging(&data_dir)?;

    let store: Rc<dyn KeyValueStore> = if cli.ephemeral {
        Rc::new(MemoryStore::new())
    } else {
        Rc::new(FileStore::new(&data_dir)?)
    };
    let notifier: Box<dyn Notifier> = if cli.no_notify {
        Box::new(SilentNotifier)
    } else {
        Box::new(DesktopNotifier)
    };

    let settings_path = settings_file(&data_dir);
    let settings = load_settings(&settings_path).unwrap_or_else(|e| {
        warn!(error = %e, "settings unreadable, using defaults");
        Default::default()
    });

    match cli.command {
        Some(Commands::List { section }) => {
            let section = Section::from_key(&section)
                .with_context(|| format!("Unknown list '{}'. Use tasks, reminders or goals", section))?;
            print_list(store, section);
            Ok(())
        }
        Some(Commands::Alarms) => {
            let permission = effective_permission(settings.notification_permission, notifier.as_ref());
            if !permission.is_granted() {
                println!("Notifications are not enabled ({:?}); no alarms would be armed.", permission);
                return Ok(());
            }
            let reminders = ListStore::new(store, Section::Reminders.key()).load::<Reminder>();
            let mut scheduler = ReminderScheduler::new();
            scheduler.rearm(&reminders.items, permission, chrono::Local::now().naive_local());
            if scheduler.pending_count() == 0 {
                println!("No alarms pending.");
            }
            for alarm in scheduler.pending() {
                println!(
                    "{}  {} (due {})",
                    format_local_timestamp(alarm.fire_at),
                    alarm.text,
                    format_local_timestamp(alarm.due)
                );
            }
            Ok(())
        }
        Some(Commands::Init) | None => {
            let now = chrono::Local::now().naive_local();
            let settings_path = (!cli.ephemeral).then_some(settings_path);
            let mut app = AppState::new(store, settings, settings_path, notifier, now);
            run_tui(&mut app)
        }
    }
}

/// Send tracing output to the log file in the data directory. The terminal
/// belongs to the UI, so nothing is written to stdout/stderr.
fn init_logging(data_dir: &Path) -> Result<()> {
    let path = log_file(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env("PLANBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    Ok(())
}

fn print_list(store: Rc<dyn KeyValueStore>, section: Section) {
    println!("{}", section.title());
    match section {
        Section::Tasks => print_rows(&ListStore::new(store, section.key()).load::<Task>().items, |task| {
            let due = task.due.map(|d| format!("  (due {})", format_due_date(d)));
            format!("{} {}{}", domain::checkbox(task.done), task.text, due.unwrap_or_default())
        }),
        Section::Reminders => print_rows(&ListStore::new(store, section.key()).load::<Reminder>().items, |r| {
            format!("{}  @ {}", r.text, format_local_timestamp(r.time))
        }),
        Section::Goals => print_rows(&ListStore::new(store, section.key()).load::<Goal>().items, |goal| {
            format!("{} {:>3}%  {}", domain::progress_bar(goal.progress, 10), goal.progress, goal.text())
        }),
    }
}

fn print_rows<P: Payload>(items: &[ListItem<P>], line: impl Fn(&P) -> String) {
    if items.is_empty() {
        println!("  (empty)");
    }
    for item in items {
        println!("  #{:<4} {}", item.id, line(&item.payload));
    }
}

fn run_tui(app: &mut AppState) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Pending alarms die with the process
    if app.scheduler.pending_count() > 0 {
        info!(count = app.scheduler.pending_count(), "exiting with pending alarms");
    }

    if let Err(err) = &result {
        eprintln!("Error: {}", err);
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press
                    && input::handle_key(app, key, chrono::Local::now().naive_local())
                {
                    return Ok(());
                }
            }
        }

        app.tick(Instant::now(), chrono::Local::now().naive_local());
    }
}
