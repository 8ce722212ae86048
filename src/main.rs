mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use rondo::{
    announce::{Announcer, CommandAnnouncer, NullAnnouncer},
    config::{ConfigStore, FileConfigStore},
    plan::WorkoutPlan,
    runtime::{AppEvent, CrosstermEventSource, EventSource},
    session::Session,
    wake::WakeLock,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const TICK_RATE_MS: u64 = 1000;

/// terminal interval workout timer with voice announcements
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "An interval workout timer for the terminal: timed work/rest phases over \
                  configurable exercises and rounds, with spoken phase announcements and a \
                  screen wake lock while running. Settings persist between sessions."
)]
pub struct Cli {
    /// seconds of work per exercise
    #[clap(short = 'w', long)]
    work: Option<u32>,

    /// seconds of rest after each exercise
    #[clap(short = 'r', long)]
    rest: Option<u32>,

    /// seconds of rest between rounds
    #[clap(long)]
    round_rest: Option<u32>,

    /// exercises per round
    #[clap(short = 'e', long)]
    exercises: Option<u32>,

    /// number of rounds
    #[clap(short = 'n', long)]
    rounds: Option<u32>,

    /// mute announcements for this run without changing the saved setting
    #[clap(long)]
    no_sound: bool,

    /// skip the screen wake lock entirely
    #[clap(long)]
    no_wake: bool,

    /// text-to-speech program to announce with (autodetected when omitted)
    #[clap(long)]
    speech_cmd: Option<String>,
}

impl Cli {
    /// Overlay any plan flags on the persisted plan. Returns the
    /// resulting plan and whether a flag actually changed it.
    fn apply_plan_flags(&self, mut plan: WorkoutPlan) -> (WorkoutPlan, bool) {
        let mut changed = false;
        let mut set = |field: &mut u32, flag: Option<u32>| {
            if let Some(v) = flag {
                changed |= *field != v;
                *field = v;
            }
        };
        set(&mut plan.work_secs, self.work);
        set(&mut plan.rest_secs, self.rest);
        set(&mut plan.round_rest_secs, self.round_rest);
        set(&mut plan.exercises_per_round, self.exercises);
        set(&mut plan.rounds, self.rounds);
        (plan.normalized(), changed)
    }
}

pub struct App {
    pub session: Session,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut cfg = store.load();
    let (plan, plan_changed) = cli.apply_plan_flags(cfg.plan());
    cfg.set_plan(plan);

    let announcer: Box<dyn Announcer> = match &cli.speech_cmd {
        Some(program) => Box::new(CommandAnnouncer::new(program.clone())),
        None => match CommandAnnouncer::detect() {
            Some(a) => Box::new(a),
            None => Box::new(NullAnnouncer),
        },
    };
    let wake = if cli.no_wake {
        WakeLock::disabled()
    } else {
        WakeLock::ranked()
    };

    let mut session = Session::new(cfg, announcer, Box::new(store), wake);
    if plan_changed {
        // Persist the flag-adjusted plan so the next run picks it up
        session.update_plan(plan);
    }
    if cli.no_sound {
        session.mute();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App { session };
    let events = CrosstermEventSource::new(Duration::from_millis(TICK_RATE_MS));
    let res = start_tui(&mut terminal, &mut app, &events);

    app.session.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &E,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let ev = match events.recv() {
            Ok(ev) => ev,
            Err(_) => break,
        };

        match ev {
            AppEvent::Tick => {
                app.session.on_tick();
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Key(key) => {
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char(' ') => app.session.toggle_running(),
                    KeyCode::Char('r') => app.session.reset(),
                    KeyCode::Char('s') => app.session.toggle_sound(),
                    KeyCode::Char('k') => app.session.toggle_keep_screen_on(),
                    KeyCode::Char('t') => app.session.test_sound(),
                    _ => {}
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
