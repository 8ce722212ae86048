use crate::announce::Announcer;
use crate::app_dirs::AppDirs;
use crate::config::{Config, ConfigStore};
use crate::plan::WorkoutPlan;
use crate::timer::Timer;
use crate::wake::WakeLock;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};

/// Orchestrates the countdown timer: run/pause toggling, wiring
/// transitions to the announcer, plan changes to the config store, and
/// the wake lock to the running state. The timer state is mutated only
/// through here.
pub struct Session {
    pub timer: Timer,
    announcer: Box<dyn Announcer>,
    store: Box<dyn ConfigStore>,
    wake: WakeLock,
    pub sound_enabled: bool,
    pub keep_screen_on: bool,
    /// Last non-fatal problem (failed config write), surfaced in the UI.
    pub notice: Option<String>,
    announced_start: bool,
    /// Session-only mute; never written to the config store.
    muted: bool,
}

impl Session {
    pub fn new(
        cfg: Config,
        announcer: Box<dyn Announcer>,
        store: Box<dyn ConfigStore>,
        wake: WakeLock,
    ) -> Self {
        Self {
            timer: Timer::new(cfg.plan()),
            announcer,
            store,
            wake,
            sound_enabled: cfg.sound_enabled,
            keep_screen_on: cfg.keep_screen_on,
            notice: None,
            announced_start: false,
            muted: false,
        }
    }

    /// Begin or resume the countdown. Silent no-op once finished. The
    /// opening announcement fires exactly once per session, on the
    /// first activation before any tick has been consumed.
    pub fn start(&mut self) {
        if self.timer.finished {
            return;
        }
        self.timer.start();
        if !self.announced_start && self.timer.is_fresh() {
            self.announced_start = true;
            self.speak("Round 1. Exercise 1. Work");
        }
        self.push_wake();
    }

    /// Stop the countdown without touching phase or remaining time.
    pub fn pause(&mut self) {
        self.timer.pause();
        self.push_wake();
    }

    pub fn toggle_running(&mut self) {
        if self.timer.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Back to the start of the current plan, paused.
    pub fn reset(&mut self) {
        self.timer.pause();
        self.timer.reset();
        self.announced_start = false;
        self.push_wake();
    }

    /// Replace the active plan, reset under it, and persist the merged
    /// configuration. Best-effort on the write.
    pub fn update_plan(&mut self, plan: WorkoutPlan) {
        self.timer.apply_plan(plan);
        self.announced_start = false;
        self.push_wake();
        self.persist();
    }

    /// Apply exactly one elapsed second. Dispatches the transition
    /// announcement when a phase ends; on the final transition drops
    /// the wake lock and appends a history record.
    pub fn on_tick(&mut self) {
        let Some(ev) = self.timer.tick() else {
            return;
        };
        let announcement = ev.announcement;
        self.speak(&announcement);
        if self.timer.finished {
            self.push_wake();
            let _ = self.log_completion();
        }
    }

    /// Mute this run only. The saved `sound_enabled` setting is left
    /// alone, so later persists don't make the mute durable.
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Whether announcements would actually be spoken right now.
    pub fn sound_on(&self) -> bool {
        self.sound_enabled && !self.muted
    }

    /// An explicit toggle lifts a session-only mute first; only a
    /// toggle of the saved setting is persisted.
    pub fn toggle_sound(&mut self) {
        if self.muted {
            self.muted = false;
        } else {
            self.sound_enabled = !self.sound_enabled;
            self.persist();
        }
    }

    pub fn toggle_keep_screen_on(&mut self) {
        self.keep_screen_on = !self.keep_screen_on;
        self.push_wake();
        self.persist();
    }

    /// Audible check that the voice is working.
    pub fn test_sound(&mut self) {
        self.speak("Test sound");
    }

    pub fn wake_held(&self) -> bool {
        self.wake.is_held()
    }

    /// Release external resources before terminal teardown.
    pub fn shutdown(&mut self) {
        self.timer.pause();
        self.push_wake();
    }

    fn speak(&mut self, text: &str) {
        if self.sound_on() {
            self.announcer.speak(text);
        }
    }

    fn push_wake(&mut self) {
        self.wake.set(self.keep_screen_on && self.timer.running);
    }

    fn to_config(&self) -> Config {
        let mut cfg = Config {
            keep_screen_on: self.keep_screen_on,
            sound_enabled: self.sound_enabled,
            ..Config::default()
        };
        cfg.set_plan(*self.timer.plan());
        cfg
    }

    fn persist(&mut self) {
        match self.store.save(&self.to_config()) {
            Ok(()) => self.notice = None,
            Err(e) => self.notice = Some(format!("settings not saved: {e}")),
        }
    }

    fn log_completion(&self) -> io::Result<()> {
        let Some(log_path) = AppDirs::log_path() else {
            return Ok(());
        };
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let needs_header = !log_path.exists();
        let mut log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(log_path)?;

        if needs_header {
            writeln!(
                log_file,
                "date,rounds,exercises,work_secs,rest_secs,round_rest_secs"
            )?;
        }

        let plan = self.timer.plan();
        writeln!(
            log_file,
            "{},{},{},{},{},{}",
            Local::now().format("%c"),
            plan.rounds,
            plan.exercises_per_round,
            plan.work_secs,
            plan.rest_secs,
            plan.round_rest_secs,
        )?;

        Ok(())
    }
}
