use std::sync::mpsc::{self, Receiver, RecvError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of events driving the session: keyboard, resize, and the
/// periodic tick. Ticks queue on the channel like any other event, so
/// late delivery still applies each one individually and in order.
pub trait EventSource: Send + 'static {
    /// Block for the next event. Err means the source shut down.
    fn recv(&self) -> Result<AppEvent, RecvError>;
}

/// Production event source: a crossterm input reader thread plus a
/// fixed-period tick thread feeding one channel.
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new(tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        let tick_tx = tx.clone();
        thread::spawn(move || loop {
            thread::sleep(tick_interval);
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        });

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl EventSource for CrosstermEventSource {
    fn recv(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }
}

/// Test event source fed from a plain channel, for driving sessions
/// without a terminal or a real clock.
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_pass_through_in_order() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Tick).unwrap();
        tx.send(AppEvent::Resize).unwrap();
        tx.send(AppEvent::Tick).unwrap();
        let es = TestEventSource::new(rx);

        assert!(matches!(es.recv(), Ok(AppEvent::Tick)));
        assert!(matches!(es.recv(), Ok(AppEvent::Resize)));
        assert!(matches!(es.recv(), Ok(AppEvent::Tick)));
    }

    #[test]
    fn disconnected_source_reports_shutdown() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let es = TestEventSource::new(rx);
        assert!(es.recv().is_err());
    }

    #[test]
    fn queued_ticks_are_not_coalesced() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..5 {
            tx.send(AppEvent::Tick).unwrap();
        }
        let es = TestEventSource::new(rx);

        let mut ticks = 0;
        while let Ok(ev) = es.recv() {
            if let AppEvent::Tick = ev {
                ticks += 1;
            }
            if ticks == 5 {
                break;
            }
        }
        assert_eq!(ticks, 5);
    }
}
