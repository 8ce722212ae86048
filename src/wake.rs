use std::process::{Child, Command, Stdio};

/// One way of keeping the machine awake. Providers are ranked and
/// tried in order; only the acquired/released outcome is visible to
/// the session.
pub trait WakeProvider {
    fn name(&self) -> &'static str;
    /// Try to take the wake lock. Returns false if this strategy is
    /// unavailable so the next provider can be tried.
    fn acquire(&mut self) -> bool;
    fn release(&mut self);
}

/// Holds an idle inhibitor by keeping a `systemd-inhibit` child alive
/// for as long as the lock is wanted.
pub struct InhibitCommandProvider {
    child: Option<Child>,
}

impl InhibitCommandProvider {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { child: None }
    }
}

impl WakeProvider for InhibitCommandProvider {
    fn name(&self) -> &'static str {
        "systemd-inhibit"
    }

    fn acquire(&mut self) -> bool {
        if self.child.is_some() {
            return true;
        }
        self.child = Command::new("systemd-inhibit")
            .args(["--what=idle", "--who=rondo", "--why=workout running"])
            .args(["sleep", "infinity"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .ok();
        self.child.is_some()
    }

    fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for InhibitCommandProvider {
    fn drop(&mut self) {
        self.release();
    }
}

/// Last-resort provider that always "succeeds" without doing
/// anything, so the ranked list never fails as a whole.
pub struct NoopProvider;

impl WakeProvider for NoopProvider {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn acquire(&mut self) -> bool {
        true
    }

    fn release(&mut self) {}
}

/// Ranked list of wake strategies behind a single boolean. The
/// session pushes `wanted` on every running/keep-screen-on change and
/// never learns which provider holds the lock.
pub struct WakeLock {
    providers: Vec<Box<dyn WakeProvider>>,
    active: Option<usize>,
}

impl WakeLock {
    pub fn new(providers: Vec<Box<dyn WakeProvider>>) -> Self {
        Self {
            providers,
            active: None,
        }
    }

    /// Default provider ranking for production use.
    pub fn ranked() -> Self {
        Self::new(vec![
            Box::new(InhibitCommandProvider::new()),
            Box::new(NoopProvider),
        ])
    }

    /// Empty list; `set` becomes a no-op. Used with `--no-wake`.
    pub fn disabled() -> Self {
        Self::new(vec![])
    }

    pub fn is_held(&self) -> bool {
        self.active.is_some()
    }

    /// Name of the provider currently holding the lock, if any.
    pub fn holder(&self) -> Option<&'static str> {
        self.active.map(|i| self.providers[i].name())
    }

    pub fn set(&mut self, wanted: bool) {
        match (wanted, self.active) {
            (true, None) => {
                self.active = self
                    .providers
                    .iter_mut()
                    .position(|p| p.acquire());
            }
            (false, Some(i)) => {
                self.providers[i].release();
                self.active = None;
            }
            _ => {}
        }
    }
}

impl Drop for WakeLock {
    fn drop(&mut self) {
        self.set(false);
    }
}
