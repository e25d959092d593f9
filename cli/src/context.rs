use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use squad_ready_core::{
    AudioNotifier, Notifiers, ReadyCheckTracker, Settings, SharedSettings, WindowFlasher,
};

/// Clock that only moves when told to, so nag timing can be stepped through
#[derive(Debug)]
pub struct VirtualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints cues and flashes instead of playing them, and keeps a log of them
#[derive(Debug, Default)]
pub struct PrintingNotifier {
    log: Mutex<Vec<String>>,
}

impl PrintingNotifier {
    fn record(&self, line: &str) {
        println!("  >> {line}");
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }

    /// Drain everything printed so far
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl AudioNotifier for PrintingNotifier {
    fn play_ready_check_cue(&self) {
        self.record("ready check cue");
    }

    fn play_squad_ready_cue(&self) {
        self.record("squad ready cue");
    }
}

impl WindowFlasher for PrintingNotifier {
    fn flash(&self) {
        self.record("flash");
    }
}

/// Holds all shared state for the CLI application.
pub struct CliContext {
    pub tracker: ReadyCheckTracker,
    pub settings: SharedSettings,
    pub clock: VirtualClock,
    pub printer: Arc<PrintingNotifier>,
}

impl CliContext {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let settings = SharedSettings::new(settings);
        let printer = Arc::new(PrintingNotifier::default());
        let notifiers = Notifiers::new(printer.clone(), printer.clone());
        Self {
            tracker: ReadyCheckTracker::new(notifiers, Arc::new(settings.clone())),
            settings,
            clock: VirtualClock::new(),
            printer,
        }
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
