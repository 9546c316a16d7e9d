//! Simulated loading screen.
//!
//! A counter steps from 0 to 100 on a fixed interval and signals completion
//! exactly once. The progress is cosmetic and not tied to real load state;
//! any periodic scheduling primitive can drive `tick`.

use std::time::Duration;

/// Tick period of the simulated progress.
pub const TICK_PERIOD: Duration = Duration::from_millis(50);

/// Progress added per tick.
const STEP: u8 = 2;

/// Loading-screen state machine.
#[derive(Debug, Clone)]
pub struct LoadingScreen {
    progress: u8,
    signalled: bool,
}

impl LoadingScreen {
    pub fn new() -> Self {
        Self {
            progress: 0,
            signalled: false,
        }
    }

    /// Current percentage, 0..=100.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }

    /// Status label shown under the bar.
    pub fn phase(&self) -> &'static str {
        match self.progress {
            0..=29 => "Initializing...",
            30..=59 => "Loading...",
            60..=89 => "Almost ready...",
            _ => "Welcome!",
        }
    }

    /// Advance one step. Returns `true` exactly once, on the tick that
    /// reaches 100.
    pub fn tick(&mut self) -> bool {
        if self.progress < 100 {
            self.progress = (self.progress + STEP).min(100);
        }
        if self.progress >= 100 && !self.signalled {
            self.signalled = true;
            return true;
        }
        false
    }

    /// Drive the counter to completion on [`TICK_PERIOD`], then invoke the
    /// completion callback.
    pub async fn run<F>(mut self, on_complete: F)
    where
        F: FnOnce(),
    {
        let mut interval = tokio::time::interval(TICK_PERIOD);
        loop {
            interval.tick().await;
            if self.tick() {
                on_complete();
                return;
            }
        }
    }
}

impl Default for LoadingScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn completes_after_fifty_ticks_and_signals_once() {
        let mut screen = LoadingScreen::new();
        let mut signals = 0;
        for _ in 0..60 {
            if screen.tick() {
                signals += 1;
            }
        }
        assert_eq!(screen.progress(), 100);
        assert!(screen.is_complete());
        assert_eq!(signals, 1);
    }

    #[test]
    fn phases_follow_progress_thresholds() {
        let mut screen = LoadingScreen::new();
        assert_eq!(screen.phase(), "Initializing...");
        while screen.progress() < 30 {
            screen.tick();
        }
        assert_eq!(screen.phase(), "Loading...");
        while screen.progress() < 60 {
            screen.tick();
        }
        assert_eq!(screen.phase(), "Almost ready...");
        while screen.progress() < 90 {
            screen.tick();
        }
        assert_eq!(screen.phase(), "Welcome!");
    }

    #[tokio::test(start_paused = true)]
    async fn run_invokes_completion_callback_once()  {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();

        LoadingScreen::new()
            .run(move || {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
