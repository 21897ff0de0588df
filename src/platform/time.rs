//! Timing sources
//!
//! The harness asks the clock once per frame for the time since the last
//! query. A stopped clock reports zero, which is how pause freezes the loop
//! without cancelling anything.

/// Stoppable frame clock
pub trait TimingSource {
    /// Seconds since the previous query (zero while stopped)
    fn elapsed(&mut self) -> f32;
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

#[cfg(not(target_arch = "wasm32"))]
type Instant = std::time::Instant;

/// Millisecond timestamp source on the web
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy)]
struct Instant(f64);

#[cfg(target_arch = "wasm32")]
impl Instant {
    fn now() -> Self {
        let ms = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now);
        Self(ms)
    }

    fn elapsed(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(((Self::now().0 - self.0) / 1000.0).max(0.0))
    }
}

/// Wall clock
#[derive(Debug)]
pub struct SystemClock {
    last: Option<Instant>,
}

impl SystemClock {
    /// A clock that is not yet running
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingSource for SystemClock {
    fn elapsed(&mut self) -> f32 {
        match self.last.as_mut() {
            Some(last) => {
                let dt = last.elapsed().as_secs_f32();
                *last = Instant::now();
                dt
            }
            None => 0.0,
        }
    }

    fn start(&mut self) {
        if self.last.is_none() {
            self.last = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        self.last = None;
    }

    fn is_running(&self) -> bool {
        self.last.is_some()
    }
}

/// Fixed-step clock for headless runs and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualClock {
    /// Seconds reported per query while running
    pub step: f32,
    running: bool,
}

impl ManualClock {
    pub fn new(step: f32) -> Self {
        Self { step, running: false }
    }
}

impl TimingSource for ManualClock {
    fn elapsed(&mut self) -> f32 {
        if self.running { self.step } else { 0.0 }
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
