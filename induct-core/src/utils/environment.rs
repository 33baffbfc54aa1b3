use crate::utils::{DefaultRandom, Float, Random, Timer};
use std::sync::Arc;

/// Specifies a logger type which takes a string message as its argument.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Keeps track of quota state: the search checks it at generation boundaries and unwinds
/// cleanly when the quota is reached.
pub trait Quota: Send + Sync {
    /// Returns true when quota is reached.
    fn is_reached(&self) -> bool;
}

/// A time based quota.
pub struct TimeQuota {
    start: Timer,
    limit_in_secs: Float,
}

impl TimeQuota {
    /// Creates a new instance of `TimeQuota`, starting the clock immediately.
    pub fn new(limit_in_secs: Float) -> Self {
        Self { start: Timer::start(), limit_in_secs }
    }
}

impl Quota for TimeQuota {
    fn is_reached(&self) -> bool {
        self.start.elapsed_secs_as_float() > self.limit_in_secs
    }
}

/// Keeps data which is required by the search logic, but is not part of the problem itself.
#[derive(Clone)]
pub struct Environment {
    /// A source of randomness.
    pub random: Arc<dyn Random>,
    /// A time quota, if set, turns the run into a `timed_out` result instead of a failure.
    pub quota: Option<Arc<dyn Quota>>,
    /// A logger used by telemetry.
    pub logger: InfoLogger,
}

impl Environment {
    /// Creates a new instance of `Environment`.
    pub fn new(random: Arc<dyn Random>, quota: Option<Arc<dyn Quota>>, logger: InfoLogger) -> Self {
        Self { random, quota, logger }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            random: Arc::new(DefaultRandom::default()),
            quota: None,
            logger: Arc::new(|msg: &str| println!("{msg}")),
        }
    }
}
