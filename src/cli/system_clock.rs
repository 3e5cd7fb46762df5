use chrono::{DateTime, Utc};
use register_core::Clock;

/// Wall clock used by the shell when no reference date is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
