use crate::utils::time::until_next_midnight;
use std::time::Duration;

/// When the daemon fires next.
pub trait Schedule: Send + Sync {
    /// Time left until the next fire, measured from now.
    fn until_next(&self) -> Duration;
}

/// Once a day, five seconds after local midnight.
pub struct DailySchedule;

impl Schedule for DailySchedule {
    fn until_next(&self) -> Duration {
        until_next_midnight()
    }
}
