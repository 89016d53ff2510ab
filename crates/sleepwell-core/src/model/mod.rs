//! Domain types: profiles, entries and clock times.

mod clock;
mod entry;
mod profile;

pub use clock::ClockTime;
pub use entry::{Caffeine, Mood, NewSleepEntry, SleepEntry};
pub use profile::{
    Chronotype, SleepProfile, SleepSchedule, MAX_TARGET_SLEEP_HOURS, MIN_TARGET_SLEEP_HOURS,
};
