//! Infrastructure adapters

mod clock;

pub use clock::{ManualClock, SystemClock};
