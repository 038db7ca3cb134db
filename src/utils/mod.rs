pub mod clock;
pub mod colors;
pub mod date;
pub mod formatting;
pub mod table;

pub use clock::{Clock, FixedClock, SystemClock};
pub use formatting::secs2readable;
