//! Round timing.
//!
//! ## Components
//!
//! - [`TimeSource`]: injectable millisecond clock
//! - [`SystemTimeSource`]: `Instant`-backed production source
//! - [`ManualTimeSource`]: hand-driven source for tests and practice play
//! - [`RoundClock`]: countdown for the open round with latched expiry
//!
//! The clock never calls back into the engine. Expiry is claimed by polling
//! ([`RoundClock::poll_expiry`]), which the engine does on every entry point
//! and which a host ticker does on a schedule.

pub mod source;
pub mod round_clock;

pub use source::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use round_clock::RoundClock;
