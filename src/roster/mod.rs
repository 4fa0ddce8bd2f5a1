//! Match roster.
//!
//! [`Roster`] owns every [`Participant`](crate::types::Participant) of a
//! match. Membership is fixed when the roster is built; joining and leaving
//! belong to whatever lobby hands the roster to the engine.

pub mod table;

pub use table::Roster;
