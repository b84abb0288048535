//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Algorithm crates depend only on this crate, never on each other.
//!
//! ## Units
//! - Distances in kilometers (geodesy, trip totals) or meters (radii, accuracy)
//! - Stop durations in milliseconds, minutes for display
//! - Speeds in km/h, accelerations in m/s², frequencies in Hz
//! - Confidences in `[0, 1]`
//!
//! ## Time Model
//! Every sample carries a UTC instant (`chrono::DateTime<Utc>`); ordering is
//! the caller's responsibility.

mod config;
mod error;
mod geo;
mod motion;
mod trip;
mod vehicle_id;

pub use config::*;
pub use error::*;
pub use geo::*;
pub use motion::*;
pub use trip::*;
pub use vehicle_id::VehicleId;
