//! Deterministic simulation module
//!
//! All windmill logic lives here. This module must be pure and deterministic:
//! - Elapsed time supplied by the caller, nothing read from a clock
//! - Stable iteration order (point insertion order)
//! - No rendering, audio or platform dependencies

pub mod cue;
pub mod history;
pub mod registry;
pub mod side;
pub mod state;
pub mod sweep;
pub mod tick;

pub use cue::SwitchCue;
pub use history::{TransitionEdge, TransitionHistory};
pub use registry::{Point, PointId, PointRegistry};
pub use side::{bearing, is_clockwise_of, on_clockwise_side};
pub use state::{PivotSwitch, PointView, Ray, SimMode, Windmill, WindmillSnapshot};
pub use tick::{TickInput, tick};
