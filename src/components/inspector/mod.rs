//! Click-to-inspect overlay for graph entities.

mod controller;
mod panel;

pub use controller::{
	EntityKind, Inspection, InspectionOverlay, OverlayState, OverlayView, attach,
};
pub use panel::InspectionPanel;
