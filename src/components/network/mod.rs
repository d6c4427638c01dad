//! Canvas network backend: simulation, drawing and pointer hit-testing.

mod component;
mod events;
mod options;
mod render;
mod state;

pub use component::NetworkView;
pub use events::{
	DragStartHandler, GraphInteractionSource, PagePoint, SelectHandler, Selection,
};
