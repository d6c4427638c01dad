use crate::dataset::EntityId;

/// Pointer position in page coordinates (CSS pixels from the document origin).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PagePoint {
	pub x: f64,
	pub y: f64,
}

/// What a click landed on. A node click also lists the node's connected
/// edges, so consumers should give `nodes` priority.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
	pub nodes: Vec<EntityId>,
	pub edges: Vec<EntityId>,
}

pub type SelectHandler = Box<dyn FnMut(&Selection, PagePoint)>;
pub type DragStartHandler = Box<dyn FnMut()>;

/// The interaction events a rendering backend exposes to the rest of the app.
pub trait GraphInteractionSource {
	/// Called on every click, including clicks on empty canvas.
	fn on_select(&mut self, handler: SelectHandler);
	/// Called once when a press turns into a drag.
	fn on_drag_start(&mut self, handler: DragStartHandler);
}

/// Registered handlers, invoked in registration order.
#[derive(Default)]
pub struct InteractionHandlers {
	select: Vec<SelectHandler>,
	drag_start: Vec<DragStartHandler>,
}

impl InteractionHandlers {
	pub fn emit_select(&mut self, selection: &Selection, pointer: PagePoint) {
		for handler in &mut self.select {
			handler(selection, pointer);
		}
	}

	pub fn emit_drag_start(&mut self) {
		for handler in &mut self.drag_start {
			handler();
		}
	}
}

impl GraphInteractionSource for InteractionHandlers {
	fn on_select(&mut self, handler: SelectHandler) {
		self.select.push(handler);
	}

	fn on_drag_start(&mut self, handler: DragStartHandler) {
		self.drag_start.push(handler);
	}
}
