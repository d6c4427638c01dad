//! Display configuration for the network canvas.
//!
//! Keys and defaults follow the vis-network options object, so an existing
//! vis options blob can be deserialized as-is.

use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkOptions {
	pub nodes: NodeOptions,
	pub edges: EdgeOptions,
	pub physics: PhysicsOptions,
	pub interaction: InteractionOptions,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeShape {
	#[default]
	Dot,
	Square,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeOptions {
	pub shape: NodeShape,
	/// Diameter of a dot, side of a square, in graph units.
	pub size: f64,
}

impl Default for NodeOptions {
	fn default() -> Self {
		Self {
			shape: NodeShape::Dot,
			size: 12.0,
		}
	}
}

impl NodeOptions {
	pub fn radius(&self) -> f64 {
		self.size / 2.0
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arrows {
	None,
	#[default]
	To,
	From,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelAlign {
	/// Upright text at the midpoint.
	Horizontal,
	/// Rotated along the edge, centered on it.
	#[default]
	Middle,
	Top,
	Bottom,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeFont {
	pub align: LabelAlign,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeOptions {
	pub arrows: Arrows,
	pub font: EdgeFont,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsOptions {
	pub enabled: bool,
	/// Settle the layout before the first frame.
	pub stabilization: bool,
	pub stabilization_iterations: u32,
}

impl Default for PhysicsOptions {
	fn default() -> Self {
		Self {
			enabled: true,
			stabilization: true,
			stabilization_iterations: 300,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionOptions {
	pub hover: bool,
	/// Milliseconds a node must be hovered before it is highlighted.
	pub tooltip_delay: u32,
	pub drag_nodes: bool,
	pub drag_view: bool,
	pub zoom_view: bool,
}

impl Default for InteractionOptions {
	fn default() -> Self {
		Self {
			hover: true,
			tooltip_delay: 200,
			drag_nodes: true,
			drag_view: true,
			zoom_view: true,
		}
	}
}

impl InteractionOptions {
	pub fn tooltip_delay_secs(&self) -> f64 {
		f64::from(self.tooltip_delay) / 1000.0
	}
}
