use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;
use serde_json::Value;

use super::events::{
	DragStartHandler, GraphInteractionSource, InteractionHandlers, PagePoint, SelectHandler,
	Selection,
};
use super::options::NetworkOptions;
use crate::dataset::{EntityId, GraphDataset};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Extra pick radius around a node, in graph units.
pub const HIT_SLOP: f64 = 7.0;
/// Max distance from an edge line that still picks it, in graph units.
pub const EDGE_HIT_DISTANCE: f64 = 4.0;
/// Screen pixels a press may travel before it becomes a drag.
pub const DRAG_THRESHOLD: f64 = 5.0;
const STABILIZATION_STEP: f32 = 0.016;
const LAYOUT_RADIUS: f64 = 100.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: EntityId,
	pub label: Option<String>,
	pub color: String,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub id: EntityId,
	pub label: Option<String>,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug)]
pub enum Grab {
	Node {
		idx: DefaultNodeIdx,
		node_start_x: f32,
		node_start_y: f32,
	},
	Background {
		transform_start_x: f64,
		transform_start_y: f64,
	},
}

/// A pointer press that has not been released yet.
#[derive(Clone, Debug)]
pub struct PressState {
	pub start_x: f64,
	pub start_y: f64,
	pub grab: Grab,
	pub dragging: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Simulation, view and pointer state behind one network canvas.
pub struct NetworkState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub options: NetworkOptions,
	pub transform: ViewTransform,
	pub press: Option<PressState>,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	edges: Vec<EdgeInfo>,
	handlers: InteractionHandlers,
}

fn group_color(group: &Value) -> Option<&'static str> {
	let slot = match group {
		Value::Number(n) => n.as_u64()? as usize,
		Value::String(s) => s.bytes().fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize)),
		_ => return None,
	};
	Some(COLORS[slot % COLORS.len()])
}

/// Distance from `(px, py)` to the segment `(x1, y1)-(x2, y2)`.
fn segment_distance(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < 1e-9 {
		0.0
	} else {
		(((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

impl NetworkState {
	pub fn new(data: &GraphDataset, options: NetworkOptions, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		for (i, node) in data.nodes.iter().enumerate() {
			// Duplicates stay out of the simulation; lookup only reaches the first.
			if id_to_idx.contains_key(&node.id) {
				continue;
			}
			let color = node
				.color()
				.map(str::to_owned)
				.or_else(|| node.group().and_then(group_color).map(str::to_owned))
				.unwrap_or_else(|| COLORS[0].into());
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = (
				(LAYOUT_RADIUS * angle.cos()) as f32,
				(LAYOUT_RADIUS * angle.sin()) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label().map(str::to_owned),
					color,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for edge in &data.edges {
			let endpoints = edge
				.from
				.as_ref()
				.and_then(|from| id_to_idx.get(from))
				.zip(edge.to.as_ref().and_then(|to| id_to_idx.get(to)));
			if let Some((&source, &target)) = endpoints {
				graph.add_edge(source, target, EdgeData::default());
				edges.push(EdgeInfo {
					id: edge.id.clone(),
					label: edge.label().map(str::to_owned),
					source,
					target,
				});
			}
		}
		debug!(
			"Network built with {} nodes and {} drawable edges",
			id_to_idx.len(),
			edges.len()
		);

		Self {
			graph,
			options,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			press: None,
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			handlers: InteractionHandlers::default(),
		}
	}

	pub fn edges(&self) -> &[EdgeInfo] {
		&self.edges
	}

	pub fn node_radius(&self) -> f64 {
		self.options.nodes.radius()
	}

	/// Current graph-space position of every node.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	/// Run the layout ahead of the first frame when stabilization is enabled.
	pub fn stabilize(&mut self) {
		if !(self.options.physics.enabled && self.options.physics.stabilization) {
			return;
		}
		for _ in 0..self.options.physics.stabilization_iterations {
			self.graph.update(STABILIZATION_STEP);
		}
		debug!(
			"Stabilized after {} iterations",
			self.options.physics.stabilization_iterations
		);
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let hit_radius = self.node_radius() + HIT_SLOP;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// Hit radius is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Index into [`Self::edges`] of the closest edge under the pointer.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		self.edges
			.iter()
			.enumerate()
			.filter_map(|(i, edge)| {
				let &(x1, y1) = positions.get(&edge.source)?;
				let &(x2, y2) = positions.get(&edge.target)?;
				let dist = segment_distance(gx, gy, x1, y1, x2, y2);
				(dist < EDGE_HIT_DISTANCE).then_some((i, dist))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	fn node_id(&self, idx: DefaultNodeIdx) -> Option<EntityId> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	/// What a click at this canvas position selects. Nodes win over edges;
	/// a node selection carries its connected edges.
	pub fn selection_at(&self, sx: f64, sy: f64) -> Selection {
		if let Some(idx) = self.node_at_position(sx, sy) {
			return Selection {
				nodes: self.node_id(idx).into_iter().collect(),
				edges: self
					.edges
					.iter()
					.filter(|edge| edge.source == idx || edge.target == idx)
					.map(|edge| edge.id.clone())
					.collect(),
			};
		}
		match self.edge_at_position(sx, sy) {
			Some(i) => Selection {
				nodes: Vec::new(),
				edges: vec![self.edges[i].id.clone()],
			},
			None => Selection::default(),
		}
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		let grab = match self.node_at_position(x, y) {
			Some(idx) if self.options.interaction.drag_nodes => {
				let (mut node_start_x, mut node_start_y) = (0.0, 0.0);
				self.graph.visit_nodes(|node| {
					if node.index() == idx {
						node_start_x = node.x();
						node_start_y = node.y();
					}
				});
				Grab::Node {
					idx,
					node_start_x,
					node_start_y,
				}
			}
			_ => Grab::Background {
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			},
		};
		self.press = Some(PressState {
			start_x: x,
			start_y: y,
			grab,
			dragging: false,
		});
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		let Some(press) = self.press.as_mut() else {
			if self.options.interaction.hover {
				let hovered = self.node_at_position(x, y);
				self.set_hover(hovered);
			}
			return;
		};

		let (dx, dy) = (x - press.start_x, y - press.start_y);
		if !press.dragging {
			if (dx * dx + dy * dy).sqrt() < DRAG_THRESHOLD {
				return;
			}
			press.dragging = true;
			self.handlers.emit_drag_start();
		}

		match press.grab {
			Grab::Node {
				idx,
				node_start_x,
				node_start_y,
			} => {
				let (nx, ny) = (
					node_start_x + (dx / self.transform.k) as f32,
					node_start_y + (dy / self.transform.k) as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
			Grab::Background {
				transform_start_x,
				transform_start_y,
			} => {
				if self.options.interaction.drag_view {
					self.transform.x = transform_start_x + dx;
					self.transform.y = transform_start_y + dy;
				}
			}
		}
	}

	/// Ends the press. A press that never became a drag is a click and
	/// emits a selection at `page`.
	pub fn pointer_up(&mut self, x: f64, y: f64, page: PagePoint) {
		let Some(press) = self.press.take() else {
			return;
		};
		if press.dragging {
			return;
		}
		let selection = self.selection_at(x, y);
		self.handlers.emit_select(&selection, page);
	}

	pub fn pointer_leave(&mut self) {
		self.press = None;
		self.set_hover(None);
	}

	pub fn zoom(&mut self, x: f64, y: f64, delta_y: f64) {
		if !self.options.interaction.zoom_view {
			return;
		}
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		if self.options.physics.enabled {
			self.graph.update(dt);
		}
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, self.options.interaction.tooltip_delay_secs(), 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

impl GraphInteractionSource for NetworkState {
	fn on_select(&mut self, handler: SelectHandler) {
		self.handlers.on_select(handler);
	}

	fn on_drag_start(&mut self, handler: DragStartHandler) {
		self.handlers.on_drag_start(handler);
	}
}
