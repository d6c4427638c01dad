use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::{RwSignal, Set};
use log::warn;

use crate::components::network::{GraphInteractionSource, PagePoint, Selection};
use crate::dataset::{EntityId, GraphDataset, Record};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
	Node,
	Edge,
}

/// The record on display and where it is anchored.
#[derive(Clone, Debug, PartialEq)]
pub struct Inspection {
	pub kind: EntityKind,
	pub record: Record,
	pub position: PagePoint,
}

impl Inspection {
	pub fn heading(&self) -> &'static str {
		match self.kind {
			EntityKind::Node => "Node Information",
			EntityKind::Edge => "Edge Information",
		}
	}

	/// The record as pretty-printed JSON.
	pub fn body(&self) -> String {
		serde_json::to_string_pretty(&self.record).unwrap_or_default()
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum OverlayState {
	#[default]
	Hidden,
	Visible(Inspection),
}

impl OverlayState {
	pub fn inspection(&self) -> Option<&Inspection> {
		match self {
			Self::Hidden => None,
			Self::Visible(inspection) => Some(inspection),
		}
	}
}

/// Where the controller publishes every overlay change.
pub trait OverlayView {
	fn show(&mut self, state: &OverlayState);
}

impl OverlayView for RwSignal<OverlayState> {
	fn show(&mut self, state: &OverlayState) {
		self.set(state.clone());
	}
}

/// Owns the single overlay slot for one loaded dataset.
pub struct InspectionOverlay<V> {
	dataset: Arc<GraphDataset>,
	state: OverlayState,
	view: V,
}

impl<V: OverlayView> InspectionOverlay<V> {
	pub fn new(dataset: Arc<GraphDataset>, mut view: V) -> Self {
		let state = OverlayState::Hidden;
		view.show(&state);
		Self {
			dataset,
			state,
			view,
		}
	}

	pub fn state(&self) -> &OverlayState {
		&self.state
	}

	/// Show the first selected node, else the first selected edge, else hide.
	pub fn on_select(&mut self, selection: &Selection, pointer: PagePoint) {
		let next = if let Some(id) = selection.nodes.first() {
			let record = self.dataset.node(id).map(|node| &node.record);
			inspect(EntityKind::Node, id, record, pointer)
		} else if let Some(id) = selection.edges.first() {
			let record = self.dataset.edge(id).map(|edge| &edge.record);
			inspect(EntityKind::Edge, id, record, pointer)
		} else {
			OverlayState::Hidden
		};
		self.publish(next);
	}

	pub fn on_drag_start(&mut self) {
		self.publish(OverlayState::Hidden);
	}

	fn publish(&mut self, state: OverlayState) {
		self.state = state;
		self.view.show(&self.state);
	}
}

fn inspect(
	kind: EntityKind,
	id: &EntityId,
	record: Option<&Record>,
	position: PagePoint,
) -> OverlayState {
	match record {
		Some(record) => OverlayState::Visible(Inspection {
			kind,
			record: record.clone(),
			position,
		}),
		None => {
			warn!("Clicked {kind:?} {id} is not in the dataset");
			OverlayState::Hidden
		}
	}
}

/// Route `source`'s click and drag-start events into `overlay`.
pub fn attach<V, S>(overlay: &Rc<RefCell<InspectionOverlay<V>>>, source: &mut S)
where
	V: OverlayView + 'static,
	S: GraphInteractionSource + ?Sized,
{
	let on_select = Rc::clone(overlay);
	source.on_select(Box::new(move |selection: &Selection, pointer: PagePoint| {
		on_select.borrow_mut().on_select(selection, pointer);
	}));
	let on_drag_start = Rc::clone(overlay);
	source.on_drag_start(Box::new(move || on_drag_start.borrow_mut().on_drag_start()));
}

#[cfg(test)]
mod tests {
	use serde_json::{Value, json};

	use super::*;
	use crate::components::network::{DragStartHandler, SelectHandler};

	/// Keeps every published state.
	#[derive(Clone, Default)]
	struct Recorder(Rc<RefCell<Vec<OverlayState>>>);

	impl OverlayView for Recorder {
		fn show(&mut self, state: &OverlayState) {
			self.0.borrow_mut().push(state.clone());
		}
	}

	/// Event source driven by hand.
	#[derive(Default)]
	struct FakeSource {
		select: Vec<SelectHandler>,
		drag_start: Vec<DragStartHandler>,
	}

	impl FakeSource {
		fn click(&mut self, selection: &Selection, pointer: PagePoint) {
			self.select.iter_mut().for_each(|handler| handler(selection, pointer));
		}

		fn drag(&mut self) {
			self.drag_start.iter_mut().for_each(|handler| handler());
		}
	}

	impl GraphInteractionSource for FakeSource {
		fn on_select(&mut self, handler: SelectHandler) {
			self.select.push(handler);
		}

		fn on_drag_start(&mut self, handler: DragStartHandler) {
			self.drag_start.push(handler);
		}
	}

	fn dataset(value: Value) -> Arc<GraphDataset> {
		Arc::new(GraphDataset::from_json(&value.to_string()).unwrap())
	}

	fn alice() -> Arc<GraphDataset> {
		dataset(json!({"nodes": [{"id": "A", "label": "Alice"}], "edges": []}))
	}

	fn select(nodes: &[&str], edges: &[&str]) -> Selection {
		Selection {
			nodes: nodes.iter().map(|&id| id.into()).collect(),
			edges: edges.iter().map(|&id| id.into()).collect(),
		}
	}

	const AT: PagePoint = PagePoint { x: 100.0, y: 50.0 };

	#[test]
	fn node_click_shows_its_record_at_pointer() {
		let mut overlay = InspectionOverlay::new(alice(), Recorder::default());
		overlay.on_select(&select(&["A"], &[]), AT);

		let inspection = overlay.state().inspection().unwrap();
		assert_eq!(inspection.kind, EntityKind::Node);
		assert_eq!(inspection.position, AT);
		assert_eq!(inspection.heading(), "Node Information");
		assert!(inspection.body().contains(r#""label": "Alice""#));
		assert_eq!(
			Value::Object(inspection.record.clone()),
			json!({"id": "A", "label": "Alice"})
		);
	}

	#[test]
	fn empty_click_hides() {
		let mut overlay = InspectionOverlay::new(alice(), Recorder::default());
		overlay.on_select(&select(&["A"], &[]), AT);
		overlay.on_select(&Selection::default(), AT);
		assert_eq!(*overlay.state(), OverlayState::Hidden);

		overlay.on_select(&Selection::default(), AT);
		assert_eq!(*overlay.state(), OverlayState::Hidden);
	}

	#[test]
	fn every_node_round_trips() {
		let data = dataset(json!({
			"nodes": [
				{"id": 1, "label": "PM10", "group": "pollutant"},
				{"id": "road", "label": "Road traffic", "weights": [1, 2, 3]},
				{"id": 3, "nested": {"a": {"b": null}}}
			],
			"edges": []
		}));
		let mut overlay = InspectionOverlay::new(data.clone(), Recorder::default());

		for node in &data.nodes {
			let selection = Selection {
				nodes: vec![node.id.clone()],
				edges: vec![],
			};
			overlay.on_select(&selection, AT);
			let inspection = overlay.state().inspection().unwrap();
			assert_eq!(inspection.record, node.record);
			let shown: Value = serde_json::from_str(&inspection.body()).unwrap();
			assert_eq!(shown, Value::Object(node.record.clone()));
		}
	}

	#[test]
	fn float_id_node_opens_on_integer_click() {
		let data = dataset(json!({
			"nodes": [{"id": 1.0, "label": "PM2.5"}, {"id": "road"}],
			"edges": [{"id": "e", "from": "road", "to": 1}]
		}));
		let mut overlay = InspectionOverlay::new(data, Recorder::default());
		let selection = Selection {
			nodes: vec![EntityId::Int(1)],
			edges: vec![],
		};
		overlay.on_select(&selection, AT);

		let inspection = overlay.state().inspection().unwrap();
		assert_eq!(inspection.record.get("label"), Some(&json!("PM2.5")));
	}

	#[test]
	fn edge_click_shows_edge_not_node_with_same_id() {
		let data = dataset(json!({
			"nodes": [{"id": "x", "kind": "node"}, {"id": "y"}],
			"edges": [{"id": "x", "from": "x", "to": "y", "kind": "edge"}]
		}));
		let mut overlay = InspectionOverlay::new(data, Recorder::default());
		overlay.on_select(&select(&[], &["x"]), AT);

		let inspection = overlay.state().inspection().unwrap();
		assert_eq!(inspection.kind, EntityKind::Edge);
		assert_eq!(inspection.heading(), "Edge Information");
		assert_eq!(inspection.record.get("kind"), Some(&json!("edge")));
	}

	#[test]
	fn nodes_take_priority_over_edges() {
		let data = dataset(json!({
			"nodes": [{"id": "A"}, {"id": "B"}],
			"edges": [{"id": "e", "from": "A", "to": "B"}]
		}));
		let mut overlay = InspectionOverlay::new(data, Recorder::default());
		overlay.on_select(&select(&["B", "A"], &["e"]), AT);

		let inspection = overlay.state().inspection().unwrap();
		assert_eq!(inspection.kind, EntityKind::Node);
		assert_eq!(inspection.record.get("id"), Some(&json!("B")));
	}

	#[test]
	fn drag_start_always_hides() {
		let mut overlay = InspectionOverlay::new(alice(), Recorder::default());
		overlay.on_drag_start();
		assert_eq!(*overlay.state(), OverlayState::Hidden);

		overlay.on_select(&select(&["A"], &[]), AT);
		overlay.on_drag_start();
		assert_eq!(*overlay.state(), OverlayState::Hidden);
	}

	#[test]
	fn unknown_id_hides_instead_of_showing_stale_record() {
		let mut overlay = InspectionOverlay::new(alice(), Recorder::default());
		overlay.on_select(&select(&["A"], &[]), AT);
		overlay.on_select(&select(&["nobody"], &[]), AT);
		assert_eq!(*overlay.state(), OverlayState::Hidden);
	}

	#[test]
	fn latest_click_replaces_previous() {
		let data = dataset(json!({"nodes": [{"id": "A"}, {"id": "B"}], "edges": []}));
		let mut overlay = InspectionOverlay::new(data, Recorder::default());
		overlay.on_select(&select(&["A"], &[]), AT);
		let elsewhere = PagePoint { x: 7.0, y: 9.0 };
		overlay.on_select(&select(&["B"], &[]), elsewhere);

		let inspection = overlay.state().inspection().unwrap();
		assert_eq!(inspection.record.get("id"), Some(&json!("B")));
		assert_eq!(inspection.position, elsewhere);
	}

	#[test]
	fn view_sees_every_transition() {
		let recorder = Recorder::default();
		let mut overlay = InspectionOverlay::new(alice(), recorder.clone());
		overlay.on_select(&select(&["A"], &[]), AT);
		overlay.on_drag_start();

		let published = recorder.0.borrow();
		assert_eq!(published.len(), 3);
		assert_eq!(published[0], OverlayState::Hidden);
		assert!(matches!(published[1], OverlayState::Visible(_)));
		assert_eq!(published[2], OverlayState::Hidden);
	}

	#[test]
	fn attached_overlay_follows_event_source() {
		let overlay = Rc::new(RefCell::new(InspectionOverlay::new(
			alice(),
			Recorder::default(),
		)));
		let mut source = FakeSource::default();
		attach(&overlay, &mut source);

		source.click(&select(&["A"], &[]), AT);
		assert!(overlay.borrow().state().inspection().is_some());

		source.drag();
		assert_eq!(*overlay.borrow().state(), OverlayState::Hidden);

		source.click(&select(&["A"], &[]), AT);
		source.click(&select(&[], &[]), AT);
		assert_eq!(*overlay.borrow().state(), OverlayState::Hidden);
	}
}
