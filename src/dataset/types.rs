use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{Collection, DatasetError};
use super::validate::DatasetIssue;

/// An open attribute record, kept exactly as it appeared in the document.
pub type Record = Map<String, Value>;

/// Identity of a node or edge. Numbers compare by value (`1.0` is `1`),
/// but numbers and strings never compare equal, so `1` and `"1"` name
/// different entities.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
	Int(i64),
	/// Integers above `i64::MAX`.
	UInt(u64),
	Text(String),
	/// Any other JSON value, keyed by its serialized text.
	Raw(String),
}

impl EntityId {
	/// `None` only for `null`.
	pub(crate) fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Null => None,
			Value::String(s) => Some(Self::Text(s.clone())),
			Value::Number(n) => Some(Self::from_number(n)),
			other => Some(Self::Raw(other.to_string())),
		}
	}

	fn from_number(n: &serde_json::Number) -> Self {
		if let Some(i) = n.as_i64() {
			return Self::Int(i);
		}
		if let Some(u) = n.as_u64() {
			return Self::UInt(u);
		}
		match n.as_f64() {
			Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
				Self::Int(f as i64)
			}
			_ => Self::Raw(n.to_string()),
		}
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(n) => write!(f, "{n}"),
			Self::UInt(n) => write!(f, "{n}"),
			Self::Text(s) => write!(f, "{s:?}"),
			Self::Raw(s) => f.write_str(s),
		}
	}
}

impl From<&str> for EntityId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<i64> for EntityId {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: EntityId,
	pub record: Record,
}

impl Node {
	pub fn label(&self) -> Option<&str> {
		self.record.get("label").and_then(Value::as_str)
	}

	pub fn color(&self) -> Option<&str> {
		self.record.get("color").and_then(Value::as_str)
	}

	pub fn group(&self) -> Option<&Value> {
		self.record.get("group")
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: EntityId,
	/// `None` when the record has no usable `from`.
	pub from: Option<EntityId>,
	/// `None` when the record has no usable `to`.
	pub to: Option<EntityId>,
	pub record: Record,
}

impl Edge {
	pub fn label(&self) -> Option<&str> {
		self.record.get("label").and_then(Value::as_str)
	}
}

/// The whole document, immutable once loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphDataset {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	/// Entries left out at parse time; reported by `validate`.
	pub(crate) skipped: Vec<DatasetIssue>,
}

#[derive(Deserialize)]
struct RawDataset {
	#[serde(default)]
	nodes: Vec<Value>,
	#[serde(default)]
	edges: Vec<Value>,
}

impl GraphDataset {
	/// Parse a `{ "nodes": [...], "edges": [...] }` document.
	///
	/// Only a malformed document fails. Entries that are not objects or carry
	/// no `id` are skipped and reported by [`GraphDataset::validate`]; every
	/// other attribute is carried through untouched.
	pub fn from_json(text: &str) -> Result<Self, DatasetError> {
		let raw: RawDataset = serde_json::from_str(text)?;
		let mut skipped = Vec::new();

		let nodes = raw
			.nodes
			.into_iter()
			.enumerate()
			.filter_map(|(index, value)| split_record(Collection::Nodes, index, value, &mut skipped))
			.map(|(id, record)| Node { id, record })
			.collect();

		let edges = raw
			.edges
			.into_iter()
			.enumerate()
			.filter_map(|(index, value)| split_record(Collection::Edges, index, value, &mut skipped))
			.map(|(id, record)| {
				let from = record.get("from").and_then(EntityId::from_value);
				let to = record.get("to").and_then(EntityId::from_value);
				Edge {
					id,
					from,
					to,
					record,
				}
			})
			.collect();

		Ok(Self {
			nodes,
			edges,
			skipped,
		})
	}

	/// First node in document order with this id.
	pub fn node(&self, id: &EntityId) -> Option<&Node> {
		self.nodes.iter().find(|node| node.id == *id)
	}

	/// First edge in document order with this id.
	pub fn edge(&self, id: &EntityId) -> Option<&Edge> {
		self.edges.iter().find(|edge| edge.id == *id)
	}
}

fn split_record(
	collection: Collection,
	index: usize,
	value: Value,
	skipped: &mut Vec<DatasetIssue>,
) -> Option<(EntityId, Record)> {
	let mut skip = |reason| {
		skipped.push(DatasetIssue::SkippedEntry {
			collection,
			index,
			reason,
		});
		None
	};
	let Value::Object(record) = value else {
		return skip("entry is not an object");
	};
	match record.get("id").and_then(EntityId::from_value) {
		Some(id) => Some((id, record)),
		None => skip("missing `id`"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn parse(value: Value) -> Result<GraphDataset, DatasetError> {
		GraphDataset::from_json(&value.to_string())
	}

	#[test]
	fn keeps_full_records() {
		let dataset = parse(json!({
			"nodes": [
				{"id": "NO2", "label": "Nitrogen dioxide", "group": "pollutant", "extra": {"ppb": 40}},
				{"id": 7, "label": "Traffic"}
			],
			"edges": [
				{"id": "e1", "from": 7, "to": "NO2", "label": "emits", "weight": 0.5}
			]
		}))
		.unwrap();

		assert_eq!(dataset.nodes.len(), 2);
		let no2 = dataset.node(&"NO2".into()).unwrap();
		assert_eq!(
			Value::Object(no2.record.clone()),
			json!({"id": "NO2", "label": "Nitrogen dioxide", "group": "pollutant", "extra": {"ppb": 40}})
		);
		assert_eq!(no2.label(), Some("Nitrogen dioxide"));

		let edge = dataset.edge(&"e1".into()).unwrap();
		assert_eq!(edge.from, Some(EntityId::Int(7)));
		assert_eq!(edge.to, Some(EntityId::Text("NO2".into())));
		assert_eq!(edge.record.get("weight"), Some(&json!(0.5)));
	}

	#[test]
	fn integer_and_string_ids_are_distinct() {
		let dataset = parse(json!({"nodes": [{"id": 1, "label": "int"}, {"id": "1", "label": "text"}]})).unwrap();

		assert_eq!(dataset.node(&EntityId::Int(1)).unwrap().label(), Some("int"));
		assert_eq!(dataset.node(&"1".into()).unwrap().label(), Some("text"));
	}

	#[test]
	fn lookup_returns_first_match() {
		let dataset = parse(json!({"nodes": [{"id": "A", "n": 1}, {"id": "A", "n": 2}]})).unwrap();

		assert_eq!(dataset.node(&"A".into()).unwrap().record.get("n"), Some(&json!(1)));
		assert!(dataset.node(&"B".into()).is_none());
	}

	#[test]
	fn missing_collections_default_to_empty() {
		let dataset = parse(json!({})).unwrap();
		assert!(dataset.nodes.is_empty());
		assert!(dataset.edges.is_empty());
	}

	#[test]
	fn edge_endpoints_are_optional() {
		let dataset = parse(json!({"edges": [{"id": "e", "from": null}]})).unwrap();
		assert_eq!(dataset.edges[0].from, None);
		assert_eq!(dataset.edges[0].to, None);
	}

	#[test]
	fn integral_float_ids_match_integers() {
		let dataset = parse(json!({
			"nodes": [{"id": "A"}, {"id": 1.0, "label": "one"}],
			"edges": [{"id": 2.0, "from": 1, "to": "A"}]
		}))
		.unwrap();

		assert_eq!(dataset.node(&EntityId::Int(1)).unwrap().label(), Some("one"));
		assert_eq!(dataset.edge(&EntityId::Int(2)).unwrap().from, Some(EntityId::Int(1)));
		assert!(dataset.validate().is_empty());
	}

	#[test]
	fn unusual_ids_keep_their_entries() {
		let dataset = parse(json!({
			"nodes": [
				{"id": 18446744073709551615u64, "label": "big"},
				{"id": 1.5, "label": "fraction"},
				{"id": true, "label": "flag"}
			]
		}))
		.unwrap();

		assert_eq!(dataset.nodes.len(), 3);
		assert_eq!(dataset.nodes[0].id, EntityId::UInt(u64::MAX));
		assert_eq!(dataset.nodes[1].id, EntityId::Raw("1.5".into()));
		assert_eq!(dataset.nodes[2].id, EntityId::Raw("true".into()));
		assert_eq!(
			dataset.node(&EntityId::Raw("true".into())).unwrap().label(),
			Some("flag")
		);
		assert!(dataset.node(&"true".into()).is_none());
	}

	#[test]
	fn entries_without_id_are_skipped_not_fatal() {
		let dataset = parse(json!({
			"nodes": [{"id": "A"}, {"label": "no id"}, "B", {"id": null}],
			"edges": [{"from": "A", "to": "A"}]
		}))
		.unwrap();

		assert_eq!(dataset.nodes.len(), 1);
		assert!(dataset.edges.is_empty());
		assert_eq!(
			dataset.skipped,
			vec![
				DatasetIssue::SkippedEntry {
					collection: Collection::Nodes,
					index: 1,
					reason: "missing `id`",
				},
				DatasetIssue::SkippedEntry {
					collection: Collection::Nodes,
					index: 2,
					reason: "entry is not an object",
				},
				DatasetIssue::SkippedEntry {
					collection: Collection::Nodes,
					index: 3,
					reason: "missing `id`",
				},
				DatasetIssue::SkippedEntry {
					collection: Collection::Edges,
					index: 0,
					reason: "missing `id`",
				},
			]
		);
	}

	#[test]
	fn rejects_malformed_json() {
		let err = GraphDataset::from_json("{\"nodes\": [").unwrap_err();
		assert!(matches!(err, DatasetError::Parse(_)));
	}
}
