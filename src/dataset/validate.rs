use std::collections::HashSet;
use std::fmt;

use super::error::Collection;
use super::types::{EntityId, GraphDataset};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	From,
	To,
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::From => "from",
			Self::To => "to",
		})
	}
}

/// A structural problem in a dataset that still loads.
#[derive(Clone, Debug, PartialEq)]
pub enum DatasetIssue {
	/// Not an object or no `id`; the entry is left out of the dataset.
	SkippedEntry {
		collection: Collection,
		index: usize,
		reason: &'static str,
	},
	/// Only the first entry with this id is reachable by lookup.
	DuplicateId {
		collection: Collection,
		id: EntityId,
	},
	/// The edge is not drawn.
	MissingEndpoint { edge: EntityId, end: Endpoint },
	/// The edge is not drawn.
	UnknownNode {
		edge: EntityId,
		end: Endpoint,
		node: EntityId,
	},
}

impl fmt::Display for DatasetIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::SkippedEntry {
				collection,
				index,
				reason,
			} => write!(f, "skipped {collection}[{index}]: {reason}"),
			Self::DuplicateId { collection, id } => {
				write!(f, "duplicate id {id} in {collection}")
			}
			Self::MissingEndpoint { edge, end } => {
				write!(f, "edge {edge} has no `{end}` node")
			}
			Self::UnknownNode { edge, end, node } => {
				write!(f, "edge {edge} `{end}` references unknown node {node}")
			}
		}
	}
}

impl GraphDataset {
	/// Report skipped entries, duplicate ids and edges whose endpoints are
	/// not defined nodes.
	pub fn validate(&self) -> Vec<DatasetIssue> {
		let mut issues = self.skipped.clone();

		let mut node_ids = HashSet::new();
		for node in &self.nodes {
			if !node_ids.insert(&node.id) {
				issues.push(DatasetIssue::DuplicateId {
					collection: Collection::Nodes,
					id: node.id.clone(),
				});
			}
		}

		let mut edge_ids = HashSet::new();
		for edge in &self.edges {
			if !edge_ids.insert(&edge.id) {
				issues.push(DatasetIssue::DuplicateId {
					collection: Collection::Edges,
					id: edge.id.clone(),
				});
			}
			for (end, node) in [(Endpoint::From, &edge.from), (Endpoint::To, &edge.to)] {
				match node {
					None => issues.push(DatasetIssue::MissingEndpoint {
						edge: edge.id.clone(),
						end,
					}),
					Some(node) if !node_ids.contains(node) => {
						issues.push(DatasetIssue::UnknownNode {
							edge: edge.id.clone(),
							end,
							node: node.clone(),
						})
					}
					Some(_) => {}
				}
			}
		}

		issues
	}
}
