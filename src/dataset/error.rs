use std::fmt;

use thiserror::Error;

/// Which top-level array of the document an entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
	Nodes,
	Edges,
}

impl fmt::Display for Collection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Nodes => "nodes",
			Self::Edges => "edges",
		})
	}
}

/// Failure to obtain a usable dataset at startup.
#[derive(Debug, Error)]
pub enum DatasetError {
	#[error("network error: {0}")]
	Network(#[from] gloo_net::Error),

	#[error("HTTP {status}: {status_text}")]
	Http { status: u16, status_text: String },

	#[error("JSON parse error: {0}")]
	Parse(#[from] serde_json::Error),
}
