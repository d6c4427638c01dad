use std::sync::Arc;

use gloo_net::http::Request;
use log::{error, info, warn};

use super::error::DatasetError;
use super::types::GraphDataset;

/// Fetch and parse the dataset at `url`. Validation issues are logged, not fatal.
pub async fn load_dataset(url: &str) -> Result<GraphDataset, DatasetError> {
	let resp = Request::get(url).send().await?;
	if !resp.ok() {
		return Err(DatasetError::Http {
			status: resp.status(),
			status_text: resp.status_text(),
		});
	}

	let body = resp.text().await?;
	let dataset = GraphDataset::from_json(&body)?;
	for issue in dataset.validate() {
		warn!("{url}: {issue}");
	}
	info!(
		"Loaded {} nodes and {} edges from {url}",
		dataset.nodes.len(),
		dataset.edges.len()
	);
	Ok(dataset)
}

/// The single catch point for load failures. On error, logs one diagnostic
/// and yields nothing, so the view never initializes.
pub fn settle_load(result: Result<GraphDataset, DatasetError>) -> Option<Arc<GraphDataset>> {
	match result {
		Ok(dataset) => Some(Arc::new(dataset)),
		Err(err) => {
			error!("Error loading JSON: {err}");
			None
		}
	}
}
