use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::network::NetworkView;
use crate::dataset::{GraphDataset, load_dataset, settle_load};

/// Served next to the application bundle.
const DATASET_URL: &str = "AQgraph.json";

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (dataset, set_dataset) = signal(None::<Arc<GraphDataset>>);

	spawn_local(async move {
		if let Some(loaded) = settle_load(load_dataset(DATASET_URL).await) {
			set_dataset.set(Some(loaded));
		}
	});

	view! {
		<div class="fullscreen-graph">
			<NetworkView dataset=dataset fullscreen=true />
			<div class="graph-overlay">
				<h1>"Knowledge Graph"</h1>
				<p class="subtitle">"Click a node or edge to inspect it. Drag to move nodes or pan. Scroll to zoom."</p>
			</div>
		</div>
	}
}
