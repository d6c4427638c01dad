use leptos::prelude::*;

use super::controller::{Inspection, OverlayState};

const PANEL_STYLE: &str = "position: absolute; background-color: #f0f0f0; \
	border: 1px solid #ddd; padding: 10px; border-radius: 5px; z-index: 10; \
	pointer-events: none;";

fn panel_style(state: &OverlayState) -> String {
	match state {
		OverlayState::Hidden => format!("{PANEL_STYLE} display: none;"),
		OverlayState::Visible(inspection) => format!(
			"{PANEL_STYLE} left: {}px; top: {}px; display: block;",
			inspection.position.x, inspection.position.y
		),
	}
}

/// Floating box describing the inspected entity. Content is inserted as text.
/// The panel never takes the pointer, so the canvas under it keeps its hover
/// and click handling.
#[component]
pub fn InspectionPanel(#[prop(into)] state: Signal<OverlayState>) -> impl IntoView {
	let style = move || state.with(panel_style);
	let heading = move || state.with(|s| s.inspection().map(Inspection::heading));
	let body = move || state.with(|s| s.inspection().map(Inspection::body));

	view! {
		<div class="inspection-panel" style=style>
			<strong>{heading}</strong>
			<pre>{body}</pre>
		</div>
	}
}
