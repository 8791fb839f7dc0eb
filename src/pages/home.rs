use leptos::prelude::*;

use crate::components::controls::ControlPanel;
use crate::components::graph_canvas::GraphCanvas;
use crate::graph::Graph;
use crate::layout::LayoutConfig;
use crate::overlay::Annotations;
use crate::view_model::{project, surface_options};

/// The workspace: graph store and annotation signals feeding the projector,
/// with the canvas and control panel side by side.
#[component]
pub fn Home() -> impl IntoView {
	let graph = RwSignal::new(Graph::seed());
	let revision = RwSignal::new(0u64);
	let annotations = RwSignal::new(Annotations::default());
	let layout = RwSignal::new(LayoutConfig::default());

	let rendered = Signal::derive(move || {
		let annotations = annotations.get();
		project(&graph.get(), annotations.overlay())
	});
	let options = Signal::derive(move || surface_options(annotations.get().overlay()));

	// Clicking a node edits the pending cover selection.
	let on_node_click = Callback::new(move |id| {
		annotations.update(|a| a.toggle_cover_vertex(id));
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="workspace">
				<ControlPanel graph=graph revision=revision annotations=annotations layout=layout />
				<div class="workspace__graph-area">
					<GraphCanvas
						graph=rendered
						options=options
						layout=layout
						on_node_click=on_node_click
					/>
				</div>
			</div>
		</ErrorBoundary>
	}
}
