//! Control panel: graph generation and editing, solver-backed analyses, and
//! layout settings. Every solver action captures the graph revision it was
//! issued against; a response for a superseded revision is dropped.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error};

use crate::graph::Graph;
use crate::layout::LayoutConfig;
use crate::overlay::{Annotations, CoverResult, Overlay};
use crate::solver::{DEFAULT_BASE_URL, SolverClient, SolverError};

fn apply_graph(
	graph: RwSignal<Graph>,
	revision: RwSignal<u64>,
	status: RwSignal<Option<String>>,
	taken: u64,
	result: Result<Graph, SolverError>,
) {
	match result {
		Ok(updated) if revision.get_untracked() == taken => {
			graph.set(updated);
			revision.update(|r| *r += 1);
			status.set(None);
		}
		Ok(_) => debug!("discarding stale graph response (revision {taken})"),
		Err(e) => {
			error!("solver request failed: {e}");
			status.set(Some(e.to_string()));
		}
	}
}

fn apply_overlay(
	annotations: RwSignal<Annotations>,
	revision: RwSignal<u64>,
	status: RwSignal<Option<String>>,
	taken: u64,
	result: Result<Overlay, SolverError>,
) {
	match result {
		Ok(overlay) if revision.get_untracked() == taken => {
			annotations.update(|a| a.set(overlay));
			status.set(None);
		}
		Ok(_) => debug!("discarding stale overlay response (revision {taken})"),
		Err(e) => {
			error!("solver request failed: {e}");
			status.set(Some(e.to_string()));
		}
	}
}

/// Fire a solver call that reshapes the graph itself.
fn reshape<F, Fut>(
	graph: RwSignal<Graph>,
	revision: RwSignal<u64>,
	status: RwSignal<Option<String>>,
	call: F,
) where
	F: FnOnce(SolverClient, Graph) -> Fut + 'static,
	Fut: Future<Output = Result<Graph, SolverError>> + 'static,
{
	let taken = revision.get_untracked();
	let current = graph.get_untracked();
	spawn_local(async move {
		let result = call(SolverClient::new(DEFAULT_BASE_URL), current).await;
		apply_graph(graph, revision, status, taken, result);
	});
}

/// Fire a solver call whose result becomes the active overlay.
fn analyze<F, Fut>(
	annotations: RwSignal<Annotations>,
	graph: RwSignal<Graph>,
	revision: RwSignal<u64>,
	status: RwSignal<Option<String>>,
	call: F,
) where
	F: FnOnce(SolverClient, Graph) -> Fut + 'static,
	Fut: Future<Output = Result<Overlay, SolverError>> + 'static,
{
	let taken = revision.get_untracked();
	let current = graph.get_untracked();
	spawn_local(async move {
		let result = call(SolverClient::new(DEFAULT_BASE_URL), current).await;
		apply_overlay(annotations, revision, status, taken, result);
	});
}

fn cover_overlay(depth: u32) -> impl FnOnce(Vec<u32>) -> Overlay {
	move |vertices| {
		Overlay::Cover(CoverResult {
			depth,
			vertices: vertices.into_iter().collect(),
		})
	}
}

/// Sidebar with graph, analysis, and layout controls.
#[component]
pub fn ControlPanel(
	graph: RwSignal<Graph>,
	revision: RwSignal<u64>,
	annotations: RwSignal<Annotations>,
	layout: RwSignal<LayoutConfig>,
) -> impl IntoView {
	let gen_vertices = RwSignal::new(10u32);
	let gen_probability = RwSignal::new(0.5f64);
	let k_param = RwSignal::new(-1i32);
	let status: RwSignal<Option<String>> = RwSignal::new(None);

	let add_vertex = move |_| {
		graph.update(|g| {
			let id = g.next_vertex_id();
			g.add_vertex(id);
		});
		revision.update(|r| *r += 1);
	};

	let reset = move |_| {
		graph.set(Graph::seed());
		revision.update(|r| *r += 1);
		annotations.update(|a| a.clear());
	};

	let generate = move |_| {
		let (n, p) = (gen_vertices.get_untracked(), gen_probability.get_untracked());
		reshape(graph, revision, status, move |c, _| async move {
			c.generate(n, p).await
		});
	};

	let generate_tree = move |_| {
		let (n, m) = (
			gen_vertices.get_untracked(),
			layout.get_untracked().max_children,
		);
		reshape(graph, revision, status, move |c, _| async move {
			c.generate_tree(n, m).await
		});
	};

	let run_cover = move |_| {
		let (k, depth) = (
			k_param.get_untracked(),
			annotations.get_untracked().search_depth(),
		);
		analyze(annotations, graph, revision, status, move |c, g| async move {
			c.vertex_cover(&g, k, depth).await.map(cover_overlay(depth))
		});
	};

	let run_cover_kernelized = move |_| {
		let (k, depth) = (
			k_param.get_untracked(),
			annotations.get_untracked().search_depth(),
		);
		analyze(annotations, graph, revision, status, move |c, g| async move {
			c.vertex_cover_kernelized(&g, k, depth)
				.await
				.map(cover_overlay(depth))
		});
	};

	let run_cover_approximation = move |_| {
		let (k, depth) = (
			k_param.get_untracked(),
			annotations.get_untracked().search_depth(),
		);
		analyze(annotations, graph, revision, status, move |c, g| async move {
			c.vertex_cover_approximation(&g, k, depth)
				.await
				.map(cover_overlay(depth))
		});
	};

	let run_tree_cover = move |_| {
		let (k, depth) = (
			k_param.get_untracked(),
			annotations.get_untracked().search_depth(),
		);
		analyze(annotations, graph, revision, status, move |c, g| async move {
			c.tree_cover(&g, k, depth).await.map(cover_overlay(depth))
		});
	};

	let run_kernelization = move |_| {
		let k = k_param.get_untracked();
		analyze(annotations, graph, revision, status, move |c, g| async move {
			c.kernelization(&g, k).await.map(Overlay::Kernel)
		});
	};

	let run_mst = move |_| {
		analyze(annotations, graph, revision, status, |c, g| async move {
			c.minimum_spanning_tree(&g).await.map(Overlay::EdgeSet)
		});
	};

	let run_tour = move |_| {
		analyze(annotations, graph, revision, status, |c, g| async move {
			c.christofides_tour(&g).await.map(Overlay::Tour)
		});
	};

	view! {
		<div class="control-panel">
			<h2>"Vertex Cover"</h2>

			<section>
				<h3>"Graph"</h3>
				<label>
					"Vertices"
					<input
						type="number"
						min="1"
						prop:value=move || gen_vertices.get().to_string()
						on:input=move |ev| {
							if let Ok(v) = event_target_value(&ev).parse() {
								gen_vertices.set(v);
							}
						}
					/>
				</label>
				<label>
					"Edge probability"
					<input
						type="number"
						min="0"
						max="1"
						step="0.05"
						prop:value=move || gen_probability.get().to_string()
						on:input=move |ev| {
							if let Ok(v) = event_target_value(&ev).parse::<f64>() {
								gen_probability.set(v.clamp(0.0, 1.0));
							}
						}
					/>
				</label>
				<button on:click=generate>"Generate"</button>
				<button on:click=generate_tree>"Generate tree"</button>
				<button on:click=add_vertex>"Add vertex"</button>
				<button on:click=reset>"Reset"</button>
			</section>

			<section>
				<h3>"Connectivity"</h3>
				<button on:click=move |_| {
					reshape(graph, revision, status, |c, g| async move {
						c.connect_random(&g).await
					})
				}>"Connect random"</button>
				<button on:click=move |_| {
					reshape(graph, revision, status, |c, g| async move {
						c.connect_two_sub(&g).await
					})
				}>"Connect two subgraphs"</button>
				<button on:click=move |_| {
					reshape(graph, revision, status, |c, g| async move {
						c.connect_all_sub(&g).await
					})
				}>"Connect all subgraphs"</button>
			</section>

			<section>
				<h3>"Kernel shaping"</h3>
				<button on:click=move |_| {
					reshape(graph, revision, status, |c, g| async move {
						c.increase_pendants(&g).await
					})
				}>"More pendants"</button>
				<button on:click=move |_| {
					reshape(graph, revision, status, |c, g| async move {
						c.decrease_pendants(&g).await
					})
				}>"Fewer pendants"</button>
				<button on:click=move |_| {
					let k = k_param.get_untracked();
					reshape(graph, revision, status, move |c, g| async move {
						c.increase_tops(&g, k).await
					})
				}>"More tops"</button>
				<button on:click=move |_| {
					let k = k_param.get_untracked();
					reshape(graph, revision, status, move |c, g| async move {
						c.decrease_tops(&g, k).await
					})
				}>"Fewer tops"</button>
				<button on:click=move |_| {
					reshape(graph, revision, status, |c, g| async move {
						c.increase_isolated(&g).await
					})
				}>"More isolated"</button>
				<button on:click=move |_| {
					reshape(graph, revision, status, |c, g| async move {
						c.decrease_isolated(&g).await
					})
				}>"Fewer isolated"</button>
			</section>

			<section>
				<h3>"Analyses"</h3>
				<label>
					"k (-1 for minimum)"
					<input
						type="number"
						prop:value=move || k_param.get().to_string()
						on:input=move |ev| {
							if let Ok(v) = event_target_value(&ev).parse() {
								k_param.set(v);
							}
						}
					/>
				</label>
				<label>
					"Search depth"
					<input
						type="number"
						min="1"
						prop:value=move || annotations.get().search_depth().to_string()
						on:input=move |ev| {
							if let Ok(v) = event_target_value(&ev).parse() {
								annotations.update(|a| a.set_search_depth(v));
							}
						}
					/>
				</label>
				<button on:click=run_cover>"Vertex cover"</button>
				<button on:click=run_cover_kernelized>"Kernelized cover"</button>
				<button on:click=run_cover_approximation>"Approximation cover"</button>
				<button on:click=run_tree_cover>"Tree cover"</button>
				<button on:click=run_kernelization>"Kernelization"</button>
				<button on:click=run_mst>"Minimum spanning tree"</button>
				<button on:click=run_tour>"Christofides tour"</button>
				<button on:click=move |_| annotations.update(|a| a.clear())>
					"Clear annotation"
				</button>
			</section>

			<section>
				<h3>"Layout"</h3>
				<label>
					<input
						type="checkbox"
						prop:checked=move || layout.get().is_tree
						on:change=move |ev| {
							layout.update(|l| l.is_tree = event_target_checked(&ev));
						}
					/>
					"Tree layout"
				</label>
				<label>
					"Max children"
					<input
						type="number"
						min="1"
						prop:value=move || layout.get().max_children.to_string()
						on:input=move |ev| {
							if let Ok(v) = event_target_value(&ev).parse::<u32>() {
								layout.update(|l| l.max_children = v.max(1));
							}
						}
					/>
				</label>
			</section>

			{move || {
				status
					.get()
					.map(|message| view! { <p class="control-panel__status">{message}</p> })
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::overlay::TourResult;

	#[test]
	fn stale_graph_responses_are_discarded() {
		let graph = RwSignal::new(Graph::seed());
		let revision = RwSignal::new(0u64);
		let status = RwSignal::new(None);

		// Request issued at revision 0; the graph was edited before the
		// response arrived.
		let taken = revision.get_untracked();
		revision.update(|r| *r += 1);

		let mut superseded = Graph::seed();
		superseded.add_vertex(2);
		apply_graph(graph, revision, status, taken, Ok(superseded));
		assert_eq!(graph.get_untracked(), Graph::seed());
		assert_eq!(revision.get_untracked(), 1);

		// A response for the current revision is applied and bumps it.
		let mut fresh = Graph::seed();
		fresh.add_vertex(3);
		apply_graph(graph, revision, status, 1, Ok(fresh.clone()));
		assert_eq!(graph.get_untracked(), fresh);
		assert_eq!(revision.get_untracked(), 2);
	}

	#[test]
	fn solver_failures_surface_in_status_and_leave_state_alone() {
		let annotations = RwSignal::new(Annotations::default());
		let revision = RwSignal::new(0u64);
		let status = RwSignal::new(None);

		apply_overlay(annotations, revision, status, 0, Err(SolverError::Status(500)));
		assert!(status.get_untracked().is_some());
		assert_eq!(annotations.get_untracked(), Annotations::default());

		apply_overlay(
			annotations,
			revision,
			status,
			0,
			Ok(Overlay::Tour(TourResult(vec![0, 1]))),
		);
		assert!(status.get_untracked().is_none());
		assert!(matches!(
			annotations.get_untracked().overlay(),
			Overlay::Tour(_)
		));
	}

	#[test]
	fn stale_overlay_responses_are_discarded() {
		let annotations = RwSignal::new(Annotations::default());
		let revision = RwSignal::new(3u64);
		let status = RwSignal::new(None);

		apply_overlay(
			annotations,
			revision,
			status,
			2,
			Ok(Overlay::Tour(TourResult(vec![0, 1]))),
		);
		assert_eq!(annotations.get_untracked(), Annotations::default());
	}
}
