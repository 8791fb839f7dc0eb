//! Projection of `(Graph, Overlay)` into the shape the rendering surface
//! consumes. Pure; the canvas component never inspects overlays itself.

use crate::graph::{Graph, VertexId};
use crate::overlay::Overlay;

/// Visual role of a node under the active overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
	Plain,
	Selected,
	Isolated,
	Pendant,
	Top,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderNode {
	pub id: VertexId,
	pub role: NodeRole,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderLink {
	pub source: VertexId,
	pub target: VertexId,
	pub selected: bool,
	pub label: Option<String>,
}

/// Role/label-annotated graph handed to the rendering surface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderGraph {
	pub nodes: Vec<RenderNode>,
	pub links: Vec<RenderLink>,
}

/// Rendering-surface configuration derived from the active overlay.
///
/// A tour implies a meaningful sequential presentation, so it switches the
/// surface to static-with-drag-and-drop instead of free simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceOptions {
	pub directed: bool,
	pub static_graph: bool,
	pub static_with_drag_and_drop: bool,
	pub min_zoom: f64,
	pub max_zoom: f64,
	pub render_edge_labels: bool,
}

pub fn surface_options(overlay: &Overlay) -> SurfaceOptions {
	let tour = matches!(overlay, Overlay::Tour(_));
	SurfaceOptions {
		directed: tour,
		static_graph: false,
		static_with_drag_and_drop: tour,
		min_zoom: 0.5,
		max_zoom: 8.0,
		render_edge_labels: true,
	}
}

/// Map the graph and the active overlay to a renderable graph. Exactly one
/// branch applies per call; with no overlay active everything renders plain.
pub fn project(graph: &Graph, overlay: &Overlay) -> RenderGraph {
	let nodes = graph
		.vertices()
		.map(|id| RenderNode {
			id,
			role: role_for(id, overlay),
		})
		.collect();

	let links = match overlay {
		// Tour links are exactly the consecutive pairs, labelled by step.
		// A tour may shortcut across pairs that are not graph edges.
		Overlay::Tour(tour) => tour
			.0
			.windows(2)
			.enumerate()
			.map(|(step, pair)| RenderLink {
				source: pair[0],
				target: pair[1],
				selected: true,
				label: Some((step + 1).to_string()),
			})
			.collect(),
		Overlay::EdgeSet(set) => graph
			.edges()
			.into_iter()
			.map(|(u, v)| {
				let position = set
					.0
					.iter()
					.position(|&(a, b)| (a, b) == (u, v) || (b, a) == (u, v));
				RenderLink {
					source: u,
					target: v,
					selected: position.is_some(),
					label: position.map(|i| (i + 1).to_string()),
				}
			})
			.collect(),
		_ => graph
			.edges()
			.into_iter()
			.map(|(u, v)| RenderLink {
				source: u,
				target: v,
				selected: false,
				label: None,
			})
			.collect(),
	};

	RenderGraph { nodes, links }
}

fn role_for(id: VertexId, overlay: &Overlay) -> NodeRole {
	match overlay {
		Overlay::Cover(cover) if cover.vertices.contains(&id) => NodeRole::Selected,
		Overlay::Kernel(kernel) => {
			if kernel.isolated.contains(&id) {
				NodeRole::Isolated
			} else if kernel.pendant.contains(&id) {
				NodeRole::Pendant
			} else if kernel.tops.contains(&id) {
				NodeRole::Top
			} else {
				NodeRole::Plain
			}
		}
		_ => NodeRole::Plain,
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;
	use crate::overlay::{Annotations, CoverResult, EdgeSetResult, KernelResult, TourResult};

	fn triangle() -> Graph {
		let mut graph = Graph::seed();
		graph.add_vertex(2);
		graph.add_edge(1, 2);
		graph.add_edge(0, 2);
		graph
	}

	#[test]
	fn no_overlay_renders_everything_plain() {
		let rendered = project(&triangle(), &Overlay::None);
		assert!(rendered.nodes.iter().all(|n| n.role == NodeRole::Plain));
		assert!(rendered.links.iter().all(|l| !l.selected && l.label.is_none()));
		assert_eq!(rendered.links.len(), 3);
	}

	#[test]
	fn cover_marks_member_vertices_selected() {
		let overlay = Overlay::Cover(CoverResult {
			depth: 1,
			vertices: BTreeSet::from([1]),
		});
		let rendered = project(&triangle(), &overlay);
		let roles: Vec<_> = rendered.nodes.iter().map(|n| (n.id, n.role)).collect();
		assert_eq!(roles, vec![
			(0, NodeRole::Plain),
			(1, NodeRole::Selected),
			(2, NodeRole::Plain),
		]);
		assert!(rendered.links.iter().all(|l| !l.selected));
	}

	#[test]
	fn kernel_tags_each_role_distinctly() {
		let mut graph = triangle();
		graph.add_vertex(3);
		let overlay = Overlay::Kernel(KernelResult {
			isolated: BTreeSet::from([3]),
			pendant: BTreeSet::from([0]),
			tops: BTreeSet::from([2]),
		});
		let rendered = project(&graph, &overlay);
		let roles: Vec<_> = rendered.nodes.iter().map(|n| n.role).collect();
		assert_eq!(roles, vec![
			NodeRole::Pendant,
			NodeRole::Plain,
			NodeRole::Top,
			NodeRole::Isolated,
		]);
	}

	#[test]
	fn edge_set_selects_and_numbers_member_edges_either_orientation() {
		let overlay = Overlay::EdgeSet(EdgeSetResult(vec![(2, 1)]));
		let rendered = project(&triangle(), &overlay);
		assert_eq!(rendered.links.len(), 3);
		let selected: Vec<_> = rendered.links.iter().filter(|l| l.selected).collect();
		assert_eq!(selected.len(), 1);
		assert_eq!((selected[0].source, selected[0].target), (1, 2));
		assert_eq!(selected[0].label.as_deref(), Some("1"));
	}

	#[test]
	fn tour_renders_only_step_labelled_pairs() {
		let overlay = Overlay::Tour(TourResult(vec![2, 0, 1]));
		let rendered = project(&triangle(), &overlay);
		let links: Vec<_> = rendered
			.links
			.iter()
			.map(|l| (l.source, l.target, l.label.clone()))
			.collect();
		assert_eq!(links, vec![
			(2, 0, Some("1".into())),
			(0, 1, Some("2".into())),
		]);
		assert!(surface_options(&overlay).directed);
	}

	#[test]
	fn surface_options_only_differ_for_tours() {
		for overlay in [
			Overlay::None,
			Overlay::Cover(CoverResult {
				depth: 1,
				vertices: BTreeSet::from([0]),
			}),
			Overlay::EdgeSet(EdgeSetResult(vec![(0, 1)])),
		] {
			let options = surface_options(&overlay);
			assert!(!options.directed);
			assert!(!options.static_graph);
			assert!(!options.static_with_drag_and_drop);
			assert_eq!((options.min_zoom, options.max_zoom), (0.5, 8.0));
		}
		let options = surface_options(&Overlay::Tour(TourResult(vec![0, 1])));
		assert!(options.directed && options.static_with_drag_and_drop);
		assert!(!options.static_graph);
	}

	// Edge set on the seed graph, then a tour replacing it.
	#[test]
	fn edge_set_then_tour_scenario() {
		let graph = Graph::seed();
		let mut annotations = Annotations::default();

		annotations.set_edge_set(EdgeSetResult(vec![(0, 1)]));
		let rendered = project(&graph, annotations.overlay());
		assert_eq!(rendered.links.len(), 1);
		assert!(rendered.links[0].selected);
		assert!(!surface_options(annotations.overlay()).directed);

		annotations.set_tour(TourResult(vec![0, 1]));
		assert!(matches!(annotations.overlay(), Overlay::Tour(_)));
		let rendered = project(&graph, annotations.overlay());
		assert_eq!(rendered.links.len(), 1);
		assert_eq!(
			(rendered.links[0].source, rendered.links[0].target),
			(0, 1)
		);
		assert_eq!(rendered.links[0].label.as_deref(), Some("1"));
		let options = surface_options(annotations.overlay());
		assert!(options.directed && options.static_with_drag_and_drop);
	}
}
