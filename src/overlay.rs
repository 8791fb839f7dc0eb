//! Annotation state: the four analysis results and the rule that at most one
//! of them drives the canvas at a time.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::graph::VertexId;

/// Vertex-cover overlay: the solver's neighborhood search depth and the
/// covered vertices. The depth is a solver parameter, not display state, and
/// never decides whether the overlay counts as active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverResult {
	pub depth: u32,
	pub vertices: BTreeSet<VertexId>,
}

impl CoverResult {
	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}
}

/// Kernelization overlay: vertices partitioned into reduction roles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct KernelResult {
	pub isolated: BTreeSet<VertexId>,
	pub pendant: BTreeSet<VertexId>,
	pub tops: BTreeSet<VertexId>,
}

impl KernelResult {
	pub fn is_empty(&self) -> bool {
		self.isolated.is_empty() && self.pendant.is_empty() && self.tops.is_empty()
	}
}

/// A distinguished edge subset (e.g. a matching or spanning tree), in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct EdgeSetResult(pub Vec<(VertexId, VertexId)>);

impl EdgeSetResult {
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// A vertex visiting order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TourResult(pub Vec<VertexId>);

impl TourResult {
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// The analysis result currently driving the graph's presentation.
///
/// Replacing the whole union atomically is what keeps the four results
/// mutually exclusive; there is no cross-slot clearing to get wrong.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Overlay {
	#[default]
	None,
	Cover(CoverResult),
	Kernel(KernelResult),
	EdgeSet(EdgeSetResult),
	Tour(TourResult),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
	Cover,
	Kernel,
	EdgeSet,
	Tour,
}

impl Overlay {
	fn kind(&self) -> Option<Kind> {
		match self {
			Overlay::None => None,
			Overlay::Cover(_) => Some(Kind::Cover),
			Overlay::Kernel(_) => Some(Kind::Kernel),
			Overlay::EdgeSet(_) => Some(Kind::EdgeSet),
			Overlay::Tour(_) => Some(Kind::Tour),
		}
	}

	/// True when the variant carries no content worth displaying.
	pub fn is_empty(&self) -> bool {
		match self {
			Overlay::None => true,
			Overlay::Cover(c) => c.is_empty(),
			Overlay::Kernel(k) => k.is_empty(),
			Overlay::EdgeSet(e) => e.is_empty(),
			Overlay::Tour(t) => t.is_empty(),
		}
	}
}

/// Overlay store.
///
/// `set` replaces the union atomically. The per-kind setters keep the
/// original four-slot contract: a non-empty result activates its kind, an
/// empty one clears its own kind only. Clearing an inactive kind is a no-op,
/// so a clear can never cascade into further clears.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotations {
	overlay: Overlay,
	search_depth: u32,
}

impl Default for Annotations {
	fn default() -> Self {
		Self {
			overlay: Overlay::None,
			search_depth: 1,
		}
	}
}

impl Annotations {
	pub fn overlay(&self) -> &Overlay {
		&self.overlay
	}

	/// Search depth for cover requests. Survives overlay clears.
	pub fn search_depth(&self) -> u32 {
		self.search_depth
	}

	pub fn set_search_depth(&mut self, depth: u32) {
		self.search_depth = depth.max(1);
	}

	/// Replace the active overlay. `Overlay::None` clears unconditionally;
	/// an empty result clears only if its kind is the active one.
	pub fn set(&mut self, overlay: Overlay) {
		match overlay.kind() {
			None => self.overlay = Overlay::None,
			Some(kind) if overlay.is_empty() => {
				if self.overlay.kind() == Some(kind) {
					self.overlay = Overlay::None;
				}
			}
			Some(_) => self.overlay = overlay,
		}
	}

	pub fn set_cover(&mut self, cover: CoverResult) {
		self.set(Overlay::Cover(cover));
	}

	pub fn set_kernel(&mut self, kernel: KernelResult) {
		self.set(Overlay::Kernel(kernel));
	}

	pub fn set_edge_set(&mut self, edges: EdgeSetResult) {
		self.set(Overlay::EdgeSet(edges));
	}

	pub fn set_tour(&mut self, tour: TourResult) {
		self.set(Overlay::Tour(tour));
	}

	pub fn clear(&mut self) {
		self.overlay = Overlay::None;
	}

	/// Click-to-edit: toggle `v` in the pending cover selection. Only
	/// applies while nothing is active or the cover itself is; clicks under
	/// kernel/edge-set/tour overlays are ignored. A toggle that empties the
	/// selection deactivates the overlay.
	pub fn toggle_cover_vertex(&mut self, v: VertexId) {
		let mut cover = match &self.overlay {
			Overlay::Cover(cover) => cover.clone(),
			Overlay::None => CoverResult {
				depth: self.search_depth,
				vertices: BTreeSet::new(),
			},
			_ => return,
		};
		if !cover.vertices.remove(&v) {
			cover.vertices.insert(v);
		}
		self.overlay = if cover.is_empty() {
			Overlay::None
		} else {
			Overlay::Cover(cover)
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cover(vertices: &[VertexId]) -> CoverResult {
		CoverResult {
			depth: 1,
			vertices: vertices.iter().copied().collect(),
		}
	}

	fn kernel(isolated: &[VertexId]) -> KernelResult {
		KernelResult {
			isolated: isolated.iter().copied().collect(),
			..KernelResult::default()
		}
	}

	#[test]
	fn at_most_one_overlay_survives_any_setter_sequence() {
		let mut annotations = Annotations::default();
		annotations.set_cover(cover(&[0, 1]));
		assert!(matches!(annotations.overlay(), Overlay::Cover(_)));

		annotations.set_kernel(kernel(&[2]));
		assert!(matches!(annotations.overlay(), Overlay::Kernel(_)));

		annotations.set_edge_set(EdgeSetResult(vec![(0, 1)]));
		assert!(matches!(annotations.overlay(), Overlay::EdgeSet(_)));

		annotations.set_tour(TourResult(vec![0, 1]));
		assert!(matches!(annotations.overlay(), Overlay::Tour(_)));

		annotations.set_cover(cover(&[3]));
		assert_eq!(annotations.overlay(), &Overlay::Cover(cover(&[3])));
	}

	#[test]
	fn clearing_an_inactive_kind_never_cascades() {
		let mut annotations = Annotations::default();
		annotations.set_tour(TourResult(vec![0, 1, 2]));

		// Empty results for other kinds must leave the tour alone.
		annotations.set_cover(cover(&[]));
		annotations.set_kernel(KernelResult::default());
		annotations.set_edge_set(EdgeSetResult::default());
		assert!(matches!(annotations.overlay(), Overlay::Tour(_)));

		// Clearing the active kind deactivates it, once.
		annotations.set_tour(TourResult::default());
		assert_eq!(annotations.overlay(), &Overlay::None);
		annotations.set_tour(TourResult::default());
		assert_eq!(annotations.overlay(), &Overlay::None);
	}

	#[test]
	fn resetting_the_same_cover_does_not_oscillate() {
		let mut annotations = Annotations::default();
		annotations.set_cover(cover(&[0, 1]));
		annotations.set_cover(cover(&[0, 1]));
		assert_eq!(annotations.overlay(), &Overlay::Cover(cover(&[0, 1])));
	}

	#[test]
	fn search_depth_changes_touch_no_overlay() {
		let mut annotations = Annotations::default();
		annotations.set_tour(TourResult(vec![0, 1]));
		annotations.set_search_depth(4);
		assert!(matches!(annotations.overlay(), Overlay::Tour(_)));
		assert_eq!(annotations.search_depth(), 4);

		annotations.clear();
		assert_eq!(annotations.search_depth(), 4);
	}

	#[test]
	fn toggle_round_trips_a_vertex() {
		let mut annotations = Annotations::default();
		annotations.toggle_cover_vertex(3);
		assert_eq!(annotations.overlay(), &Overlay::Cover(cover(&[3])));

		annotations.toggle_cover_vertex(3);
		assert_eq!(annotations.overlay(), &Overlay::None);
	}

	#[test]
	fn toggle_is_ignored_under_non_cover_overlays() {
		let mut annotations = Annotations::default();
		annotations.set_kernel(kernel(&[0]));
		annotations.toggle_cover_vertex(3);
		assert!(matches!(annotations.overlay(), Overlay::Kernel(_)));

		annotations.set_tour(TourResult(vec![0, 1]));
		annotations.toggle_cover_vertex(3);
		assert!(matches!(annotations.overlay(), Overlay::Tour(_)));
	}

	#[test]
	fn toggle_extends_an_active_cover() {
		let mut annotations = Annotations::default();
		annotations.set_search_depth(2);
		annotations.toggle_cover_vertex(0);
		annotations.toggle_cover_vertex(5);
		match annotations.overlay() {
			Overlay::Cover(c) => {
				assert_eq!(c.depth, 2);
				assert_eq!(c.vertices.iter().copied().collect::<Vec<_>>(), vec![0, 5]);
			}
			other => panic!("expected cover, got {other:?}"),
		}
	}
}
