//! Layout normalization over the surface's live node positions.
//!
//! All math is pure: the caller snapshots positions, hands them here with the
//! measured viewport, and writes the corrected values back. Nothing in this
//! module touches the DOM.

use crate::graph::VertexId;

/// One node's position in the surface's live position map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePosition {
	pub id: VertexId,
	pub x: f64,
	pub y: f64,
}

/// Measured container box. Non-positive dimensions mean the container has
/// not been laid out yet and normalization is skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn measurable(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}
}

/// User-controlled layout settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
	pub max_children: u32,
	pub is_tree: bool,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			max_children: 2,
			is_tree: false,
		}
	}
}

/// Vertical distance between consecutive tiers, per unit branching factor.
pub const TIER_SPACING: f64 = 250.0;

/// Centering correction, then tier bucketing when tree mode is on. Tiering
/// runs after centering and is not re-centered afterward, so a tree layout
/// can sit vertically off-center.
pub fn normalize(positions: &mut [NodePosition], viewport: Viewport, config: LayoutConfig) {
	if positions.is_empty() || !viewport.measurable() {
		return;
	}
	center(positions, viewport);
	if config.is_tree {
		tier(positions, config.max_children);
	}
}

/// Pin the centroid of the node cloud to the viewport center. Recomputed
/// from scratch on every call; the mean is measured from current, possibly
/// physics-simulated positions, never accumulated.
pub fn center(positions: &mut [NodePosition], viewport: Viewport) {
	if positions.is_empty() || !viewport.measurable() {
		return;
	}
	let n = positions.len() as f64;
	let (sum_x, sum_y) = positions
		.iter()
		.fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
	let (dx, dy) = (
		viewport.width / 2.0 - sum_x / n,
		viewport.height / 2.0 - sum_y / n,
	);
	for p in positions.iter_mut() {
		p.x += dx;
		p.y += dy;
	}
}

/// Bucket nodes into fixed-size rows below the lowest point reached so far.
///
/// The tier index is `id / max_children` — numeric id as a stand-in for tree
/// depth. This matches actual structure only when ids were assigned in level
/// order, which the tree generator guarantees.
pub fn tier(positions: &mut [NodePosition], max_children: u32) {
	if positions.is_empty() {
		return;
	}
	let m = max_children.max(1);
	let highest_y = positions.iter().map(|p| p.y).fold(f64::MIN, f64::max);
	let spacing = TIER_SPACING * m as f64;
	for p in positions.iter_mut() {
		p.y = highest_y + spacing * (p.id / m) as f64;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn viewport() -> Viewport {
		Viewport {
			width: 800.0,
			height: 600.0,
		}
	}

	fn mean(positions: &[NodePosition]) -> (f64, f64) {
		let n = positions.len() as f64;
		let (sx, sy) = positions
			.iter()
			.fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
		(sx / n, sy / n)
	}

	#[test]
	fn centering_pins_the_centroid_to_the_viewport_center() {
		let mut positions = vec![
			NodePosition { id: 0, x: 10.0, y: -40.0 },
			NodePosition { id: 1, x: 90.0, y: 20.0 },
			NodePosition { id: 2, x: 350.0, y: 900.0 },
		];
		center(&mut positions, viewport());
		let (mx, my) = mean(&positions);
		assert!((mx - 400.0).abs() < EPS);
		assert!((my - 300.0).abs() < EPS);
	}

	#[test]
	fn centering_twice_is_a_no_op() {
		let mut positions = vec![
			NodePosition { id: 0, x: 3.0, y: 7.0 },
			NodePosition { id: 1, x: -11.0, y: 123.0 },
		];
		center(&mut positions, viewport());
		let once = positions.clone();
		center(&mut positions, viewport());
		for (a, b) in positions.iter().zip(&once) {
			assert!((a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS);
		}
	}

	#[test]
	fn unmeasurable_viewport_or_empty_cloud_is_skipped() {
		let mut positions = vec![NodePosition { id: 0, x: 5.0, y: 5.0 }];
		center(&mut positions, Viewport::default());
		assert_eq!(positions[0], NodePosition { id: 0, x: 5.0, y: 5.0 });

		let mut empty: Vec<NodePosition> = Vec::new();
		normalize(&mut empty, viewport(), LayoutConfig::default());
	}

	#[test]
	fn tiering_buckets_ids_into_uniform_rows() {
		let mut positions: Vec<_> = (0..6)
			.map(|id| NodePosition {
				id,
				x: id as f64 * 10.0,
				y: id as f64 * 3.0,
			})
			.collect();
		let highest_y = 15.0;
		tier(&mut positions, 2);

		for pair in [(0, 1), (2, 3), (4, 5)] {
			assert_eq!(positions[pair.0].y, positions[pair.1].y);
		}
		assert_eq!(positions[0].y, highest_y);
		assert_eq!(positions[2].y, highest_y + 500.0);
		assert_eq!(positions[4].y, highest_y + 1000.0);
		// x untouched by tiering
		assert_eq!(positions[3].x, 30.0);
	}

	#[test]
	fn tiering_clamps_a_zero_branching_factor() {
		let mut positions = vec![
			NodePosition { id: 0, x: 0.0, y: 0.0 },
			NodePosition { id: 1, x: 0.0, y: 0.0 },
		];
		tier(&mut positions, 0);
		assert_eq!(positions[1].y - positions[0].y, TIER_SPACING);
	}

	#[test]
	fn tree_normalization_centers_x_but_leaves_tiers_uncentered() {
		let mut positions = vec![
			NodePosition { id: 0, x: 100.0, y: 0.0 },
			NodePosition { id: 1, x: 300.0, y: 50.0 },
		];
		let config = LayoutConfig {
			max_children: 2,
			is_tree: true,
		};
		normalize(&mut positions, viewport(), config);

		let (mx, _) = mean(&positions);
		assert!((mx - 400.0).abs() < EPS);
		// After centering the lowest point is 325; both ids land in tier 0.
		assert_eq!(positions[0].y, 325.0);
		assert_eq!(positions[1].y, 325.0);
	}
}
