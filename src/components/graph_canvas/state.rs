use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::graph::VertexId;
use crate::layout::{self, LayoutConfig, NodePosition, Viewport};
use crate::view_model::{NodeRole, RenderGraph, SurfaceOptions};

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;

fn role_color(role: NodeRole) -> &'static str {
	match role {
		NodeRole::Plain => "#1f77b4",
		NodeRole::Selected => "#d62728",
		NodeRole::Isolated => "#7f7f7f",
		NodeRole::Pendant => "#ff7f0e",
		NodeRole::Top => "#9467bd",
	}
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: VertexId,
	pub label: String,
	pub color: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct EdgeInfo {
	pub label: Option<String>,
	pub selected: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct SurfaceState {
	pub graph: ForceGraph<NodeInfo, EdgeInfo>,
	pub options: SurfaceOptions,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl SurfaceState {
	pub fn new(render: &RenderGraph, options: SurfaceOptions, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		for (i, node) in render.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / render.nodes.len() as f64;
			let (x, y) = (
				(width / 2.0 + 100.0 * angle.cos()) as f32,
				(height / 2.0 + 100.0 * angle.sin()) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id,
					label: node.id.to_string(),
					color: role_color(node.role),
				},
			});
			id_to_idx.insert(node.id, idx);
		}

		for link in &render.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(src, tgt, EdgeData {
					user_data: EdgeInfo {
						label: link.label.clone(),
						selected: link.selected,
					},
				});
				edges.push((src, tgt));
			}
		}

		Self {
			graph,
			options,
			edges,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn vertex_id_at(&self, idx: DefaultNodeIdx) -> Option<VertexId> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id);
			}
		});
		found
	}

	/// Snapshot of the live position map, keyed by vertex id.
	pub fn positions(&self) -> Vec<NodePosition> {
		let mut positions = Vec::new();
		self.graph.visit_nodes(|node| {
			positions.push(NodePosition {
				id: node.data.user_data.id,
				x: node.x() as f64,
				y: node.y() as f64,
			});
		});
		positions
	}

	/// Overwrite live positions from a snapshot. Ids with no matching node
	/// are skipped, so a snapshot from a previous graph carries over the
	/// surviving vertices.
	pub fn apply_positions(&mut self, positions: &[NodePosition]) {
		let by_id: HashMap<VertexId, (f64, f64)> =
			positions.iter().map(|p| (p.id, (p.x, p.y))).collect();
		self.graph.visit_nodes_mut(|node| {
			if let Some(&(x, y)) = by_id.get(&node.data.user_data.id) {
				node.data.x = x as f32;
				node.data.y = y as f32;
			}
		});
	}

	pub fn viewport(&self) -> Viewport {
		Viewport {
			width: self.width,
			height: self.height,
		}
	}

	/// Read current positions, run the layout corrections, write them back.
	pub fn normalize(&mut self, config: LayoutConfig) {
		let mut positions = self.positions();
		layout::normalize(&mut positions, self.viewport(), config);
		self.apply_positions(&positions);
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		// Tours are laid out, not simulated; dragging still works because
		// drag writes positions directly.
		if !self.options.static_graph && !self.options.static_with_drag_and_drop {
			self.graph.update(dt);
		}
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::Graph;
	use crate::overlay::Overlay;
	use crate::view_model::{project, surface_options};

	fn seeded_state() -> SurfaceState {
		let graph = Graph::seed();
		let render = project(&graph, &Overlay::None);
		SurfaceState::new(&render, surface_options(&Overlay::None), 800.0, 600.0)
	}

	#[test]
	fn positions_round_trip_through_the_handle() {
		let mut state = seeded_state();
		let moved = vec![
			NodePosition { id: 0, x: 10.0, y: 20.0 },
			NodePosition { id: 1, x: 30.0, y: 40.0 },
			// unknown id, skipped
			NodePosition { id: 9, x: 1.0, y: 1.0 },
		];
		state.apply_positions(&moved);
		let mut positions = state.positions();
		positions.sort_by_key(|p| p.id);
		assert_eq!(positions.len(), 2);
		assert_eq!((positions[0].x, positions[0].y), (10.0, 20.0));
		assert_eq!((positions[1].x, positions[1].y), (30.0, 40.0));
	}

	#[test]
	fn normalize_centers_the_cloud_in_the_surface() {
		let mut state = seeded_state();
		state.normalize(LayoutConfig::default());
		let positions = state.positions();
		let n = positions.len() as f64;
		let mx: f64 = positions.iter().map(|p| p.x).sum::<f64>() / n;
		let my: f64 = positions.iter().map(|p| p.y).sum::<f64>() / n;
		assert!((mx - 400.0).abs() < 1e-3);
		assert!((my - 300.0).abs() < 1e-3);
	}
}
