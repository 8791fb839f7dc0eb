//! Adjacency-list graph store shared by the canvas and the solver boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Vertex identifier. Vertex ids are dense-ish small integers and are used
/// directly as layout keys by the tree tiering.
pub type VertexId = u32;

/// Undirected graph kept as a symmetric adjacency map.
///
/// The wire shape matches the solver service: a JSON object keyed by vertex
/// id, e.g. `{"0":[1],"1":[0]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
	adjacency: BTreeMap<VertexId, Vec<VertexId>>,
}

impl Graph {
	/// The two-node graph every session starts from.
	pub fn seed() -> Self {
		let mut graph = Self::default();
		graph.add_vertex(0);
		graph.add_vertex(1);
		graph.add_edge(0, 1);
		graph
	}

	pub fn contains(&self, v: VertexId) -> bool {
		self.adjacency.contains_key(&v)
	}

	pub fn vertex_count(&self) -> usize {
		self.adjacency.len()
	}

	/// All vertex ids in ascending order.
	pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
		self.adjacency.keys().copied()
	}

	pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
		self.adjacency.get(&v).map(Vec::as_slice).unwrap_or(&[])
	}

	/// One past the highest id currently in the graph.
	pub fn next_vertex_id(&self) -> VertexId {
		self.adjacency.keys().next_back().map(|&v| v + 1).unwrap_or(0)
	}

	pub fn add_vertex(&mut self, v: VertexId) {
		self.adjacency.entry(v).or_default();
	}

	/// Insert the undirected edge `u -- v`. Both endpoints must already
	/// exist; duplicate edges and self-loops are rejected.
	pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> bool {
		if u == v || !self.contains(u) || !self.contains(v) || self.is_connected(u, v) {
			return false;
		}
		self.adjacency.get_mut(&u).unwrap().push(v);
		self.adjacency.get_mut(&v).unwrap().push(u);
		true
	}

	pub fn remove_edge(&mut self, u: VertexId, v: VertexId) -> bool {
		if !self.is_connected(u, v) {
			return false;
		}
		self.adjacency.get_mut(&u).unwrap().retain(|&n| n != v);
		self.adjacency.get_mut(&v).unwrap().retain(|&n| n != u);
		true
	}

	/// Remove a vertex and every edge touching it.
	pub fn remove_vertex(&mut self, v: VertexId) -> bool {
		if self.adjacency.remove(&v).is_none() {
			return false;
		}
		for neighbors in self.adjacency.values_mut() {
			neighbors.retain(|&n| n != v);
		}
		true
	}

	pub fn is_connected(&self, u: VertexId, v: VertexId) -> bool {
		self.neighbors(u).contains(&v)
	}

	/// Every undirected edge exactly once, as `(u, v)` with `u < v`.
	pub fn edges(&self) -> Vec<(VertexId, VertexId)> {
		let mut edges = Vec::new();
		for (&v, neighbors) in &self.adjacency {
			for &n in neighbors {
				if v < n {
					edges.push((v, n));
				}
			}
		}
		edges
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn seed_is_the_default_two_node_graph() {
		let graph = Graph::seed();
		assert_eq!(graph.vertex_count(), 2);
		assert_eq!(graph.neighbors(0), &[1]);
		assert_eq!(graph.neighbors(1), &[0]);
	}

	#[test]
	fn edges_stay_symmetric_under_mutation() {
		let mut graph = Graph::seed();
		graph.add_vertex(2);
		assert!(graph.add_edge(1, 2));
		for v in graph.vertices().collect::<Vec<_>>() {
			for &n in graph.neighbors(v) {
				assert!(graph.is_connected(n, v), "missing back edge {n} -> {v}");
			}
		}
		assert!(graph.remove_edge(2, 1));
		assert!(graph.neighbors(1).iter().all(|&n| n != 2));
		assert!(graph.neighbors(2).is_empty());
	}

	#[test]
	fn add_edge_rejects_loops_duplicates_and_unknown_vertices() {
		let mut graph = Graph::seed();
		assert!(!graph.add_edge(0, 0));
		assert!(!graph.add_edge(0, 1));
		assert!(!graph.add_edge(0, 9));
		assert_eq!(graph.neighbors(0), &[1]);
	}

	#[test]
	fn edges_yields_each_undirected_edge_once() {
		let mut graph = Graph::seed();
		graph.add_vertex(2);
		graph.add_edge(0, 2);
		assert_eq!(graph.edges(), vec![(0, 1), (0, 2)]);
	}

	#[test]
	fn remove_vertex_strips_dangling_references() {
		let mut graph = Graph::seed();
		graph.add_vertex(2);
		graph.add_edge(1, 2);
		assert!(graph.remove_vertex(1));
		assert!(!graph.contains(1));
		assert!(graph.neighbors(0).is_empty());
		assert!(graph.neighbors(2).is_empty());
		assert_eq!(graph.next_vertex_id(), 3);
	}

	#[test]
	fn wire_shape_round_trips_through_string_keyed_json() {
		let graph = Graph::seed();
		let json = serde_json::to_string(&graph).unwrap();
		assert_eq!(json, r#"{"0":[1],"1":[0]}"#);
		let back: Graph = serde_json::from_str(&json).unwrap();
		assert_eq!(back, graph);
	}
}
