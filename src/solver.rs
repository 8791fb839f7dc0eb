//! HTTP client for the external solver service.
//!
//! The service owns every graph analysis; this crate only ships typed
//! results into the overlay store. Transport is web-sys fetch on WASM and
//! reqwest elsewhere, behind the same async surface.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::graph::{Graph, VertexId};
use crate::overlay::{EdgeSetResult, KernelResult, TourResult};

/// Default solver endpoint, matching the service's dev setup.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum SolverError {
	#[error("request could not be built: {0}")]
	Request(String),
	#[error("solver unreachable: {0}")]
	Network(String),
	#[error("solver returned HTTP {0}")]
	Status(u16),
	#[error("malformed solver response: {0}")]
	Decode(String),
}

#[derive(Serialize)]
struct GenerateBody {
	vertices: u32,
	probability: f64,
}

#[derive(Serialize)]
struct GenerateTreeBody {
	nodes: u32,
	max_children: u32,
}

#[derive(Serialize)]
struct GraphBody<'a> {
	graph: &'a Graph,
}

#[derive(Serialize)]
struct CoverBody<'a> {
	graph: &'a Graph,
	k: i32,
	depth: u32,
}

#[derive(Serialize)]
struct TopsBody<'a> {
	graph: &'a Graph,
	k: i32,
}

/// Thin client over the solver's JSON endpoints.
#[derive(Clone, Debug)]
pub struct SolverClient {
	base_url: String,
}

impl SolverClient {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	pub async fn generate(&self, vertices: u32, probability: f64) -> Result<Graph, SolverError> {
		self.send("POST", "/generate", &GenerateBody { vertices, probability })
			.await
	}

	/// Generated tree graphs assign vertex ids in level order, which the
	/// tree tiering relies on.
	pub async fn generate_tree(&self, nodes: u32, max_children: u32) -> Result<Graph, SolverError> {
		self.send("POST", "/generate-tree", &GenerateTreeBody { nodes, max_children })
			.await
	}

	pub async fn connect_random(&self, graph: &Graph) -> Result<Graph, SolverError> {
		self.send("PUT", "/connect-random", &GraphBody { graph }).await
	}

	pub async fn connect_two_sub(&self, graph: &Graph) -> Result<Graph, SolverError> {
		self.send("PUT", "/connect-sub", &GraphBody { graph }).await
	}

	pub async fn connect_all_sub(&self, graph: &Graph) -> Result<Graph, SolverError> {
		self.send("PUT", "/connect-all-sub", &GraphBody { graph }).await
	}

	pub async fn increase_pendants(&self, graph: &Graph) -> Result<Graph, SolverError> {
		self.send("PUT", "/increase-pendants", &GraphBody { graph }).await
	}

	pub async fn decrease_pendants(&self, graph: &Graph) -> Result<Graph, SolverError> {
		self.send("PUT", "/decrease-pendants", &GraphBody { graph }).await
	}

	pub async fn increase_tops(&self, graph: &Graph, k: i32) -> Result<Graph, SolverError> {
		self.send("PUT", "/increase-tops", &TopsBody { graph, k }).await
	}

	pub async fn decrease_tops(&self, graph: &Graph, k: i32) -> Result<Graph, SolverError> {
		self.send("PUT", "/decrease-tops", &TopsBody { graph, k }).await
	}

	pub async fn increase_isolated(&self, graph: &Graph) -> Result<Graph, SolverError> {
		self.send("PUT", "/increase-isolated", &GraphBody { graph }).await
	}

	pub async fn decrease_isolated(&self, graph: &Graph) -> Result<Graph, SolverError> {
		self.send("PUT", "/decrease-isolated", &GraphBody { graph }).await
	}

	pub async fn vertex_cover(
		&self,
		graph: &Graph,
		k: i32,
		depth: u32,
	) -> Result<Vec<VertexId>, SolverError> {
		self.send("POST", "/vertex-cover", &CoverBody { graph, k, depth })
			.await
	}

	pub async fn vertex_cover_kernelized(
		&self,
		graph: &Graph,
		k: i32,
		depth: u32,
	) -> Result<Vec<VertexId>, SolverError> {
		self.send("POST", "/vertex-cover-kernelized", &CoverBody { graph, k, depth })
			.await
	}

	pub async fn vertex_cover_approximation(
		&self,
		graph: &Graph,
		k: i32,
		depth: u32,
	) -> Result<Vec<VertexId>, SolverError> {
		self.send("POST", "/vertex-cover-approximation", &CoverBody { graph, k, depth })
			.await
	}

	pub async fn tree_cover(
		&self,
		graph: &Graph,
		k: i32,
		depth: u32,
	) -> Result<Vec<VertexId>, SolverError> {
		self.send("POST", "/tree-cover", &CoverBody { graph, k, depth })
			.await
	}

	pub async fn kernelization(&self, graph: &Graph, k: i32) -> Result<KernelResult, SolverError> {
		self.send("POST", "/kernelization", &TopsBody { graph, k }).await
	}

	pub async fn minimum_spanning_tree(&self, graph: &Graph) -> Result<EdgeSetResult, SolverError> {
		self.send("POST", "/minimum-spanning-tree", &GraphBody { graph })
			.await
	}

	pub async fn christofides_tour(&self, graph: &Graph) -> Result<TourResult, SolverError> {
		self.send("POST", "/christofides-algorithm", &GraphBody { graph })
			.await
	}

	#[cfg(target_arch = "wasm32")]
	async fn send<B: Serialize, T: DeserializeOwned>(
		&self,
		method: &str,
		path: &str,
		body: &B,
	) -> Result<T, SolverError> {
		use wasm_bindgen::{JsCast, JsValue};
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

		let url = format!("{}{}", self.base_url, path);
		let payload =
			serde_json::to_string(body).map_err(|e| SolverError::Request(e.to_string()))?;

		let headers = Headers::new().map_err(|e| SolverError::Request(format!("{e:?}")))?;
		headers
			.set("Content-Type", "application/json")
			.map_err(|e| SolverError::Request(format!("{e:?}")))?;

		let opts = RequestInit::new();
		opts.set_method(method);
		opts.set_mode(RequestMode::Cors);
		opts.set_headers(&headers);
		opts.set_body(&JsValue::from_str(&payload));

		let request = Request::new_with_str_and_init(&url, &opts)
			.map_err(|e| SolverError::Request(format!("{e:?}")))?;

		let window = web_sys::window().ok_or_else(|| SolverError::Request("no window".into()))?;
		let response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| SolverError::Network(format!("{e:?}")))?;
		let response: Response = response
			.dyn_into()
			.map_err(|_| SolverError::Network("fetch did not yield a Response".into()))?;

		if !response.ok() {
			return Err(SolverError::Status(response.status()));
		}

		let text = JsFuture::from(
			response
				.text()
				.map_err(|e| SolverError::Network(format!("{e:?}")))?,
		)
		.await
		.map_err(|e| SolverError::Network(format!("{e:?}")))?;
		let text = text
			.as_string()
			.ok_or_else(|| SolverError::Decode("response body is not text".into()))?;

		serde_json::from_str(&text).map_err(|e| SolverError::Decode(e.to_string()))
	}

	#[cfg(not(target_arch = "wasm32"))]
	async fn send<B: Serialize, T: DeserializeOwned>(
		&self,
		method: &str,
		path: &str,
		body: &B,
	) -> Result<T, SolverError> {
		let url = format!("{}{}", self.base_url, path);
		let payload =
			serde_json::to_string(body).map_err(|e| SolverError::Request(e.to_string()))?;

		let client = reqwest::Client::new();
		let request = match method {
			"PUT" => client.put(&url),
			_ => client.post(&url),
		};
		let response = request
			.header("Content-Type", "application/json")
			.body(payload)
			.send()
			.await
			.map_err(|e| SolverError::Network(e.to_string()))?;

		if !response.status().is_success() {
			return Err(SolverError::Status(response.status().as_u16()));
		}

		let text = response
			.text()
			.await
			.map_err(|e| SolverError::Network(e.to_string()))?;
		serde_json::from_str(&text).map_err(|e| SolverError::Decode(e.to_string()))
	}
}
