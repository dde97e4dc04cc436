// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The HTTP surface: one `axum::Router` wiring `/v0/status`, `/v0/entity`
//! and `/v0/entities` to the coordinator and the local store. Every handler
//! here only parses the request and shapes the response — the coordinator
//! owns all replication decisions.

use std::sync::Arc;

use axum::{
	Router,
	body::{Body, Bytes},
	extract::{Query, State},
	http::{HeaderMap, Method, StatusCode},
	response::{IntoResponse, Response},
	routing::get,
};
use futures_util::stream;
use quorumkv_cluster::{ClusterTopology, parse_rf};
use quorumkv_coordinator::{Coordinator, Method as CoordinatorMethod};
use quorumkv_record::{RecordTag, TimestampedRecord};
use quorumkv_store::TimestampedStore;
use quorumkv_transport::PROXY_HEADER;
use quorumkv_type::Error;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
	pub topology: Arc<ClusterTopology>,
	pub store: Arc<TimestampedStore>,
	pub coordinator: Arc<Coordinator>,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/v0/status", get(status))
		.route("/v0/entity", get(entity).put(entity).delete(entity))
		.route("/v0/entities", get(entities))
		.fallback(missing_entity_path)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

async fn status() -> &'static str {
	"OK"
}

async fn missing_entity_path() -> Response {
	Error::BadRequest("no such path".into()).into_response()
}

#[derive(Deserialize)]
struct EntityQuery {
	id: Option<String>,
	replicas: Option<String>,
}

fn proxy_flag(headers: &HeaderMap) -> bool {
	headers.contains_key(PROXY_HEADER)
}

async fn entity(method: Method, State(state): State<AppState>, Query(query): Query<EntityQuery>, headers: HeaderMap, body: Bytes) -> Response {
	let key = match query.id.as_deref() {
		Some(id) if !id.is_empty() => id.as_bytes(),
		_ => return Error::BadRequest("missing or empty id".into()).into_response(),
	};

	let rf = match parse_rf(query.replicas.as_deref(), state.topology.len()) {
		Ok(rf) => rf,
		Err(error) => return error.into_response(),
	};

	let coordinator_method = match method {
		Method::GET => CoordinatorMethod::Get,
		Method::PUT => CoordinatorMethod::Put,
		Method::DELETE => CoordinatorMethod::Delete,
		// The router only ever dispatches GET/PUT/DELETE to this handler;
		// anything else is turned away by axum's own 405 before we're called.
		_ => return Error::BadRequest("unsupported method".into()).into_response(),
	};

	let body = matches!(coordinator_method, CoordinatorMethod::Put).then(|| body.clone());
	let proxy = proxy_flag(&headers);
	let response = state.coordinator.handle(coordinator_method, key, body, rf, proxy).await;

	(StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), response.body).into_response()
}

#[derive(Deserialize)]
struct EntitiesQuery {
	start: Option<String>,
	end: Option<String>,
}

async fn entities(State(state): State<AppState>, Query(query): Query<EntitiesQuery>) -> Response {
	let Some(start) = query.start else {
		return Error::BadRequest("missing start".into()).into_response();
	};
	let end = query.end.map(String::into_bytes);

	let pairs = match state.store.range(start.as_bytes(), end.as_deref()) {
		Ok(pairs) => pairs,
		Err(error) => return error.into_response(),
	};

	let chunks: Vec<Result<Bytes, std::io::Error>> = pairs
		.into_iter()
		.filter_map(|(key, encoded)| {
			let record = TimestampedRecord::decode(&encoded).ok()?;
			match record.tag {
				RecordTag::Value => {
					let mut chunk = Vec::with_capacity(key.len() + 1 + record.value.as_ref().map_or(0, |v| v.len()));
					chunk.extend_from_slice(&key);
					chunk.push(b'\n');
					chunk.extend_from_slice(record.value.as_deref().unwrap_or(&[]));
					Some(Ok(Bytes::from(chunk)))
				}
				RecordTag::Deleted | RecordTag::Absent => None,
			}
		})
		.collect();

	Response::builder()
		.status(StatusCode::OK)
		.body(Body::from_stream(stream::iter(chunks)))
		.expect("response with a streamed body is always well-formed")
}
