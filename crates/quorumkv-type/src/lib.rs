// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Scalar types and the crate-wide error enum shared by every quorumkv crate.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use bytes::Bytes;

/// An opaque, non-empty byte string identifying a record.
pub type Key = Bytes;

/// An arbitrary, possibly empty byte string.
pub type Value = Bytes;

/// The crate-wide error type. Variants map to the error kinds in the design
/// (`BadRequest`, `BadRf`, `QuorumFailed`, `Storage`, `Transport`, `Codec`).
///
/// Only `BadRequest`, `BadRf`, `QuorumFailed` and `Storage` ever become an
/// HTTP response (see `IntoResponse` below) — `Transport` and `Codec`
/// failures are always folded into "no ack" by the coordinator before they
/// can reach the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("bad request: {0}")]
	BadRequest(String),

	#[error("bad replication factor: {0}")]
	BadRf(String),

	#[error("quorum not reached")]
	QuorumFailed,

	#[error("storage error: {0}")]
	Storage(String),

	#[error("transport error: {0}")]
	Transport(String),

	#[error("codec error: {0}")]
	Codec(String),
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = match self {
			Error::BadRequest(_) | Error::BadRf(_) => StatusCode::BAD_REQUEST,
			Error::QuorumFailed => StatusCode::GATEWAY_TIMEOUT,
			Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
			Error::Transport(_) | Error::Codec(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};
		(status, self.to_string()).into_response()
	}
}

pub type Result<T> = std::result::Result<T, Error>;
