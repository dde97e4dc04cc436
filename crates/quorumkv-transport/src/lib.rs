// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The peer transport: the async HTTP client the coordinator uses to ask a
//! remote replica for its local opinion. Always proxied — every request this
//! crate sends carries `X-OK-Proxy: True`, since by definition the only
//! caller is another coordinator asking a peer's local-only view.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

/// Per-peer request deadline (spec §5). Applied per sub-request, not to the
/// overall client request.
pub const PEER_DEADLINE: Duration = Duration::from_secs(5);

/// Connect timeout on the underlying socket (spec §5).
const CONNECT_TIMEOUT: Duration = Duration::from_millis(100);

pub const PROXY_HEADER: &str = "X-OK-Proxy";
pub const PROXY_HEADER_VALUE: &str = "True";

/// What came back from a sub-request, or the fact that nothing did.
/// `NoResponse` covers both a connect/timeout failure and is the only case
/// the coordinator is allowed to fold into "no ack" without inspecting a
/// status code — a transport error never looks like a valid HTTP response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PeerOutcome {
	Responded { status: u16, body: Bytes },
	NoResponse,
}

/// Abstraction over "ask a peer node about one key". Object-safe so the
/// coordinator can hold `Arc<dyn PeerTransport>` without committing to a
/// concrete HTTP stack.
#[async_trait]
pub trait PeerTransport: Send + Sync {
	async fn get(&self, peer: &str, key: &[u8]) -> PeerOutcome;
	async fn put(&self, peer: &str, key: &[u8], value: Bytes) -> PeerOutcome;
	async fn delete(&self, peer: &str, key: &[u8]) -> PeerOutcome;
}

/// One shared, connection-pooling `reqwest::Client` used for every peer —
/// `reqwest::Client` already pools per-origin internally, which is the
/// idiomatic equivalent of "one client per remote endpoint, thread-safe"
/// (spec §5) without hand-rolling a per-peer pool.
pub struct HttpPeerTransport {
	client: reqwest::Client,
}

impl HttpPeerTransport {
	pub fn new() -> Self {
		let client = reqwest::Client::builder()
			.connect_timeout(CONNECT_TIMEOUT)
			.build()
			.expect("reqwest client configuration is valid");
		Self { client }
	}

	fn entity_url(peer: &str, key: &[u8]) -> String {
		format!("{peer}/v0/entity?id={}", urlencode(key))
	}
}

impl Default for HttpPeerTransport {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl PeerTransport for HttpPeerTransport {
	async fn get(&self, peer: &str, key: &[u8]) -> PeerOutcome {
		let request = self.client.get(Self::entity_url(peer, key)).header(PROXY_HEADER, PROXY_HEADER_VALUE).timeout(PEER_DEADLINE);
		send(request).await
	}

	async fn put(&self, peer: &str, key: &[u8], value: Bytes) -> PeerOutcome {
		let request = self
			.client
			.put(Self::entity_url(peer, key))
			.header(PROXY_HEADER, PROXY_HEADER_VALUE)
			.timeout(PEER_DEADLINE)
			.body(value);
		send(request).await
	}

	async fn delete(&self, peer: &str, key: &[u8]) -> PeerOutcome {
		let request = self.client.delete(Self::entity_url(peer, key)).header(PROXY_HEADER, PROXY_HEADER_VALUE).timeout(PEER_DEADLINE);
		send(request).await
	}
}

async fn send(request: reqwest::RequestBuilder) -> PeerOutcome {
	match request.send().await {
		Ok(response) => {
			let status = response.status().as_u16();
			let body = response.bytes().await.unwrap_or_default();
			PeerOutcome::Responded { status, body }
		}
		Err(error) => {
			tracing::debug!(%error, "peer sub-request produced no response");
			PeerOutcome::NoResponse
		}
	}
}

/// Minimal percent-encoding for the `id` query parameter: keys are
/// arbitrary bytes, but the query string they travel in is ASCII.
fn urlencode(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len());
	for &b in bytes {
		match b {
			b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
			_ => out.push_str(&format!("%{b:02X}")),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn urlencode_passes_through_unreserved_characters() {
		assert_eq!(urlencode(b"abc-123_XYZ.~"), "abc-123_XYZ.~");
	}

	#[test]
	fn urlencode_percent_encodes_everything_else() {
		assert_eq!(urlencode(b"a b"), "a%20b");
		assert_eq!(urlencode(&[0xff]), "%FF");
	}
}
