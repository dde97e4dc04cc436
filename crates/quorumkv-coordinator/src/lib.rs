// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The replication coordinator: turns one parsed entity request into one
//! HTTP-shaped response, honoring the replication factor and the proxy bit.
//!
//! Each sub-request (local or remote) resolves to an owned [`SubOutcome`];
//! every outcome is collected via [`futures_util::future::join_all`] and
//! folded by a single caller afterwards. Nothing here shares a counter or a
//! list across futures — the fold in [`tally`] is the only place `ack_count`
//! and the merge input list come together, which is the "small completion
//! structure owned by a single future" the design calls for instead of the
//! atomic-counter-plus-list the original system uses.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use futures_util::future::join_all;
use quorumkv_cluster::{ClusterTopology, ReplicationFactor, placement};
use quorumkv_record::{TimestampedRecord, merge};
use quorumkv_store::TimestampedStore;
use quorumkv_transport::{PeerOutcome, PeerTransport};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
	Get,
	Put,
	Delete,
}

/// The shape the dispatcher (`quorumkv-server`) needs to turn into an HTTP
/// response: a status code and a body, nothing HTTP-framework-specific.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoordinatorResponse {
	pub status: u16,
	pub body: Bytes,
}

impl CoordinatorResponse {
	fn empty(status: u16) -> Self {
		Self { status, body: Bytes::new() }
	}
}

/// One sub-request's verdict: did it ack, and (for GET) what record did it
/// bring back, if any.
#[derive(Clone, Debug)]
struct SubOutcome {
	ack: bool,
	record: Option<TimestampedRecord>,
}

pub struct Coordinator {
	topology: Arc<ClusterTopology>,
	store: Arc<TimestampedStore>,
	transport: Arc<dyn PeerTransport>,
}

impl Coordinator {
	pub fn new(topology: Arc<ClusterTopology>, store: Arc<TimestampedStore>, transport: Arc<dyn PeerTransport>) -> Self {
		Self { topology, store, transport }
	}

	fn replica_list(&self, key: &[u8], rf: ReplicationFactor, proxy: bool) -> Vec<usize> {
		if proxy {
			vec![self.topology.self_index()]
		} else {
			placement(&self.topology, key, rf.from)
		}
	}

	pub async fn handle(&self, method: Method, key: &[u8], body: Option<Bytes>, rf: ReplicationFactor, proxy: bool) -> CoordinatorResponse {
		let replica_list = self.replica_list(key, rf, proxy);
		let as_proxy_response = proxy && replica_list.len() == 1;

		// A proxied request's replica list is always `[self]`; the RF on the
		// wire is whatever the originating coordinator parsed for the whole
		// cluster and is meaningless against a single local replica, so the
		// effective quorum here is always 1-out-of-1.
		let rf = if proxy { ReplicationFactor { ack: 1, from: 1 } } else { rf };

		match method {
			Method::Get => self.handle_get(key, &replica_list, rf, as_proxy_response).await,
			Method::Put => {
				let value = body.unwrap_or_default();
				self.handle_put(key, value, &replica_list, rf).await
			}
			Method::Delete => self.handle_delete(key, &replica_list, rf).await,
		}
	}

	async fn handle_get(&self, key: &[u8], replica_list: &[usize], rf: ReplicationFactor, as_proxy_response: bool) -> CoordinatorResponse {
		let outcomes = join_all(replica_list.iter().map(|&replica| self.dispatch_get_one(replica, key))).await;

		let ack_count = outcomes.iter().filter(|o| o.ack).count();
		if ack_count < rf.ack {
			return CoordinatorResponse::empty(504);
		}

		let records: Vec<TimestampedRecord> = outcomes.into_iter().filter_map(|o| o.record).collect();
		let merged = merge(&records);

		match merged.tag {
			quorumkv_record::RecordTag::Value => {
				let body = if as_proxy_response {
					merged.encode()
				} else {
					merged.value.clone().unwrap_or_default()
				};
				CoordinatorResponse { status: 200, body }
			}
			quorumkv_record::RecordTag::Deleted => {
				let body = if as_proxy_response { merged.encode() } else { Bytes::new() };
				CoordinatorResponse { status: 404, body }
			}
			quorumkv_record::RecordTag::Absent => CoordinatorResponse::empty(404),
		}
	}

	async fn dispatch_get_one(&self, replica: usize, key: &[u8]) -> SubOutcome {
		if self.topology.is_self(replica) {
			return match self.store.get_ts(key) {
				Ok(record) => SubOutcome { ack: true, record: Some(record) },
				Err(error) => {
					tracing::warn!(%error, "local storage error during GET fan-out, dropping ack");
					SubOutcome { ack: false, record: None }
				}
			};
		}

		let peer = self.topology.node(replica);
		match self.transport.get(peer, key).await {
			PeerOutcome::NoResponse => SubOutcome { ack: false, record: None },
			PeerOutcome::Responded { status, body } => {
				let record = if status >= 500 || body.is_empty() {
					None
				} else {
					match TimestampedRecord::decode(&body) {
						Ok(record) => Some(record),
						Err(error) => {
							tracing::warn!(%error, peer, "failed to decode peer record, counting ack without it");
							None
						}
					}
				};
				SubOutcome { ack: true, record }
			}
		}
	}

	async fn handle_put(&self, key: &[u8], value: Bytes, replica_list: &[usize], rf: ReplicationFactor) -> CoordinatorResponse {
		let timestamp = current_millis();
		let outcomes = join_all(replica_list.iter().map(|&replica| self.dispatch_put_one(replica, key, value.clone(), timestamp))).await;
		tally_write(&outcomes, rf, 201)
	}

	async fn dispatch_put_one(&self, replica: usize, key: &[u8], value: Bytes, timestamp: i64) -> SubOutcome {
		if self.topology.is_self(replica) {
			return match self.store.put_ts(key, value, timestamp) {
				Ok(()) => SubOutcome { ack: true, record: None },
				Err(error) => {
					tracing::warn!(%error, "local storage error during PUT fan-out, dropping ack");
					SubOutcome { ack: false, record: None }
				}
			};
		}

		let peer = self.topology.node(replica);
		match self.transport.put(peer, key, value).await {
			PeerOutcome::Responded { status, .. } => SubOutcome { ack: status == 201, record: None },
			PeerOutcome::NoResponse => SubOutcome { ack: false, record: None },
		}
	}

	async fn handle_delete(&self, key: &[u8], replica_list: &[usize], rf: ReplicationFactor) -> CoordinatorResponse {
		let timestamp = current_millis();
		let outcomes = join_all(replica_list.iter().map(|&replica| self.dispatch_delete_one(replica, key, timestamp))).await;
		tally_write(&outcomes, rf, 202)
	}

	async fn dispatch_delete_one(&self, replica: usize, key: &[u8], timestamp: i64) -> SubOutcome {
		if self.topology.is_self(replica) {
			return match self.store.delete_ts(key, timestamp) {
				Ok(()) => SubOutcome { ack: true, record: None },
				Err(error) => {
					tracing::warn!(%error, "local storage error during DELETE fan-out, dropping ack");
					SubOutcome { ack: false, record: None }
				}
			};
		}

		let peer = self.topology.node(replica);
		match self.transport.delete(peer, key).await {
			PeerOutcome::Responded { status, .. } => SubOutcome { ack: status == 202, record: None },
			PeerOutcome::NoResponse => SubOutcome { ack: false, record: None },
		}
	}
}

fn tally_write(outcomes: &[SubOutcome], rf: ReplicationFactor, ack_status: u16) -> CoordinatorResponse {
	let ack_count = outcomes.iter().filter(|o| o.ack).count();
	if ack_count >= rf.ack {
		CoordinatorResponse::empty(ack_status)
	} else {
		CoordinatorResponse::empty(504)
	}
}

fn current_millis() -> i64 {
	SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock is before the epoch").as_millis() as i64
}
