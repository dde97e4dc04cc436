// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Static cluster topology, the key-to-replica placement function, and
//! replication-factor parsing. Pure, deterministic, no I/O: every node in
//! the cluster computes the same answer for the same inputs.

use quorumkv_type::Error;

/// The ordered list of peer endpoints shared by every node, plus this
/// process's own position in that list. Immutable for the lifetime of the
/// process — constructed once in `main` and shared behind an `Arc`.
#[derive(Clone, Debug)]
pub struct ClusterTopology {
	nodes: Vec<String>,
	self_index: usize,
}

impl ClusterTopology {
	pub fn new(nodes: Vec<String>, self_origin: &str) -> Result<Self, Error> {
		if nodes.is_empty() {
			return Err(Error::BadRequest("cluster topology must contain at least one node".into()));
		}
		let self_index = nodes
			.iter()
			.position(|n| n == self_origin)
			.ok_or_else(|| Error::BadRequest(format!("self origin {self_origin:?} is not a member of the cluster node list")))?;
		Ok(Self { nodes, self_index })
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn self_index(&self) -> usize {
		self.self_index
	}

	pub fn self_origin(&self) -> &str {
		&self.nodes[self.self_index]
	}

	pub fn node(&self, index: usize) -> &str {
		&self.nodes[index]
	}

	pub fn is_self(&self, index: usize) -> bool {
		index == self.self_index
	}
}

/// Reproduces the 32-bit Java `String.hashCode` recurrence
/// (`h = 31*h + c`) over the key's raw UTF-8 bytes, so that a deployment
/// mixing this implementation with source-compatible nodes computes
/// identical placement. No hashing crate in the ecosystem implements this
/// specific recurrence, so it is written out directly rather than reached
/// for from a dependency.
pub fn java_string_hash(key: &[u8]) -> i32 {
	key.iter().fold(0i32, |h, &byte| h.wrapping_mul(31).wrapping_add(byte as i32))
}

/// `h = hash(key) & 0x7FFFFFFF`, `start = h mod n`, then `count` consecutive
/// node indices starting there, wrapping around the ring.
pub fn placement(topology: &ClusterTopology, key: &[u8], count: usize) -> Vec<usize> {
	let n = topology.len();
	let h = (java_string_hash(key) & 0x7FFF_FFFF) as usize;
	let start = h % n;
	(0..count).map(|i| (start + i) % n).collect()
}

/// `(ack, from)` with `1 <= ack <= from <= N`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReplicationFactor {
	pub ack: usize,
	pub from: usize,
}

impl ReplicationFactor {
	/// `⌊N/2⌋+1` out of `N`.
	pub fn default_for(n: usize) -> Self {
		Self { ack: n / 2 + 1, from: n }
	}
}

/// Parses a `replicas=ack/from` request parameter. `None` yields
/// [`ReplicationFactor::default_for`]; a malformed or out-of-range value is
/// `BadRf`, never silently clamped.
pub fn parse_rf(param: Option<&str>, n: usize) -> Result<ReplicationFactor, Error> {
	let Some(param) = param else {
		return Ok(ReplicationFactor::default_for(n));
	};

	let (ack_str, from_str) = param
		.split_once('/')
		.ok_or_else(|| Error::BadRf(format!("expected ack/from, got {param:?}")))?;

	let ack: usize = ack_str
		.parse()
		.map_err(|_| Error::BadRf(format!("ack is not a positive integer: {ack_str:?}")))?;
	let from: usize = from_str
		.parse()
		.map_err(|_| Error::BadRf(format!("from is not a positive integer: {from_str:?}")))?;

	if ack == 0 || from == 0 || ack > from || from > n {
		return Err(Error::BadRf(format!("replication factor {ack}/{from} violates 1 <= ack <= from <= {n}")));
	}

	Ok(ReplicationFactor { ack, from })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn topology(n: usize, self_index: usize) -> ClusterTopology {
		let nodes: Vec<String> = (0..n).map(|i| format!("http://node-{i}:8080")).collect();
		ClusterTopology::new(nodes.clone(), &nodes[self_index]).unwrap()
	}

	#[test]
	fn placement_is_deterministic_across_processes() {
		let a = topology(5, 0);
		let b = topology(5, 3);
		assert_eq!(placement(&a, b"my-key", 3), placement(&b, b"my-key", 3));
	}

	#[test]
	fn placement_returns_consecutive_wrapping_indices() {
		let t = topology(4, 0);
		let list = placement(&t, b"abc", 3);
		assert_eq!(list.len(), 3);
		for w in list.windows(2) {
			assert_eq!((w[0] + 1) % 4, w[1]);
		}
	}

	#[test]
	fn default_rf_is_majority_out_of_n() {
		assert_eq!(ReplicationFactor::default_for(3), ReplicationFactor { ack: 2, from: 3 });
		assert_eq!(ReplicationFactor::default_for(1), ReplicationFactor { ack: 1, from: 1 });
		assert_eq!(ReplicationFactor::default_for(4), ReplicationFactor { ack: 3, from: 4 });
	}

	#[test]
	fn parse_rf_accepts_valid_pair() {
		assert_eq!(parse_rf(Some("2/3"), 3).unwrap(), ReplicationFactor { ack: 2, from: 3 });
	}

	#[test]
	fn parse_rf_rejects_ack_greater_than_from() {
		assert!(parse_rf(Some("3/2"), 3).is_err());
	}

	#[test]
	fn parse_rf_rejects_from_greater_than_n() {
		assert!(parse_rf(Some("2/5"), 3).is_err());
	}

	#[test]
	fn parse_rf_rejects_malformed_param() {
		assert!(parse_rf(Some("not-a-pair"), 3).is_err());
		assert!(parse_rf(Some("2"), 3).is_err());
		assert!(parse_rf(Some("0/3"), 3).is_err());
	}
}
