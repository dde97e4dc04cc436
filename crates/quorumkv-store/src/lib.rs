// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The storage engine facade the coordinator depends on, and the
//! timestamped-record wrapper built on top of it.
//!
//! The engine itself is treated as a black box by the rest of this crate's
//! design: only the six operations in [`Engine`] matter. [`MemoryEngine`] is
//! the one shipped implementation — an ordered, in-process map — but any
//! `Engine` (backed by `sled`, `rocksdb`, or anything else) plugs in without
//! touching [`TimestampedStore`] or the coordinator above it.

use std::{collections::BTreeMap, ops::Bound, sync::Arc};

use bytes::Bytes;
use parking_lot::RwLock;
use quorumkv_record::TimestampedRecord;
use quorumkv_type::Error;

/// The result of a point lookup. The source this design is drawn from
/// signals "not found" by throwing; this crate never does, to keep
/// not-found on the happy path of every caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Lookup {
	Found(Bytes),
	NotFound,
}

/// The operations the coordinator needs from an embedded ordered key/value
/// engine. `get`/`upsert`/`remove` must be linearizable per key; `range`
/// observes a point-in-time snapshot of the keys visible at the moment it is
/// called.
pub trait Engine: Send + Sync {
	fn get(&self, key: &[u8]) -> Result<Lookup, Error>;
	fn upsert(&self, key: &[u8], value: Bytes) -> Result<(), Error>;
	fn remove(&self, key: &[u8]) -> Result<(), Error>;
	/// Inclusive `from`, exclusive `to` when present, ordered by key.
	fn range(&self, from: &[u8], to: Option<&[u8]>) -> Result<Vec<(Bytes, Bytes)>, Error>;
	fn compact(&self) -> Result<(), Error>;
	fn close(&self) -> Result<(), Error>;
}

/// An ordered, in-process engine backed by a `BTreeMap` behind a
/// `parking_lot::RwLock` — `parking_lot` rather than `std::sync::RwLock` to
/// keep the lock primitive aligned with the rest of the workspace.
#[derive(Clone, Default)]
pub struct MemoryEngine {
	inner: Arc<RwLock<BTreeMap<Vec<u8>, Bytes>>>,
}

impl MemoryEngine {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Engine for MemoryEngine {
	fn get(&self, key: &[u8]) -> Result<Lookup, Error> {
		Ok(match self.inner.read().get(key) {
			Some(value) => Lookup::Found(value.clone()),
			None => Lookup::NotFound,
		})
	}

	fn upsert(&self, key: &[u8], value: Bytes) -> Result<(), Error> {
		self.inner.write().insert(key.to_vec(), value);
		Ok(())
	}

	fn remove(&self, key: &[u8]) -> Result<(), Error> {
		self.inner.write().remove(key);
		Ok(())
	}

	fn range(&self, from: &[u8], to: Option<&[u8]>) -> Result<Vec<(Bytes, Bytes)>, Error> {
		let guard = self.inner.read();
		let lower = Bound::Included(from.to_vec());
		let upper = match to {
			Some(to) => Bound::Excluded(to.to_vec()),
			None => Bound::Unbounded,
		};
		Ok(guard.range((lower, upper)).map(|(k, v)| (Bytes::copy_from_slice(k), v.clone())).collect())
	}

	fn compact(&self) -> Result<(), Error> {
		// Best effort; an in-memory map has nothing to reclaim.
		Ok(())
	}

	fn close(&self) -> Result<(), Error> {
		Ok(())
	}
}

/// Wraps any [`Engine`] with the timestamped-record variants the
/// coordinator actually calls.
pub struct TimestampedStore {
	engine: Arc<dyn Engine>,
}

impl TimestampedStore {
	pub fn new(engine: Arc<dyn Engine>) -> Self {
		Self { engine }
	}

	pub fn get_ts(&self, key: &[u8]) -> Result<TimestampedRecord, Error> {
		match self.engine.get(key)? {
			Lookup::Found(bytes) => TimestampedRecord::decode(&bytes),
			Lookup::NotFound => Ok(TimestampedRecord::absent()),
		}
	}

	pub fn put_ts(&self, key: &[u8], value: Bytes, timestamp: i64) -> Result<(), Error> {
		let record = TimestampedRecord::value(timestamp, value);
		self.engine.upsert(key, record.encode())
	}

	/// Writes a tombstone. Never calls `remove` — the tombstone must
	/// survive so a later merge can still see its timestamp.
	pub fn delete_ts(&self, key: &[u8], timestamp: i64) -> Result<(), Error> {
		let record = TimestampedRecord::tombstone(timestamp);
		self.engine.upsert(key, record.encode())
	}

	pub fn range(&self, from: &[u8], to: Option<&[u8]>) -> Result<Vec<(Bytes, Bytes)>, Error> {
		self.engine.range(from, to)
	}

	pub fn compact(&self) -> Result<(), Error> {
		self.engine.compact()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use quorumkv_record::RecordTag;

	#[test]
	fn get_ts_on_empty_engine_is_absent() {
		let store = TimestampedStore::new(Arc::new(MemoryEngine::new()));
		assert_eq!(store.get_ts(b"k").unwrap(), TimestampedRecord::absent());
	}

	#[test]
	fn put_then_get_round_trips() {
		let store = TimestampedStore::new(Arc::new(MemoryEngine::new()));
		store.put_ts(b"k", Bytes::from_static(b"v"), 100).unwrap();
		let got = store.get_ts(b"k").unwrap();
		assert_eq!(got, TimestampedRecord::value(100, Bytes::from_static(b"v")));
	}

	#[test]
	fn delete_writes_a_tombstone_not_a_removal() {
		let store = TimestampedStore::new(Arc::new(MemoryEngine::new()));
		store.put_ts(b"k", Bytes::from_static(b"v"), 100).unwrap();
		store.delete_ts(b"k", 200).unwrap();

		let got = store.get_ts(b"k").unwrap();
		assert_eq!(got.tag, RecordTag::Deleted);
		assert_eq!(got.timestamp, 200);

		// A tombstone is a real record, distinct from a key that was
		// never written.
		assert_ne!(got, TimestampedRecord::absent());
	}

	#[test]
	fn range_is_ordered_and_respects_exclusive_end() {
		let engine = MemoryEngine::new();
		for k in ["a", "aa", "ab", "ac", "b", "c", "cc", "d"] {
			engine.upsert(k.as_bytes(), Bytes::from(k.as_bytes().to_vec())).unwrap();
		}
		let got = engine.range(b"aa", Some(b"cc")).unwrap();
		let keys: Vec<String> = got.into_iter().map(|(k, _)| String::from_utf8(k.to_vec()).unwrap()).collect();
		assert_eq!(keys, vec!["aa", "ab", "ac", "b", "c"]);
	}
}
