// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The timestamped record: the unit actually persisted in the storage engine
//! and exchanged between coordinators, plus the codec and merge algebra that
//! give the replicated store its last-writer-wins semantics.

use bytes::Bytes;
use quorumkv_type::Error;

/// Discriminant of a [`TimestampedRecord`]. The wire values (`1`, `-1`, `0`)
/// are part of the on-disk/on-wire format and must not be renumbered.
#[repr(i8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordTag {
	Value = 1,
	Deleted = -1,
	Absent = 0,
}

/// The persisted/transferred unit: a tag, the coordinator-assigned
/// millisecond timestamp, and the value bytes when `tag == Value`.
///
/// `Absent` is never written to the engine; it is the in-memory stand-in for
/// "the engine returned not-found" while merging replica answers.
#[derive(Clone, Debug, PartialEq)]
pub struct TimestampedRecord {
	pub tag: RecordTag,
	pub timestamp: i64,
	pub value: Option<Bytes>,
}

impl TimestampedRecord {
	pub fn value(timestamp: i64, value: Bytes) -> Self {
		Self { tag: RecordTag::Value, timestamp, value: Some(value) }
	}

	pub fn tombstone(timestamp: i64) -> Self {
		Self { tag: RecordTag::Deleted, timestamp, value: None }
	}

	pub fn absent() -> Self {
		Self { tag: RecordTag::Absent, timestamp: -1, value: None }
	}

	pub fn is_absent(&self) -> bool {
		self.tag == RecordTag::Absent
	}

	/// `tag_byte ∥ int64_be(timestamp) ∥ value_bytes?`.
	pub fn encode(&self) -> Bytes {
		let value_len = match &self.value {
			Some(v) => v.len(),
			None => 0,
		};
		let mut buf = Vec::with_capacity(9 + value_len);
		buf.push(self.tag as i8 as u8);
		buf.extend_from_slice(&self.timestamp.to_be_bytes());
		if let (RecordTag::Value, Some(value)) = (self.tag, &self.value) {
			buf.extend_from_slice(value);
		}
		Bytes::from(buf)
	}

	/// Decodes an encoded record. An empty input decodes to `Absent`.
	/// Anything shorter than the fixed 9-byte header is a codec error —
	/// callers that receive this from a peer are expected to fold it
	/// into "no ack" rather than propagate it (see the coordinator).
	pub fn decode(buf: &[u8]) -> Result<Self, Error> {
		if buf.is_empty() {
			return Ok(Self::absent());
		}
		if buf.len() < 9 {
			return Err(Error::Codec(format!("record too short: {} bytes", buf.len())));
		}

		let timestamp = i64::from_be_bytes(buf[1..9].try_into().expect("8 bytes"));
		let tag_byte = buf[0] as i8;
		match tag_byte {
			1 => Ok(Self { tag: RecordTag::Value, timestamp, value: Some(Bytes::copy_from_slice(&buf[9..])) }),
			-1 => Ok(Self { tag: RecordTag::Deleted, timestamp, value: None }),
			_ => Ok(Self::absent()),
		}
	}
}

fn rank(tag: RecordTag) -> u8 {
	match tag {
		RecordTag::Value => 1,
		RecordTag::Deleted => 0,
		RecordTag::Absent => unreachable!("absent records are filtered before ranking"),
	}
}

/// Reduces a list of records drawn from replica answers to a single record:
/// drop `Absent`, then keep the maximum timestamp, breaking ties in favor of
/// `Value` over `Deleted`. Associative and commutative up to that tie-break,
/// since it is a pure fold over the total order `(timestamp, rank(tag))`.
pub fn merge(records: &[TimestampedRecord]) -> TimestampedRecord {
	records
		.iter()
		.filter(|r| !r.is_absent())
		.fold(None, |best: Option<&TimestampedRecord>, candidate| match best {
			None => Some(candidate),
			Some(current) => {
				let current_key = (current.timestamp, rank(current.tag));
				let candidate_key = (candidate.timestamp, rank(candidate.tag));
				if candidate_key > current_key {
					Some(candidate)
				} else {
					Some(current)
				}
			}
		})
		.cloned()
		.unwrap_or_else(TimestampedRecord::absent)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_value_and_tombstone() {
		let v = TimestampedRecord::value(42, Bytes::from_static(b"hello"));
		assert_eq!(TimestampedRecord::decode(&v.encode()).unwrap(), v);

		let t = TimestampedRecord::tombstone(7);
		assert_eq!(TimestampedRecord::decode(&t.encode()).unwrap(), t);
	}

	#[test]
	fn empty_input_decodes_absent() {
		assert_eq!(TimestampedRecord::decode(&[]).unwrap(), TimestampedRecord::absent());
	}

	#[test]
	fn short_input_is_a_codec_error() {
		assert!(TimestampedRecord::decode(&[1, 2, 3]).is_err());
	}

	#[test]
	fn merge_empty_is_absent() {
		assert_eq!(merge(&[]), TimestampedRecord::absent());
	}

	#[test]
	fn merge_drops_absent_and_keeps_max_timestamp() {
		let a = TimestampedRecord::value(10, Bytes::from_static(b"a"));
		let b = TimestampedRecord::value(20, Bytes::from_static(b"b"));
		let absent = TimestampedRecord::absent();
		assert_eq!(merge(&[a.clone(), b.clone(), absent]), b);
		assert_eq!(merge(&[b.clone(), a.clone()]), b);
	}

	#[test]
	fn merge_breaks_ties_in_favor_of_value_over_deleted() {
		let value = TimestampedRecord::value(100, Bytes::from_static(b"z"));
		let tombstone = TimestampedRecord::tombstone(100);
		assert_eq!(merge(&[tombstone.clone(), value.clone()]), value);
		assert_eq!(merge(&[value, tombstone]), TimestampedRecord::value(100, Bytes::from_static(b"z")));
	}

	#[test]
	fn merge_is_idempotent() {
		let r = TimestampedRecord::value(5, Bytes::from_static(b"x"));
		assert_eq!(merge(&[r.clone(), r.clone()]), r);
	}

	#[test]
	fn merge_is_associative_and_commutative_up_to_tie_break() {
		let a = TimestampedRecord::value(1, Bytes::from_static(b"a"));
		let b = TimestampedRecord::tombstone(5);
		let c = TimestampedRecord::value(5, Bytes::from_static(b"c"));

		let direct = merge(&[a.clone(), b.clone(), c.clone()]);
		let grouped = merge(&[merge(&[a.clone(), b.clone()]), c.clone()]);
		let reordered = merge(&[c.clone(), a.clone(), b.clone()]);

		assert_eq!(direct, grouped);
		assert_eq!(direct, reordered);
		assert_eq!(direct, c);
	}
}
