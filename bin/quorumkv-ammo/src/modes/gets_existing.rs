// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rand::{Rng, rngs::StdRng};

use super::{Item, Mode};
use crate::request;

/// GET requests drawn uniformly from a key pool assumed pre-populated by a
/// prior `puts_unique` run against the same cluster.
pub struct GetsExisting {
	host: String,
	key_pool: u64,
}

impl GetsExisting {
	pub fn new(host: String, key_pool: u64) -> Self {
		Self { host, key_pool }
	}
}

impl Mode for GetsExisting {
	fn next(&self, rng: &mut StdRng, _i: u64) -> Item {
		let id = rng.random_range(0..self.key_pool.max(1));
		let key = format!("puts_unique/{id}");
		Item { verb: "get", request: request::get(&self.host, &key) }
	}
}
