// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rand::{Rng, rngs::StdRng};

use super::{Item, Mode, puts_unique::random_value};
use crate::request;

/// 80% reads against the existing-key pool, 20% writes of brand-new keys.
pub struct Mixed {
	host: String,
	key_pool: u64,
	value_size: usize,
}

impl Mixed {
	pub fn new(host: String, key_pool: u64, value_size: usize) -> Self {
		Self { host, key_pool, value_size }
	}
}

impl Mode for Mixed {
	fn next(&self, rng: &mut StdRng, i: u64) -> Item {
		let roll: u8 = rng.random_range(0..100);
		if roll < 80 {
			let id = rng.random_range(0..self.key_pool.max(1));
			let key = format!("puts_unique/{id}");
			Item { verb: "get", request: request::get(&self.host, &key) }
		} else {
			let key = format!("mixed/{i}");
			let value = random_value(rng, self.value_size);
			Item { verb: "put", request: request::put(&self.host, &key, &value) }
		}
	}
}
