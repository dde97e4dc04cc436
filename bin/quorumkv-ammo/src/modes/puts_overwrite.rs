// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rand::rngs::StdRng;

use super::{Item, Mode, puts_unique::random_value};
use crate::request;

/// PUT requests that all rewrite the same key, exercising last-writer-wins.
pub struct PutsOverwrite {
	host: String,
	value_size: usize,
}

impl PutsOverwrite {
	pub fn new(host: String, value_size: usize) -> Self {
		Self { host, value_size }
	}
}

/// The fixed key `puts_overwrite` and `gets_latest` share.
pub const HOT_KEY: &str = "puts_overwrite/hot";

impl Mode for PutsOverwrite {
	fn next(&self, rng: &mut StdRng, _i: u64) -> Item {
		let value = random_value(rng, self.value_size);
		Item { verb: "put", request: request::put(&self.host, HOT_KEY, &value) }
	}
}
