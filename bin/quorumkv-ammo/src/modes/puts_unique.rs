// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rand::{Rng, rngs::StdRng};

use super::{Item, Mode};
use crate::request;

/// PUT requests, one per never-before-seen key (`puts_unique/{i}`).
pub struct PutsUnique {
	host: String,
	value_size: usize,
}

impl PutsUnique {
	pub fn new(host: String, value_size: usize) -> Self {
		Self { host, value_size }
	}
}

impl Mode for PutsUnique {
	fn next(&self, rng: &mut StdRng, i: u64) -> Item {
		let key = format!("puts_unique/{i}");
		let value = random_value(rng, self.value_size);
		Item { verb: "put", request: request::put(&self.host, &key, &value) }
	}
}

pub(super) fn random_value(rng: &mut StdRng, size: usize) -> String {
	(0..size).map(|_| rng.random_range(b'a'..=b'z') as char).collect()
}
