// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rand::rngs::StdRng;

use super::{Item, Mode, puts_overwrite::HOT_KEY};
use crate::request;

/// Repeated GETs of the single key a `puts_overwrite` run keeps rewriting —
/// exercises merge under a hot, frequently-overwritten key.
pub struct GetsLatest {
	host: String,
}

impl GetsLatest {
	pub fn new(host: String) -> Self {
		Self { host }
	}
}

impl Mode for GetsLatest {
	fn next(&self, _rng: &mut StdRng, _i: u64) -> Item {
		Item { verb: "get", request: request::get(&self.host, HOT_KEY) }
	}
}
