// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod gets_existing;
mod gets_latest;
mod mixed;
mod puts_overwrite;
mod puts_unique;

pub use gets_existing::GetsExisting;
pub use gets_latest::GetsLatest;
pub use mixed::Mixed;
pub use puts_overwrite::PutsOverwrite;
pub use puts_unique::PutsUnique;
use rand::rngs::StdRng;

use crate::config::{Config, Mode as ModePreset};

/// One generated ammo item: the verb tag and the raw HTTP request text.
pub struct Item {
	pub verb: &'static str,
	pub request: String,
}

/// Generates the `i`-th request of a sequence. Implementations are pure
/// functions of `(rng, i)`, not stateful workers — `quorumkv-ammo` has no
/// notion of a live connection to track state against.
pub trait Mode {
	fn next(&self, rng: &mut StdRng, i: u64) -> Item;
}

pub fn create_mode(preset: ModePreset, config: &Config) -> Box<dyn Mode> {
	match preset {
		ModePreset::PutsUnique => Box::new(PutsUnique::new(config.host.clone(), config.value_size)),
		ModePreset::PutsOverwrite => Box::new(PutsOverwrite::new(config.host.clone(), config.value_size)),
		ModePreset::GetsExisting => Box::new(GetsExisting::new(config.host.clone(), config.key_pool)),
		ModePreset::GetsLatest => Box::new(GetsLatest::new(config.host.clone())),
		ModePreset::Mixed => Box::new(Mixed::new(config.host.clone(), config.key_pool, config.value_size)),
	}
}
