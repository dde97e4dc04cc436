// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod ammo;
mod config;
mod modes;
mod request;

use std::io::{self, Write};

use clap::Parser;
use config::Config;
use modes::create_mode;
use rand::{SeedableRng, rngs::StdRng};

fn main() {
	let config = Config::parse();
	let seed = config.seed.unwrap_or_else(rand::random);
	let mut rng = StdRng::seed_from_u64(seed);
	let mode = create_mode(config.mode, &config);

	let stdout = io::stdout();
	let mut out = stdout.lock();

	for i in 0..config.count {
		let item = mode.next(&mut rng, i);
		let line = ammo::format(item.verb, &item.request);
		if out.write_all(line.as_bytes()).is_err() {
			// Downstream reader (e.g. a pipe into a load generator) hung up.
			break;
		}
	}
}
