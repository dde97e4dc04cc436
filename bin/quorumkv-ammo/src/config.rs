// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "quorumkv-ammo")]
#[command(about = "Ammo generator for load-testing a quorumkv cluster", long_about = None)]
#[command(version)]
pub struct Config {
	/// Which request pattern to emit
	#[arg(value_enum)]
	pub mode: Mode,

	/// Number of requests to emit
	pub count: u64,

	/// Host header / request-target authority
	#[arg(long, default_value = "127.0.0.1:8080")]
	pub host: String,

	/// Size of the key pool `gets_existing` draws from
	#[arg(long, default_value = "10000")]
	pub key_pool: u64,

	/// Approximate size of values generated for PUT requests
	#[arg(long, default_value = "64")]
	pub value_size: usize,

	/// Seed for deterministic ammo generation
	#[arg(long)]
	pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Mode {
	/// PUT requests, each to a key that has never appeared before
	PutsUnique,
	/// PUT requests that repeatedly overwrite the same key
	PutsOverwrite,
	/// GET requests drawn from a pool of keys assumed already written
	GetsExisting,
	/// GET requests for the single key `puts_overwrite` keeps rewriting
	GetsLatest,
	/// 80% `gets_existing` / 20% `puts_unique`
	Mixed,
}
