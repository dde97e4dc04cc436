// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "quorumkv-node")]
#[command(about = "A sharded, replicated key/value store node", long_about = None)]
#[command(version)]
pub struct NodeConfig {
	/// Directory the local storage engine persists to.
	#[arg(long, env = "QUORUMKV_DATA_DIR", default_value = "./data")]
	pub data_dir: PathBuf,

	/// Port this node listens on.
	#[arg(long, env = "QUORUMKV_PORT", default_value = "8080")]
	pub port: u16,

	/// This node's own origin, as it appears in `--peers`.
	#[arg(long, env = "QUORUMKV_SELF")]
	pub self_origin: String,

	/// Comma-separated list of peer origins, including `self`.
	#[arg(long, env = "QUORUMKV_PEERS", value_delimiter = ',')]
	pub peers: Vec<String>,
}

impl NodeConfig {
	pub fn peers(&self) -> Vec<String> {
		self.peers.clone()
	}
}
