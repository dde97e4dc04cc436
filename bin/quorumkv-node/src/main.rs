// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod config;

use std::sync::Arc;

use clap::Parser;
use config::NodeConfig;
use quorumkv_cluster::ClusterTopology;
use quorumkv_coordinator::Coordinator;
use quorumkv_server::{AppState, router};
use quorumkv_store::{MemoryEngine, TimestampedStore};
use quorumkv_transport::HttpPeerTransport;
use tracing_subscriber::EnvFilter;

fn main() {
	tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();

	tokio::runtime::Builder::new_multi_thread()
		.worker_threads(num_cpus::get())
		.thread_name("quorumkv-node")
		.enable_all()
		.build()
		.expect("tokio runtime configuration is valid")
		.block_on(async_main());
}

async fn async_main() {
	let config = NodeConfig::parse();
	let peers = config.peers();

	let topology = Arc::new(ClusterTopology::new(peers, &config.self_origin).unwrap_or_else(|error| {
		tracing::error!(%error, "invalid cluster configuration");
		std::process::exit(1);
	}));

	// The data directory is reserved for a persistent `Engine` implementation;
	// the shipped `MemoryEngine` does not touch disk, so it is only logged here.
	tracing::info!(data_dir = %config.data_dir.display(), port = config.port, self_origin = %config.self_origin, nodes = topology.len(), "starting quorumkv-node");

	let store = Arc::new(TimestampedStore::new(Arc::new(MemoryEngine::new())));
	let transport = Arc::new(HttpPeerTransport::new());
	let coordinator = Arc::new(Coordinator::new(topology.clone(), store.clone(), transport));

	let app = router(AppState { topology, store, coordinator });

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await.unwrap_or_else(|error| {
		tracing::error!(%error, port = config.port, "failed to bind listener");
		std::process::exit(1);
	});

	axum::serve(listener, app).await.unwrap_or_else(|error| {
		tracing::error!(%error, "server exited");
		std::process::exit(1);
	});
}
