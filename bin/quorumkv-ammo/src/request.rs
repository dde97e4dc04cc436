// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Raw HTTP/1.1 request text for the three entity verbs. Pure formatting —
//! nothing here opens a socket.

pub fn get(host: &str, key: &str) -> String {
	format!("GET /v0/entity?id={key} HTTP/1.1\r\nHost: {host}\r\nConnection: keep-alive\r\n\r\n")
}

pub fn put(host: &str, key: &str, value: &str) -> String {
	format!(
		"PUT /v0/entity?id={key} HTTP/1.1\r\nHost: {host}\r\nConnection: keep-alive\r\nContent-Length: {}\r\n\r\n{value}",
		value.len()
	)
}
