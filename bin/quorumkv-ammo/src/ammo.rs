// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The size-prefixed ammo wire format: `<N> <verb>\n<request>\r\n`, where `N`
//! is the byte length of `request` and `verb` tags the line for downstream
//! per-verb statistics.

pub fn format(verb: &str, request: &str) -> String {
	format!("{} {verb}\n{request}\r\n", request.len())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn size_prefix_matches_request_byte_length() {
		let request = "GET /v0/status HTTP/1.1\r\n\r\n";
		let ammo = format("get", request);
		let (size, rest) = ammo.split_once(' ').unwrap();
		assert_eq!(size.parse::<usize>().unwrap(), request.len());
		assert!(rest.starts_with("get\n"));
	}
}
