// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

/// Quote an identifier for use in DDL or queries. Identifiers are always
/// quoted, whether or not they collide with a reserved word.
pub fn quote(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote and comma-join a list of identifiers.
pub fn quote_join<I, S>(names: I) -> String
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	names
		.into_iter()
		.map(|n| quote(n.as_ref()))
		.collect::<Vec<_>>()
		.join(", ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_quote() {
		assert_eq!(quote("roads"), "\"roads\"");
		assert_eq!(quote("select"), "\"select\"");
		assert_eq!(quote("we\"ird"), "\"we\"\"ird\"");
	}

	#[test]
	fn test_quote_join() {
		assert_eq!(quote_join(["a", "b"]), "\"a\", \"b\"");
	}
}
