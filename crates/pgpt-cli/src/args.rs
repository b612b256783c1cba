//! Flat-token argument extraction.
//!
//! Command tokens are never handed to clap: the server protocol predates it
//! and relies on a tiny grammar where a flag is followed by one value, by a
//! run of values, or by nothing at all. Every lookup scans the whole slice and
//! honours the first occurrence of a flag only.

/// Prefix marking a token as a flag name.
pub(crate) const FLAG_PREFIX: &str = "--";

/// Value extracted for a single catalog field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArgumentValue {
    Single(String),
    Flag(bool),
    List(Vec<String>),
}

/// Returns the token following the first exact match of `flag`.
///
/// A flag in last position has no value and yields `None`.
pub(crate) fn get_single<'a>(tokens: &'a [String], flag: &str) -> Option<&'a str> {
    let position = tokens.iter().position(|token| token == flag)?;
    tokens.get(position + 1).map(String::as_str)
}

/// Reports whether `flag` appears anywhere in `tokens`.
pub(crate) fn get_flag(tokens: &[String], flag: &str) -> bool {
    tokens.iter().any(|token| token == flag)
}

/// Collects the tokens after the first `flag` up to the next flag.
pub(crate) fn get_list<'a>(tokens: &'a [String], flag: &str) -> Vec<&'a str> {
    let Some(position) = tokens.iter().position(|token| token == flag) else {
        return Vec::new();
    };
    tokens
        .iter()
        .skip(position + 1)
        .take_while(|token| !token.starts_with(FLAG_PREFIX))
        .map(String::as_str)
        .collect()
}
