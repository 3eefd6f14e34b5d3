//! Path tokenization and list-output parsing.
//!
//! The tool prints multi-valued output as `'a' 'b' 'c'` so shell callers can
//! `eval` it into an array. We only undo the outer quoting of each token; no
//! shell-quote parsing is attempted.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a token wrapped in one pair of single quotes. Greedy, so
/// `'a'b'` captures `a'b`.
static QUOTED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^'(.*)'$").expect("valid regex"));

/// Split a config path into its tokens. No validation is done here.
///
/// # Examples
///
/// ```
/// use cstore_query::parse::path_tokens;
///
/// assert_eq!(path_tokens("interfaces  ethernet eth0"), vec!["interfaces", "ethernet", "eth0"]);
/// assert!(path_tokens("").is_empty());
/// ```
pub fn path_tokens(path: &str) -> Vec<&str> {
    path.split_whitespace().collect()
}

/// Strip exactly one layer of surrounding single quotes from a token.
pub fn unquote(token: &str) -> &str {
    QUOTED_TOKEN
        .captures(token)
        .and_then(|caps| caps.get(1))
        .map_or(token, |m| m.as_str())
}

/// Split whitespace-separated output into tokens, unquoting each once.
/// Emission order is preserved.
///
/// Only ASCII whitespace separates tokens; a node name may carry e.g. a
/// no-break space inside its quotes.
///
/// # Examples
///
/// ```
/// use cstore_query::split_quoted;
///
/// assert_eq!(split_quoted("'eth0' 'eth1'"), vec!["eth0", "eth1"]);
/// assert!(split_quoted("").is_empty());
/// ```
pub fn split_quoted(output: &str) -> Vec<String> {
    output
        .split_ascii_whitespace()
        .map(|token| unquote(token).to_string())
        .collect()
}
