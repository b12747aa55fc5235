//! Conversion of command-line strings into launcher values

use anyhow::{Context, Result};

/// Parse a JVM heap size (e.g., "512m", "8g", "16384m", "1073741824") to bytes
///
/// Accepts what `-Xmx` accepts: decimal digits with an optional k/m/g/t
/// suffix in either case. Zero is rejected.
pub fn parse_heap_size(s: &str) -> Result<u64> {
    let s = s.trim();
    anyhow::ensure!(!s.is_empty(), "empty heap size");

    let (num_str, multiplier) = match s.chars().last().map(|c| c.to_ascii_lowercase()) {
        Some('k') => (&s[..s.len() - 1], 1024u64),
        Some('m') => (&s[..s.len() - 1], 1024 * 1024),
        Some('g') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        Some('t') => (&s[..s.len() - 1], 1024 * 1024 * 1024 * 1024),
        _ => (s, 1),
    };

    anyhow::ensure!(
        !num_str.is_empty() && num_str.bytes().all(|b| b.is_ascii_digit()),
        "invalid heap size format: {}",
        s
    );

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("invalid heap size format: {}", s))?;
    anyhow::ensure!(num > 0, "heap size must be non-zero: {}", s);

    num.checked_mul(multiplier)
        .with_context(|| format!("heap size too large: {}", s))
}
