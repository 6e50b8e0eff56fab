use regex::Regex;

fn hash_placeholder() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"(?i)\[([^:\]]+:)?(hash|contenthash)(:[^\]]+)?\]")
      .expect("invalid hash placeholder regex")
  })
}

/// Drop a `?query` suffix from an asset name.
pub fn strip_query(name: &str) -> &str {
  name.split_once('?').map_or(name, |(path, _)| path)
}

/// Determine whether an asset name is content-derived and therefore safe to cache forever.
///
/// A name qualifies when it carries a `[hash]` or `[contenthash]` placeholder, optionally with
/// a hash function prefix or length/format modifiers (`[hash:8]`, `[sha512:contenthash:hex]`).
/// Anything after a `?` is ignored.
pub fn is_immutable_name(name: &str) -> bool {
  hash_placeholder().is_match(strip_query(name))
}
