/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Cast summary for a list row: the first `shown` names, then "+N".
pub fn format_cast(cast: &[String], shown: usize) -> String {
  if cast.len() <= shown {
    return cast.join(", ");
  }
  format!("{} +{}", cast[..shown].join(", "), cast.len() - shown)
}
