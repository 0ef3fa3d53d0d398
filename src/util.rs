//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings (cuts on a char boundary).
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

/// Split a comma-separated env value into trimmed, non-empty labels.
pub fn split_labels(s: &str) -> Vec<String> {
  s.split(',').map(str::trim).filter(|p| !p.is_empty()).map(String::from).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fills_every_occurrence() {
    let out = fill_template("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and y and x");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    let s = "Dalíííí";
    let t = trunc_for_log(s, 4);
    assert!(t.starts_with("Dal"));
    assert!(t.contains("bytes total"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }

  #[test]
  fn splits_labels() {
    assert_eq!(split_labels(" Science, ,Art "), vec!["Science".to_string(), "Art".to_string()]);
    assert!(split_labels("").is_empty());
  }
}
