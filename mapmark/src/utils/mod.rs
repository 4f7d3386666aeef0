pub mod location;

/// Trimmed `Some(string)` if the string is not empty, else `None`
pub fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(|s| s.trim())
        .and_then(|s| if s.is_empty() { None } else { Some(s.into()) })
}

#[test]
fn test_non_empty() {
    assert_eq!(non_empty(Some("  Manila ")), Some("Manila".to_string()));
    assert_eq!(non_empty(Some("   ")), None);
    assert_eq!(non_empty(None), None);
}
