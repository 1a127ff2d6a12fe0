use serde_json::Value;

/// Prefix the search application puts in front of its own tags
pub const TAG_PREFIX: &str = "edsc.extra.serverless";

/// Collections whose granules are only searchable through CWIC
pub const CWIC_TAG: &str = "org.ceos.wgiss.cwic.granules.prod";

/// Tag names on an entry.
///
/// CMR returns tags as an object keyed by tag name; older responses use a
/// plain array of names.
pub fn tag_names(entry: &Value) -> Vec<&str> {
    match entry.get("tags") {
        Some(Value::Object(tags)) => tags.keys().map(String::as_str).collect(),
        Some(Value::Array(tags)) => tags.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Exact tag lookup, no prefix applied
pub fn has_exact_tag(entry: &Value, tag: &str) -> bool {
    tag_names(entry).contains(&tag)
}

/// True if the entry carries `tag` either bare or under [`TAG_PREFIX`]
pub fn has_tag(entry: &Value, tag: &str) -> bool {
    let prefixed = format!("{TAG_PREFIX}.{tag}");
    tag_names(entry)
        .iter()
        .any(|name| *name == tag || *name == prefixed)
}
