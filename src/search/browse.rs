use serde_json::Value;

/// href of the first link whose `rel` mentions `browse`.
///
/// Links without a string `rel` or `href` are skipped.
pub fn first_browse_href(entry: &Value) -> Option<&str> {
    entry
        .get("links")?
        .as_array()?
        .iter()
        .find(|link| {
            link.get("rel")
                .and_then(Value::as_str)
                .is_some_and(|rel| rel.contains("browse"))
        })
        .and_then(|link| link.get("href"))
        .and_then(Value::as_str)
}

/// URL of the CMR browse-scaler image for a collection
pub fn browse_scaler_url(cmr_host: &str, concept_id: &str, height: u32, width: u32) -> String {
    format!(
        "{}/browse-scaler/browse_images/datasets/{}?h={}&w={}",
        cmr_host.trim_end_matches('/'),
        concept_id,
        height,
        width
    )
}
