//! Tests for collection request preparation and response shaping

mod common;

use cmr_search::search::adapters::CollectionRequest;
use cmr_search::search::params::SearchParams;
use cmr_search::search::{RequestAdapter, RequestBody};
use common::test_config;
use serde_json::json;

fn anonymous() -> CollectionRequest {
    CollectionRequest::new(&test_config(), None)
}

#[test]
fn test_anonymous_request_targets_public_cmr() {
    let request = anonymous();
    let config = request.request_config();

    assert!(!config.authenticated);
    assert_eq!(config.base_host, "https://cmr.earthdata.nasa.gov");
    assert_eq!(config.search_path, "search/collections");
    assert_eq!(request.target_path("json"), "search/collections.json");
    assert_eq!(request.target_path("umm_json"), "search/collections.umm_json");
}

#[test]
fn test_authenticated_request_targets_api_host() {
    let request = CollectionRequest::new(&test_config(), Some("token-123"));
    let config = request.request_config();

    assert!(config.authenticated);
    assert_eq!(config.base_host, "http://localhost:3001");
    assert_eq!(request.target_path("json"), "collections/json");
}

#[test]
fn test_non_indexed_keys() {
    let request = anonymous();
    assert!(request.non_indexed_keys().contains(&"concept_id"));
    assert!(request.non_indexed_keys().contains(&"sort_key"));
    assert!(!request.non_indexed_keys().contains(&"point"));
}

#[test]
fn test_prepare_form_request() {
    let request = anonymous();
    let params = SearchParams::new()
        .with("keyword", "MODIS")
        .with("conceptId", json!(["C1-PROV", "C2-PROV"]))
        .with("pageSize", 20)
        .with("notAllowed", "dropped");

    let prepared = request.prepare(&params, "json");

    assert_eq!(
        prepared.url,
        "https://cmr.earthdata.nasa.gov/search/collections.json"
    );
    assert_eq!(
        prepared.header("Accept"),
        Some("application/vnd.nasa.cmr.umm_results+json; version=1.15.3")
    );
    assert!(prepared.header("Authorization").is_none());
    assert_eq!(
        prepared.body,
        RequestBody::Form(
            "keyword=MODIS&page_size=20&concept_id%5B%5D=C1-PROV&concept_id%5B%5D=C2-PROV"
                .to_string()
        )
    );
}

#[test]
fn test_prepare_umm_json_only_sends_concept_id() {
    let request = anonymous();
    let params = SearchParams::new()
        .with("concept_id", "C1-PROV")
        .with("keyword", "MODIS");

    let prepared = request.prepare(&params, "umm_json");
    assert_eq!(
        prepared.body,
        RequestBody::Form("concept_id=C1-PROV".to_string())
    );
}

#[test]
fn test_prepare_authenticated_json_request() {
    let request = CollectionRequest::new(&test_config(), Some("token-123"));
    let params = SearchParams::new().with("keyword", "MODIS").with("bogus", 1);

    let prepared = request.prepare(&params, "json");

    assert_eq!(prepared.url, "http://localhost:3001/collections/json");
    assert_eq!(prepared.header("Authorization"), Some("Bearer token-123"));
    assert_eq!(
        prepared.body,
        RequestBody::Json(json!({ "params": { "keyword": "MODIS" }, "ext": "json" }))
    );
}

#[test]
fn test_two_d_coordinates_stripped_without_mutating_caller() {
    let request = anonymous();
    let params = SearchParams::new().with(
        "twoDCoordinateSystem",
        json!({ "name": "MISR", "coordinates": "1:2" }),
    );

    let prepared = request.prepare(&params, "json");

    assert_eq!(
        prepared.body,
        RequestBody::Form("two_d_coordinate_system%5Bname%5D=MISR".to_string())
    );
    assert_eq!(
        params.get("twoDCoordinateSystem"),
        Some(&json!({ "name": "MISR", "coordinates": "1:2" }))
    );
}

#[test]
fn test_non_200_status_passes_through() {
    let input = json!({ "statusCode": 500, "feed": { "entry": [{ "id": "C1" }] } });
    assert_eq!(anonymous().transform_response(input.clone()), input);
}

#[test]
fn test_empty_response_passes_through() {
    assert_eq!(anonymous().transform_response(json!({})), json!({}));
    assert_eq!(anonymous().transform_response(json!(null)), json!(null));
}

#[test]
fn test_cwic_flag() {
    let output = anonymous().transform_response(json!({
        "feed": { "entry": [
            { "id": "C1", "has_granules": false, "tags": { "org.ceos.wgiss.cwic.granules.prod": {} } },
            { "id": "C2", "has_granules": true, "tags": { "org.ceos.wgiss.cwic.granules.prod": {} } },
            { "id": "C3", "has_granules": false }
        ] }
    }));

    let entries = output["feed"]["entry"].as_array().unwrap();
    assert_eq!(entries[0]["is_cwic"], json!(true));
    assert_eq!(entries[1]["is_cwic"], json!(false));
    assert_eq!(entries[2]["is_cwic"], json!(false));
}

#[test]
fn test_map_imagery_and_nrt_flags() {
    let output = anonymous().transform_response(json!({
        "feed": { "entry": [
            { "id": "C1", "collection_data_type": "NEAR_REAL_TIME", "tags": { "edsc.extra.serverless.gibs": {} } },
            { "id": "C2", "collection_data_type": "SCIENCE_QUALITY", "tags": ["gibs"] },
            { "id": "C3" }
        ] }
    }));

    let entries = output["feed"]["entry"].as_array().unwrap();
    assert_eq!(entries[0]["has_map_imagery"], json!(true));
    assert_eq!(entries[0]["is_nrt"], json!(true));
    assert_eq!(entries[1]["has_map_imagery"], json!(true));
    assert_eq!(entries[1]["is_nrt"], json!(false));
    assert_eq!(entries[2]["has_map_imagery"], json!(false));
    assert_eq!(entries[2]["is_nrt"], json!(false));
}

#[test]
fn test_thumbnail_selection() {
    let output = anonymous().transform_response(json!({
        "items": [
            {
                "id": "C1",
                "browse_flag": true,
                "links": [{ "rel": "http://esipfed.org/ns/fedsearch/1.1/browse#", "href": "http://x/browse.png" }]
            },
            { "id": "C2", "browse_flag": true, "links": [] },
            { "id": "C3", "browse_flag": false }
        ]
    }));

    let entries = output["items"].as_array().unwrap();
    assert_eq!(entries[0]["thumbnail"], json!("http://x/browse.png"));
    assert_eq!(
        entries[1]["thumbnail"],
        json!("https://cmr.earthdata.nasa.gov/browse-scaler/browse_images/datasets/C2?h=85&w=85")
    );
    assert_eq!(entries[2]["thumbnail"], json!("image-unavailable.svg"));
}

#[test]
fn test_other_fields_are_preserved() {
    let output = anonymous().transform_response(json!({
        "feed": { "updated": "2020-01-01", "entry": [{ "id": "C1", "title": "A collection" }] }
    }));

    assert_eq!(output["feed"]["updated"], json!("2020-01-01"));
    assert_eq!(output["feed"]["entry"][0]["title"], json!("A collection"));
}

#[test]
fn test_null_items_falls_back_to_feed_entry() {
    let output = anonymous().transform_response(json!({
        "items": null,
        "feed": { "entry": [{ "id": "C1", "browse_flag": false }] }
    }));

    let entry = &output["feed"]["entry"][0];
    assert_eq!(entry["is_cwic"], json!(false));
    assert_eq!(entry["is_nrt"], json!(false));
    assert_eq!(entry["has_map_imagery"], json!(false));
    assert_eq!(entry["thumbnail"], json!("image-unavailable.svg"));
}

#[test]
fn test_float_200_status_is_transformed() {
    let output = anonymous().transform_response(json!({
        "statusCode": 200.0,
        "items": [{ "id": "C1" }]
    }));

    assert_eq!(output["items"][0]["thumbnail"], json!("image-unavailable.svg"));
    assert_eq!(output["items"][0]["is_cwic"], json!(false));
}

#[test]
fn test_empty_id_gets_no_thumbnail() {
    let output = anonymous().transform_response(json!({
        "feed": { "entry": [{ "id": "", "browse_flag": true }] }
    }));

    assert!(output["feed"]["entry"][0].get("thumbnail").is_none());
}
