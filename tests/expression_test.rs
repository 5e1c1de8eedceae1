use dynexpr::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn params(raw: &str) -> ParamSet {
    serde_json::from_str(raw).expect("Failed to parse params")
}

#[test]
fn test_update_from_request_body() {
    let body = params(r#"{"name": "Alice", "age": 30, "nickname": "", "deleted": null}"#);
    let update = build_update_expression(&body);

    assert_eq!(
        update.to_update_input(),
        json!({
            "UpdateExpression": "set #Key0 = :Value0,#Key1 = :Value1,#Key2 = :Value2",
            "ExpressionAttributeNames": {"#Key0": "name", "#Key1": "age", "#Key2": "nickname"},
            "ExpressionAttributeValues": {":Value0": "Alice", ":Value1": 30, ":Value2": ""}
        })
    );
}

#[test]
fn test_values_never_reach_expression_text() {
    let body = params(r#"{"title": "x = 1 or attribute_exists(pk)", "role": "admin"}"#);
    let update = build_update_expression(&body);
    let search = build_fuzzy_or_exact_filter_expression(&body).unwrap();

    for expression in [&update.expression, &search.expression] {
        assert!(!expression.contains("attribute_exists"));
        assert!(!expression.contains("admin"));
    }
}

#[test]
fn test_scan_filter_request() {
    let filter = build_exact_filter_expression(
        &params(r#"{"status": "open", "pinned": false}"#),
        &params(r#"{"title": "news", "author": ""}"#),
    )
    .expect("Expected a filter");

    assert_eq!(
        filter.to_filter_input(),
        json!({
            "FilterExpression": "#status = :Value0 and #pinned = :Value1 and ( contains(#title, :val0) )",
            "ExpressionAttributeNames": {"#status": "status", "#pinned": "pinned", "#title": "title"},
            "ExpressionAttributeValues": {":Value0": "open", ":Value1": false, ":val0": "news"}
        })
    );
}

#[test]
fn test_fuzzy_only_scan_needs_opt_in() {
    let fuzzy = params(r#"{"city": "Hong"}"#);
    assert_eq!(build_exact_filter_expression(&ParamSet::new(), &fuzzy), None);

    let filter = build_filter_expression(&ParamSet::new(), &fuzzy, FuzzyGate::Independent)
        .expect("Expected a filter");
    assert_eq!(filter.expression, "( contains(#city, :val0) )");
}

#[test]
fn test_search_with_configured_table() {
    let config = DynexprConfig::from_toml_str(
        r#"
        [search]
        in_list_fields = ["District"]
        exact_fields = ["channelId", "lang"]
        "#,
    )
    .unwrap();

    let body = params(r#"{"District": "Central,Wan Chai", "lang": "en", "keyword": "tram"}"#);
    let filter = build_search_expression(&body, &config.strategy_table()).unwrap();

    assert_eq!(
        filter.expression,
        "#District in (:ids_0,:ids_1) and #lang = :Value1 and contains(#keyword, :Value2)"
    );
    assert_eq!(filter.attribute_values[":ids_1"], Scalar::from("Wan Chai"));
}
