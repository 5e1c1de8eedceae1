use dynexpr::prelude::*;
use pretty_assertions::assert_eq;

fn records(raw: &str) -> Vec<Record> {
    serde_json::from_str(raw).expect("Failed to parse records")
}

fn column(rows: &[Record], field: &str) -> Vec<String> {
    rows.iter()
        .map(|r| r.get(field).map(ToString::to_string).unwrap_or_default())
        .collect()
}

#[test]
fn test_sort_then_filter_page() {
    let rows = records(
        r#"[
            {"title": "Tram map", "sequence": "3", "lang": "en"},
            {"title": "Ferry times", "sequence": "12", "lang": "en"},
            {"title": "Bus routes", "lang": "zh"},
            {"title": "Tram fares", "sequence": 1, "lang": "zh"}
        ]"#,
    );

    let sorted = sort_records(&rows, Some("sequence"), Some("ascend"), Vec::new);
    assert_eq!(
        column(&sorted, "title"),
        ["Tram fares", "Tram map", "Ferry times", "Bus routes"]
    );

    let filters = FieldFilters::new().contains("title", "Tram").exact("lang", "en");
    let kept = filter_by_fields(&sorted, &filters);
    assert_eq!(column(&kept, "title"), ["Tram map"]);
}

#[test]
fn test_sort_does_not_touch_input() {
    let rows = records(
        r#"[
            {"createdTime": "2023-01-02"},
            {"createdTime": null},
            {"createdTime": "2023-01-01"}
        ]"#,
    );
    let snapshot = rows.clone();

    let once = sort_records(&rows, Some("createdTime"), Some("ascend"), Vec::new);
    let twice = sort_records(&rows, Some("createdTime"), Some("ascend"), Vec::new);

    assert_eq!(column(&once, "createdTime"), ["2023-01-01", "2023-01-02", "null"]);
    assert_eq!(once, twice);
    assert_eq!(rows, snapshot);
}

#[test]
fn test_default_sort_strategy() {
    let rows = records(
        r#"[
            {"id": "a", "createdTime": "2023-01-01"},
            {"id": "b", "createdTime": "2023-01-03"},
            {"id": "c", "createdTime": "2022-12-01", "modifiedTime": "2023-02-01"}
        ]"#,
    );

    let sorted = sort_records(&rows, None, None, || {
        sort_by_modified_or_created(&rows, SortOrder::Descend)
    });
    assert_eq!(column(&sorted, "id"), ["c", "b", "a"]);
}

#[test]
fn test_user_page_envelope() {
    let users: Vec<CognitoUser> = serde_json::from_str(
        r#"[
            {"Username": "zoe", "Attributes": [{"Name": "custom:role", "Value": "admin"}]},
            {"Username": "yan", "Attributes": [{"Name": "custom:role", "Value": "editor"}]}
        ]"#,
    )
    .unwrap();

    let query: UserListQuery = serde_json::from_str(r#"{"current": 1, "pageSize": 10}"#).unwrap();
    let page = list_user_page(&users, &query, &TableSorter::default());
    let body = serde_json::to_value(ApiResponse::success(page)).unwrap();

    assert_eq!(body["message"], "SUCCESS");
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["pageSize"], 10);
    assert_eq!(body["data"]["list"][0]["username"], "yan");
    assert_eq!(body["data"]["list"][1]["role"], "admin");
}
