//! User directory listings shaped into table pages.
//!
//! Takes the JSON the user pool returns for `ListUsers` / `AdminGetUser`,
//! flattens each user into a [`Record`], then paginates, sorts and filters
//! the page the way the CMS user table expects.

use crate::table::{FieldFilters, SortOrder, SortSpec, TableSorter, filter_by_fields};
use crate::text::camel_case;
use crate::value::{Record, Scalar};
use serde::{Deserialize, Serialize};

/// Page size when the query does not give one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One user as returned by the user pool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CognitoUser {
    pub username: String,
    #[serde(default, alias = "UserAttributes")]
    pub attributes: Vec<UserAttribute>,
    #[serde(default)]
    pub user_create_date: Option<Scalar>,
    #[serde(default)]
    pub user_last_modified_date: Option<Scalar>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub user_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserAttribute {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl UserAttribute {
    /// `custom:role` -> `role`, `email_verified` -> `emailVerified`.
    pub fn record_key(&self) -> String {
        let name = match self.name.split_once(':') {
            Some((_, rest)) => rest.split(':').next().unwrap_or(rest),
            None => &self.name,
        };
        camel_case(name)
    }
}

impl CognitoUser {
    /// Flatten into a table row. Attributes win over the fixed fields on key clashes.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("username".to_string(), Scalar::from(&self.username));
        let fixed = [
            ("userCreateDate", Scalar::from(self.user_create_date.clone())),
            ("userLastModifiedDate", Scalar::from(self.user_last_modified_date.clone())),
            ("enabled", Scalar::from(self.enabled)),
            ("userStatus", Scalar::from(self.user_status.clone())),
        ];
        for (key, value) in fixed {
            if value != Scalar::Null {
                record.insert(key.to_string(), value);
            }
        }

        // Attributes without a value are left out of the row entirely.
        for attribute in &self.attributes {
            if let Some(value) = &attribute.value {
                record.insert(attribute.record_key(), Scalar::from(value));
            }
        }
        record
    }
}

/// Query parameters of the user list endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    #[serde(default = "first_page")]
    pub current: usize,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub sort_column: Option<String>,
    #[serde(default)]
    pub sort_type: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

fn first_page() -> usize {
    1
}

impl Default for UserListQuery {
    fn default() -> Self {
        Self {
            current: first_page(),
            page_size: None,
            sort_column: None,
            sort_type: None,
            username: None,
            role: None,
        }
    }
}

impl UserListQuery {
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn filters(&self) -> FieldFilters {
        FieldFilters::new()
            .contains("username", self.username.clone())
            .exact("role", self.role.clone())
    }
}

/// One page of the user table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub list: Vec<Record>,
    pub current: usize,
    pub page_size: usize,
    /// Size of the whole directory, before paging and filtering.
    pub total: usize,
}

/// Page, flatten, sort and filter a user listing.
///
/// Paging happens before sorting and filtering, so sort and filter act on the
/// requested page only; `total` counts every user. Without an explicit sort
/// the page is ordered by username.
pub fn list_user_page(
    users: &[CognitoUser],
    query: &UserListQuery,
    sorter: &TableSorter,
) -> UserPage {
    let size = query.page_size();
    let total = users.len();

    let page: Vec<Record> = match query.current.checked_sub(1) {
        Some(index) => users
            .iter()
            .skip(index.saturating_mul(size))
            .take(size)
            .map(CognitoUser::to_record)
            .collect(),
        None => Vec::new(),
    };

    let sorted = sorter.sort(
        &page,
        query.sort_column.as_deref(),
        query.sort_type.as_deref(),
        || {
            let by_username = SortSpec {
                column: "username".to_string(),
                order: SortOrder::Ascend,
            };
            sorter.sort_by_spec(&page, &by_username)
        },
    );
    let list = filter_by_fields(&sorted, &query.filters());

    tracing::info!(total, returned = list.len(), "retrieved user page");
    UserPage {
        list,
        current: query.current,
        page_size: size,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_users() -> Vec<CognitoUser> {
        serde_json::from_str(
            r#"[
                {
                    "Username": "carol",
                    "Attributes": [
                        {"Name": "sub", "Value": "c-1"},
                        {"Name": "custom:role", "Value": "editor"}
                    ],
                    "UserCreateDate": "2023-03-01T00:00:00Z",
                    "Enabled": true,
                    "UserStatus": "CONFIRMED"
                },
                {
                    "Username": "alice",
                    "Attributes": [
                        {"Name": "email_verified", "Value": "true"},
                        {"Name": "custom:role", "Value": "admin"}
                    ],
                    "UserCreateDate": "2023-01-01T00:00:00Z",
                    "Enabled": true,
                    "UserStatus": "CONFIRMED"
                },
                {
                    "Username": "bob",
                    "Attributes": [{"Name": "custom:role", "Value": "admin"}],
                    "Enabled": false,
                    "UserStatus": "UNCONFIRMED"
                }
            ]"#,
        )
        .unwrap()
    }

    fn names(page: &UserPage) -> Vec<String> {
        page.list.iter().map(|r| r["username"].to_string()).collect()
    }

    #[test]
    fn test_to_record_flattens_attributes() {
        let users = sample_users();
        let record = users[1].to_record();
        assert_eq!(record["username"], Scalar::from("alice"));
        assert_eq!(record["role"], Scalar::from("admin"));
        assert_eq!(record["emailVerified"], Scalar::from("true"));
        assert_eq!(record["enabled"], Scalar::Bool(true));
        assert!(!record.contains_key("userLastModifiedDate"));
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let user: CognitoUser = serde_json::from_str(
            r#"{"Username": "eve", "Attributes": [{"Name": "email"}], "UserCreateDate": null}"#,
        )
        .unwrap();
        let row = serde_json::to_value(user.to_record()).unwrap();
        assert_eq!(row, serde_json::json!({"username": "eve"}));
    }

    #[test]
    fn test_admin_get_user_shape() {
        let user: CognitoUser = serde_json::from_str(
            r#"{"Username": "dan", "UserAttributes": [{"Name": "email", "Value": "d@x.io"}]}"#,
        )
        .unwrap();
        assert_eq!(user.to_record()["email"], Scalar::from("d@x.io"));
    }

    #[test]
    fn test_default_sort_is_username() {
        let page = list_user_page(&sample_users(), &UserListQuery::default(), &TableSorter::default());
        assert_eq!(names(&page), ["alice", "bob", "carol"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_sort_by_create_date_descend() {
        let query = UserListQuery {
            sort_column: Some("userCreateDate".to_string()),
            sort_type: Some("descend".to_string()),
            ..Default::default()
        };
        let page = list_user_page(&sample_users(), &query, &TableSorter::default());
        // bob has no create date and trails.
        assert_eq!(names(&page), ["carol", "alice", "bob"]);
    }

    #[test]
    fn test_filters_apply_after_paging() {
        let query = UserListQuery {
            role: Some("admin".to_string()),
            ..Default::default()
        };
        let page = list_user_page(&sample_users(), &query, &TableSorter::default());
        assert_eq!(names(&page), ["alice", "bob"]);
        assert_eq!(page.total, 3);

        let query = UserListQuery {
            current: 2,
            page_size: Some(2),
            username: Some("o".to_string()),
            ..Default::default()
        };
        let page = list_user_page(&sample_users(), &query, &TableSorter::default());
        assert_eq!(names(&page), ["bob"]);
    }

    #[test]
    fn test_query_from_json() {
        let query: UserListQuery =
            serde_json::from_str(r#"{"pageSize": 5, "sortColumn": "username"}"#).unwrap();
        assert_eq!(query.current, 1);
        assert_eq!(query.page_size(), 5);
        assert_eq!(query.sort_column.as_deref(), Some("username"));
    }

    #[test]
    fn test_page_zero_is_empty() {
        let query = UserListQuery {
            current: 0,
            ..Default::default()
        };
        let page = list_user_page(&sample_users(), &query, &TableSorter::default());
        assert!(page.list.is_empty());
        assert_eq!(page.total, 3);
    }
}
