use serde::{Deserialize, Serialize};

/// Issueの作成者・変更者
///
/// Jira CloudはaccountId、Server/Data Centerはname/keyで識別する。
/// レポートに必要なのはdisplayNameのみ。
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct User {
    #[serde(rename = "accountId")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "displayName")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl User {
    pub fn with_display_name(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            ..Self::default()
        }
    }

    /// 空文字列のdisplayNameは欠落として扱う
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_deserialization() {
        let json_data = json!({
            "accountId": "557058:f58131cb-b67d-43c7-b30d-6b58d40bd077",
            "displayName": "Test User",
            "emailAddress": "test@example.com",
            "self": "https://example.atlassian.net/rest/api/2/user?accountId=557058:f58131cb",
            "active": true,
            "timeZone": "America/Los_Angeles"
        });

        let user: User = serde_json::from_value(json_data).unwrap();

        assert_eq!(
            user.account_id.as_deref(),
            Some("557058:f58131cb-b67d-43c7-b30d-6b58d40bd077")
        );
        assert_eq!(user.display_name(), Some("Test User"));
        assert_eq!(user.active, Some(true));
    }

    #[test]
    fn test_user_without_display_name() {
        let user: User = serde_json::from_value(json!({ "name": "jdoe", "displayName": "" })).unwrap();

        assert_eq!(user.name.as_deref(), Some("jdoe"));
        assert_eq!(user.display_name(), None);
    }
}
