use serde::{Deserialize, Serialize};

use super::User;

/// ステータス変更を表すchangelogのフィールド名
pub const STATUS_FIELD: &str = "status";

/// 検索APIが返すIssue
///
/// タイムスタンプは文字列のまま保持し、解析は遷移の再構築時に行う。
/// 解析できない値をIssue単位のエラーとして報告するため。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub key: String,
    #[serde(rename = "self")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
    pub fields: IssueFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IssueFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Changelog {
    #[serde(rename = "startAt")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<u32>,
    #[serde(rename = "maxResults")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(default)]
    pub histories: Vec<History>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct History {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HistoryItem {
    pub field: String,
    #[serde(rename = "fieldtype")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "fromString")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(rename = "toString")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_string: Option<String>,
}

impl Issue {
    /// 作成日時と作成者を指定してIssueを作成
    pub fn new(key: impl Into<String>, created: impl Into<String>, creator: User) -> Self {
        Self {
            id: None,
            key: key.into(),
            self_url: None,
            fields: IssueFields {
                summary: None,
                created: Some(created.into()),
                creator: Some(creator),
            },
            changelog: None,
        }
    }

    /// changelogに履歴を追加
    pub fn with_history(mut self, history: History) -> Self {
        self.changelog
            .get_or_insert_with(Changelog::default)
            .histories
            .push(history);
        self
    }

    /// changelogの履歴（changelogが無い場合は空）
    pub fn histories(&self) -> &[History] {
        self.changelog
            .as_ref()
            .map(|c| c.histories.as_slice())
            .unwrap_or_default()
    }
}

impl Changelog {
    /// 検索結果に埋め込まれた履歴が全件ではない場合にtrue
    pub fn is_truncated(&self) -> bool {
        self.total
            .is_some_and(|total| total as usize > self.histories.len())
    }
}

impl History {
    pub fn new(author: User, created: impl Into<String>) -> Self {
        Self {
            id: None,
            author: Some(author),
            created: Some(created.into()),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: HistoryItem) -> Self {
        self.items.push(item);
        self
    }

    /// ステータス変更の項目のみを出現順に返す
    pub fn status_changes(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().filter(|item| item.is_status_change())
    }
}

impl HistoryItem {
    /// ステータス変更の項目を作成
    pub fn status(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            field: STATUS_FIELD.to_string(),
            field_type: Some("jira".to_string()),
            from: None,
            from_string: Some(from.into()),
            to: None,
            to_string: Some(to.into()),
        }
    }

    /// ステータス以外のフィールド変更を作成
    pub fn field(field: impl Into<String>, from: Option<String>, to: Option<String>) -> Self {
        Self {
            field: field.into(),
            field_type: Some("jira".to_string()),
            from: None,
            from_string: from,
            to: None,
            to_string: to,
        }
    }

    pub fn is_status_change(&self) -> bool {
        self.field == STATUS_FIELD
    }
}
