use super::Issue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SearchParams {
    #[serde(rename = "startAt")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<u32>,

    #[serde(rename = "maxResults")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "startAt")]
    #[serde(default)]
    pub start_at: u32,

    #[serde(rename = "maxResults")]
    #[serde(default)]
    pub max_results: u32,

    pub total: u32,

    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// 遷移の再構築に必要なexpand（transitions, changelog）を付けた検索条件
    pub fn for_transitions() -> Self {
        Self::new().expand(vec!["transitions".to_string(), "changelog".to_string()])
    }

    pub fn start_at(mut self, start_at: u32) -> Self {
        self.start_at = Some(start_at);
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn expand(mut self, expand: Vec<String>) -> Self {
        self.expand = Some(expand);
        self
    }

    /// GET /search 用のクエリパラメータに変換（リストはカンマ区切り）
    pub fn to_query(&self, jql: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![("jql", jql.to_string())];

        if let Some(start_at) = self.start_at {
            query.push(("startAt", start_at.to_string()));
        }
        if let Some(max_results) = self.max_results {
            query.push(("maxResults", max_results.to_string()));
        }
        if let Some(fields) = &self.fields {
            query.push(("fields", fields.join(",")));
        }
        if let Some(expand) = &self.expand {
            query.push(("expand", expand.join(",")));
        }

        query
    }
}
