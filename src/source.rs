use async_trait::async_trait;

use crate::{Issue, JiraClient, error::Result};

/// 遷移の再構築に渡すIssueの取得元
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// JQLに一致するIssueをchangelog付きで全件取得
    async fn fetch_issues(&self, jql: &str) -> Result<Vec<Issue>>;
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn fetch_issues(&self, jql: &str) -> Result<Vec<Issue>> {
        self.fetch_all_issues(jql).await
    }
}

/// 取得済みのIssueをそのまま返す（JQLは無視する）
#[async_trait]
impl IssueSource for Vec<Issue> {
    async fn fetch_issues(&self, _jql: &str) -> Result<Vec<Issue>> {
        Ok(self.clone())
    }
}
