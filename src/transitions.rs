//! Issueのchangelogからワークフロー状態の遷移履歴を再構築する。
//!
//! 各Issueについて、作成を表す合成ステップ0と、changelogのステータス変更ごとの
//! ステップを出現順に並べ、直前のステップ（同じ状態へ遷移したもの）からの
//! 経過日数を各遷移に割り当てる。

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{History, HistoryItem, Issue, User};
use crate::time::{Timestamp, elapsed_days, parse_jira_timestamp};

/// ステップ0の遷移元ラベル
pub const CREATE_LABEL: &str = "Create";

/// 再構築された1件の遷移
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionEvent {
    pub issue_key: String,
    /// 0は作成、以降はステータス変更の出現順
    pub step: u32,
    pub author: String,
    pub timestamp: Timestamp,
    pub from: String,
    pub to: String,
    /// 遷移元の状態に入ってからの経過日数
    pub duration: Option<f64>,
}

/// 不正なIssueデータに対する扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidIssuePolicy {
    /// 最初のエラーで全体を中断
    #[default]
    Abort,
    /// 該当Issueを除外し、記録して続行
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructOptions {
    pub first_step_label: String,
    pub invalid_issue_policy: InvalidIssuePolicy,
}

impl ReconstructOptions {
    pub fn new(first_step_label: impl Into<String>) -> Self {
        Self {
            first_step_label: first_step_label.into(),
            invalid_issue_policy: InvalidIssuePolicy::default(),
        }
    }

    pub fn invalid_issue_policy(mut self, policy: InvalidIssuePolicy) -> Self {
        self.invalid_issue_policy = policy;
        self
    }
}

/// スキップされたIssueとその理由
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedIssue {
    pub issue_key: String,
    pub reason: String,
}

/// Issueキーごとの遷移一覧
///
/// キーは入力で最初に現れた順に並ぶ。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transitions {
    entries: Vec<(String, Vec<TransitionEvent>)>,
    index: HashMap<String, usize>,
    skipped: Vec<SkippedIssue>,
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, issue_key: &str) -> Option<&[TransitionEvent]> {
        self.index
            .get(issue_key)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn contains_key(&self, issue_key: &str) -> bool {
        self.index.contains_key(issue_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TransitionEvent])> {
        self.entries
            .iter()
            .map(|(key, events)| (key.as_str(), events.as_slice()))
    }

    /// 全Issueの遷移をキー順・ステップ順に平坦化
    pub fn events(&self) -> impl Iterator<Item = &TransitionEvent> {
        self.entries.iter().flat_map(|(_, events)| events.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedIssue] {
        &self.skipped
    }

    /// 同じキーが既にある場合は追加せずfalseを返す
    fn insert(&mut self, issue_key: String, events: Vec<TransitionEvent>) -> bool {
        if self.index.contains_key(&issue_key) {
            return false;
        }
        self.index.insert(issue_key.clone(), self.entries.len());
        self.entries.push((issue_key, events));
        true
    }

    fn skip(&mut self, issue_key: String, reason: String) {
        self.skipped.push(SkippedIssue { issue_key, reason });
    }
}

/// 最初のエラーで中断する再構築
pub fn reconstruct(issues: &[Issue], first_step_label: &str) -> Result<Transitions> {
    reconstruct_with(issues, &ReconstructOptions::new(first_step_label))
}

/// オプション付きの再構築
pub fn reconstruct_with(issues: &[Issue], options: &ReconstructOptions) -> Result<Transitions> {
    let mut transitions = Transitions::new();
    // スキップしたキーも含め、最初に現れたレコードのみを扱う
    let mut seen: HashSet<&str> = HashSet::new();

    for issue in issues {
        if !seen.insert(issue.key.as_str()) {
            warn!(issue_key = %issue.key, "duplicate issue in input, keeping first occurrence");
            continue;
        }

        match reconstruct_issue(issue, &options.first_step_label) {
            Ok(events) => {
                debug!(issue_key = %issue.key, steps = events.len(), "reconstructed transitions");
                transitions.insert(issue.key.clone(), events);
            }
            Err(err) if options.invalid_issue_policy == InvalidIssuePolicy::Skip
                && err.is_issue_data_error() =>
            {
                warn!(issue_key = %issue.key, error = %err, "skipping issue with invalid data");
                transitions.skip(issue.key.clone(), err.to_string());
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        issues = transitions.len(),
        skipped = transitions.skipped().len(),
        "transition reconstruction finished"
    );
    Ok(transitions)
}

/// 1件のIssueの遷移をステップ順に再構築し、経過日数を割り当てる
pub fn reconstruct_issue(issue: &Issue, first_step_label: &str) -> Result<Vec<TransitionEvent>> {
    let key = issue.key.as_str();

    if issue.changelog.as_ref().is_some_and(|c| c.is_truncated()) {
        warn!(issue_key = %key, "changelog is truncated, later status changes are missing");
    }

    let created = issue
        .fields
        .created
        .as_deref()
        .ok_or_else(|| missing_field(key, "fields.created"))?;

    let mut events = vec![TransitionEvent {
        issue_key: key.to_string(),
        step: 0,
        author: display_name(key, issue.fields.creator.as_ref(), "creator")?,
        timestamp: parse_timestamp(key, created)?,
        from: CREATE_LABEL.to_string(),
        to: first_step_label.to_string(),
        duration: None,
    }];

    let mut step = 1;
    for history in issue.histories() {
        let mut status_changes = history.status_changes().peekable();
        if status_changes.peek().is_none() {
            continue;
        }

        let (author, timestamp) = history_origin(key, history)?;
        for item in status_changes {
            let (from, to) = status_labels(key, item)?;
            events.push(TransitionEvent {
                issue_key: key.to_string(),
                step,
                author: author.clone(),
                timestamp,
                from,
                to,
                duration: None,
            });
            step += 1;
        }
    }

    assign_durations(&mut events);
    Ok(events)
}

/// ステップN-1が遷移元の状態へ入った遷移であれば、その時刻からの経過日数を設定
///
/// `events`はステップ順に連番で並んでいる前提。
fn assign_durations(events: &mut [TransitionEvent]) {
    for i in 1..events.len() {
        let (before, rest) = events.split_at_mut(i);
        let previous = &before[i - 1];
        let current = &mut rest[0];

        if previous.step + 1 == current.step && previous.to == current.from {
            current.duration = Some(elapsed_days(&previous.timestamp, &current.timestamp));
        }
    }
}

fn history_origin(key: &str, history: &History) -> Result<(String, Timestamp)> {
    let author = display_name(key, history.author.as_ref(), "changelog author")?;
    let created = history
        .created
        .as_deref()
        .ok_or_else(|| missing_field(key, "changelog.histories.created"))?;
    Ok((author, parse_timestamp(key, created)?))
}

fn status_labels(key: &str, item: &HistoryItem) -> Result<(String, String)> {
    let from = item
        .from_string
        .clone()
        .ok_or_else(|| missing_field(key, "fromString"))?;
    let to = item
        .to_string
        .clone()
        .ok_or_else(|| missing_field(key, "toString"))?;
    Ok((from, to))
}

fn display_name(key: &str, user: Option<&User>, context: &str) -> Result<String> {
    user.and_then(User::display_name)
        .map(str::to_string)
        .ok_or_else(|| Error::IncompleteAuthorInfo {
            issue_key: key.to_string(),
            context: format!("{} displayName is missing", context),
        })
}

fn parse_timestamp(key: &str, value: &str) -> Result<Timestamp> {
    parse_jira_timestamp(value).map_err(|_| Error::MalformedTimestamp {
        issue_key: key.to_string(),
        value: value.to_string(),
    })
}

fn missing_field(key: &str, field: &str) -> Error {
    Error::MissingField {
        issue_key: key.to_string(),
        field: field.to_string(),
    }
}
