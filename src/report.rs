//! 再構築した遷移を表形式のレポートへ書き出す。

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::source::IssueSource;
use crate::time::format_report_timestamp;
use crate::transitions::{ReconstructOptions, TransitionEvent, Transitions, reconstruct_with};

/// CSVレポートの列
pub const CSV_HEADER: [&str; 8] = [
    "Key", "Author", "Step", "Timestamp", "From", "To", "Duration", "Count",
];

pub const SUMMARY_HEADER: [&str; 4] = ["State", "Transitions", "TotalDays", "MeanDays"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Summary,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "summary" => Ok(OutputFormat::Summary),
            other => Err(format!(
                "unknown format '{}' (expected csv, json or summary)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// JSON出力の1行
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransitionRow<'a> {
    pub key: &'a str,
    pub author: &'a str,
    pub step: u32,
    pub timestamp: String,
    pub from: &'a str,
    pub to: &'a str,
    pub duration: Option<f64>,
    pub count: u32,
}

impl<'a> From<&'a TransitionEvent> for TransitionRow<'a> {
    fn from(event: &'a TransitionEvent) -> Self {
        Self {
            key: &event.issue_key,
            author: &event.author,
            step: event.step,
            timestamp: event.timestamp.to_rfc3339(),
            from: &event.from,
            to: &event.to,
            duration: event.duration,
            count: 1,
        }
    }
}

/// 遷移元の状態ごとの滞在日数の集計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub state: String,
    pub transitions: usize,
    pub total_days: f64,
}

impl StateSummary {
    pub fn mean_days(&self) -> f64 {
        if self.transitions == 0 {
            0.0
        } else {
            self.total_days / self.transitions as f64
        }
    }
}

/// Issueを取得し、遷移を再構築する
pub async fn generate_report<S>(
    source: &S,
    jql: &str,
    options: &ReconstructOptions,
) -> Result<Transitions>
where
    S: IssueSource + ?Sized,
{
    let issues = source.fetch_issues(jql).await?;
    info!(issues = issues.len(), "reconstructing transitions");
    reconstruct_with(&issues, options)
}

/// 日数の表示形式: 整数値でも小数点を残す（`1.0`, `0.25`）
///
/// `Debug`の出力を使う。`Display`では`1.0`が`1`になる。
fn format_days(days: f64) -> String {
    format!("{:?}", days)
}

/// 指定形式でレポートを書き出す
pub fn write_report<W: Write>(
    transitions: &Transitions,
    format: OutputFormat,
    writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(transitions, writer),
        OutputFormat::Json => write_json(transitions, writer),
        OutputFormat::Summary => write_summary(&summarize(transitions), writer),
    }
}

/// Key, Author, Step, Timestamp, From, To, Duration, Count の形式で書き出す
///
/// Durationが未設定の場合は空欄。Countは常に1。
pub fn write_csv<W: Write>(transitions: &Transitions, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for event in transitions.events() {
        let step = event.step.to_string();
        let timestamp = format_report_timestamp(&event.timestamp);
        let duration = event
            .duration
            .map(format_days)
            .unwrap_or_default();
        csv.write_record([
            event.issue_key.as_str(),
            event.author.as_str(),
            step.as_str(),
            timestamp.as_str(),
            event.from.as_str(),
            event.to.as_str(),
            duration.as_str(),
            "1",
        ])?;
    }

    csv.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(transitions: &Transitions, mut writer: W) -> Result<()> {
    let rows: Vec<TransitionRow<'_>> = transitions.events().map(TransitionRow::from).collect();
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writeln!(writer)?;
    Ok(())
}

/// 経過日数が設定された遷移を遷移元の状態ごとに集計（状態名順）
pub fn summarize(transitions: &Transitions) -> Vec<StateSummary> {
    let mut by_state: BTreeMap<&str, (usize, f64)> = BTreeMap::new();

    for event in transitions.events() {
        if let Some(days) = event.duration {
            let entry = by_state.entry(event.from.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += days;
        }
    }

    by_state
        .into_iter()
        .map(|(state, (transitions, total_days))| StateSummary {
            state: state.to_string(),
            transitions,
            total_days,
        })
        .collect()
}

pub fn write_summary<W: Write>(summary: &[StateSummary], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(SUMMARY_HEADER)?;

    for row in summary {
        let transitions = row.transitions.to_string();
        let total_days = format_days(row.total_days);
        let mean_days = format_days(row.mean_days());
        csv.write_record([
            row.state.as_str(),
            transitions.as_str(),
            total_days.as_str(),
            mean_days.as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}
