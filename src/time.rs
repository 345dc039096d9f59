use chrono::{DateTime, FixedOffset, Timelike};

/// 遷移のタイムスタンプ（元の文字列のオフセットを保持）
pub type Timestamp = DateTime<FixedOffset>;

/// JIRAのタイムスタンプ形式: "2024-01-15T10:30:00.000+0000"
const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

const MICROSECONDS_PER_DAY: f64 = 86_400_000_000.0;

/// JIRAのタイムスタンプをパース
///
/// REST API v2の形式（`+0000`）を優先し、RFC3339（`Z`, `+00:00`）も受け付ける。
/// タイムゾーンの正規化は行わない。
pub fn parse_jira_timestamp(s: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_str(s, JIRA_TIMESTAMP_FORMAT).or_else(|err| {
        DateTime::parse_from_rfc3339(s).map_err(|_| err)
    })
}

/// `from`から`to`までの経過日数（小数）。負になる場合は0に丸める
pub fn elapsed_days(from: &Timestamp, to: &Timestamp) -> f64 {
    let delta = to.signed_duration_since(*from);
    let micros = delta
        .num_microseconds()
        .unwrap_or_else(|| delta.num_milliseconds().saturating_mul(1_000));

    if micros <= 0 {
        0.0
    } else {
        micros as f64 / MICROSECONDS_PER_DAY
    }
}

/// レポート用の表示形式: "2024-01-15 10:30:00+00:00"
///
/// 秒未満が0でない場合のみマイクロ秒6桁を付ける。
pub fn format_report_timestamp(ts: &Timestamp) -> String {
    if ts.nanosecond() / 1_000 == 0 {
        ts.format("%Y-%m-%d %H:%M:%S%:z").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()
    }
}
