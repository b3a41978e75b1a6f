use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::model::UNKNOWN_TIMESTAMP;

/// Display format of every timestamp on the site
const SITE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Labels that may prefix an update line
const UPDATE_LABELS: &[&str] = &["最近更新", "更新时间"];

/// The site displays unzoned civil time in China Standard Time (UTC+8)
fn site_offset() -> Option<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
}

/// Parses `YYYY-MM-DD HH:MM:SS` site time to epoch seconds
pub fn parse_site_timestamp(text: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), SITE_TIME_FORMAT).ok()?;
    naive
        .and_local_timezone(site_offset()?)
        .single()
        .map(|dt| dt.timestamp())
}

/// Formats epoch seconds back to site time, `"未知时间"` when unknown
pub fn format_timestamp(ts: i64) -> String {
    if ts <= 0 {
        return "未知时间".to_string();
    }
    match (DateTime::from_timestamp(ts, 0), site_offset()) {
        (Some(utc), Some(offset)) => utc
            .with_timezone(&offset)
            .format(SITE_TIME_FORMAT)
            .to_string(),
        _ => "未知时间".to_string(),
    }
}

/// Splits a book page's update line into `(chapter title, epoch seconds)`
///
/// Two layouts are recognized after an optional `最近更新：` / `更新时间：`
/// label:
///
/// - `2019-08-05 23:39:07 / 571 少女的膝枕` (slash separated)
/// - `2019-08-05 23:39:07 571 少女的膝枕` (first two tokens are the time)
///
/// A line with fewer than two tokens yields `("", -1)`. An unparseable time
/// yields `-1` while still returning the chapter part.
pub fn parse_update_text(text: &str) -> (String, i64) {
    let text = strip_update_label(text.trim());
    if text.is_empty() {
        return (String::new(), UNKNOWN_TIMESTAMP);
    }

    let (time_part, chapter_part) = match text.split_once('/') {
        Some((time, chapter)) => (time.trim().to_string(), chapter.trim().to_string()),
        None => {
            let parts: Vec<&str> = text.split_whitespace().collect();
            if parts.len() < 2 {
                return (String::new(), UNKNOWN_TIMESTAMP);
            }
            (parts[..2].join(" "), parts[2..].join(" "))
        }
    };

    let ts = parse_site_timestamp(&time_part).unwrap_or(UNKNOWN_TIMESTAMP);
    (chapter_part, ts)
}

fn strip_update_label(text: &str) -> &str {
    for label in UPDATE_LABELS {
        if let Some(rest) = text.strip_prefix(label) {
            if let Some(rest) = rest
                .strip_prefix(':')
                .or_else(|| rest.strip_prefix('：'))
            {
                return rest.trim_start();
            }
        }
    }
    text
}
