/*
 * Responsibility
 * - 監査ログ読み出し (/logs, /users/{id}/activity) の query DTO
 * - 値は文字列で受け, ここで解釈する (limit は既定値に戻す, 日時は 400)
 */
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::services::audit::AuditQuery;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

fn clamp_limit(limit: Option<&str>) -> i64 {
    limit
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .map(|v| v.min(MAX_LIMIT))
        .unwrap_or(DEFAULT_LIMIT)
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` read as 00:00:00 UTC.
fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn optional_instant(
    value: Option<&str>,
    err: &'static str,
) -> Result<Option<DateTime<Utc>>, &'static str> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_instant(v).map(Some).ok_or(err),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<String>,
}

impl LogsQuery {
    pub fn to_query(&self) -> AuditQuery {
        AuditQuery {
            limit: clamp_limit(self.limit.as_deref()),
            ..AuditQuery::default()
        }
    }
}

/// `from` / `to` are both inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl ActivityQuery {
    pub fn to_query(&self, actor_id: i64) -> Result<AuditQuery, &'static str> {
        let from = optional_instant(self.from.as_deref(), "from must be RFC 3339 or YYYY-MM-DD")?;
        let to = optional_instant(self.to.as_deref(), "to must be RFC 3339 or YYYY-MM-DD")?;

        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err("from must not be after to");
        }

        Ok(AuditQuery {
            actor_id: Some(actor_id),
            from,
            to,
            limit: clamp_limit(self.limit.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn activity(from: Option<&str>, to: Option<&str>) -> ActivityQuery {
        ActivityQuery {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            limit: None,
        }
    }

    #[test]
    fn limit_defaults_and_caps() {
        let logs = |v: Option<&str>| LogsQuery {
            limit: v.map(str::to_string),
        };
        assert_eq!(logs(None).to_query().limit, 100);
        assert_eq!(logs(Some("0")).to_query().limit, 100);
        assert_eq!(logs(Some("abc")).to_query().limit, 100);
        assert_eq!(logs(Some("5")).to_query().limit, 5);
        assert_eq!(logs(Some("50000")).to_query().limit, 1000);
    }

    #[test]
    fn date_only_bounds_start_at_midnight_utc() {
        let q = activity(Some("2024-01-01"), Some("2024-01-31T12:00:00+09:00"))
            .to_query(7)
            .unwrap();
        assert_eq!(q.actor_id, Some(7));
        assert_eq!(q.from, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(q.to, Some(Utc.with_ymd_and_hms(2024, 1, 31, 3, 0, 0).unwrap()));
    }

    #[test]
    fn blank_bounds_are_ignored() {
        let q = activity(Some(""), None).to_query(1).unwrap();
        assert_eq!((q.from, q.to), (None, None));
    }

    #[test]
    fn bad_or_inverted_range_is_rejected() {
        assert!(activity(Some("yesterday"), None).to_query(1).is_err());
        assert!(activity(Some("2024-02-01"), Some("2024-01-01")).to_query(1).is_err());
    }
}
