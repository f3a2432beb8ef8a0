//! Protocol headers stamped onto every request

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use reqwest::RequestBuilder;

pub const MASTER_VERSION: &str = "x-master-version";
pub const SESSION: &str = "x-session";
pub const ISU_DATE: &str = "x-isu-date";

/// RFC1123 in GMT, as the target parses it
pub fn format_isu_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Effective date for a request, shifted a day ahead once master version 2 is live
pub fn isu_date_for(master_version: &str, date: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let date = date.unwrap_or_else(Utc::now);
    match master_version.parse::<i64>() {
        Ok(version) if version >= 2 => date + Duration::hours(24),
        _ => date,
    }
}

/// The fixed game day 2022-08-27 at the current wall-clock time of day
pub fn flow_date(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2022, 8, 27)
        .and_then(|day| day.and_hms_nano_opt(now.hour(), now.minute(), now.second(), now.nanosecond()))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now)
}

pub(crate) fn with_master_version(builder: RequestBuilder, master_version: &str) -> RequestBuilder {
    builder.header(MASTER_VERSION, master_version)
}

pub(crate) fn with_session(builder: RequestBuilder, session_id: &str) -> RequestBuilder {
    builder.header(SESSION, session_id)
}

pub(crate) fn with_isu_date(
    builder: RequestBuilder,
    master_version: &str,
    date: Option<DateTime<Utc>>,
) -> RequestBuilder {
    builder.header(ISU_DATE, format_isu_date(isu_date_for(master_version, date)))
}

pub(crate) fn with_json_content(builder: RequestBuilder) -> RequestBuilder {
    builder.header(reqwest::header::CONTENT_TYPE, "application/json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_format_isu_date() {
        assert_eq!(
            format_isu_date(at(2022, 8, 27, 9, 5, 1)),
            "Sat, 27 Aug 2022 09:05:01 GMT"
        );
    }

    #[test]
    fn test_version_two_shifts_a_day() {
        let date = at(2022, 8, 26, 14, 59, 59);
        assert_eq!(isu_date_for("1", Some(date)), date);
        assert_eq!(isu_date_for("2", Some(date)), at(2022, 8, 27, 14, 59, 59));
        assert_eq!(isu_date_for("abc", Some(date)), date);
    }

    #[test]
    fn test_flow_date_keeps_time_of_day() {
        let flow = flow_date(at(2031, 1, 2, 3, 4, 5));
        assert_eq!(flow, at(2022, 8, 27, 3, 4, 5));
    }
}
