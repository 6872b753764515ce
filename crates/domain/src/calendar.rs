use chrono::{DateTime, TimeZone, Utc};

/// MIME type used when offering the generated file as a download
pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Default event duration when the data source does not carry an end
/// time: matches rarely run longer than two hours
const DEFAULT_DURATION_HOURS: i64 = 2;

/// An iCalendar attachment for a single match, with an embedded alarm
/// that fires `reminder_minutes` before the start time. Pure data
/// transformation, no I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarAttachment {
    pub title: String,
    pub description: String,
    /// Match start in millis
    pub start_ts: i64,
    /// Alarm trigger, minutes before `start_ts`
    pub reminder_minutes: i64,
}

impl CalendarAttachment {
    /// Renders a VCALENDAR with one VEVENT and one VALARM. Lines are
    /// CRLF-separated as required by RFC 5545.
    pub fn to_ics(&self) -> String {
        let start = timestamp_millis_to_utc(self.start_ts);
        let end = timestamp_millis_to_utc(self.start_ts + DEFAULT_DURATION_HOURS * 60 * 60 * 1000);

        [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Matchminder//EN".to_string(),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("SUMMARY:{}", escape_ics_value(&self.title)),
            format!("DESCRIPTION:{}", escape_ics_value(&self.description)),
            format!("DTSTART:{}", format_ics_timestamp(&start)),
            format!("DTEND:{}", format_ics_timestamp(&end)),
            "BEGIN:VALARM".to_string(),
            format!("TRIGGER:-PT{}M", self.reminder_minutes),
            "ACTION:DISPLAY".to_string(),
            format!("DESCRIPTION:Reminder: {}", escape_ics_value(&self.title)),
            "END:VALARM".to_string(),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ]
        .join("\r\n")
    }
}

/// UTC basic format required by the calendar spec: `YYYYMMDDTHHMMSSZ`
fn format_ics_timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y%m%dT%H%M%SZ").to_string()
}

fn timestamp_millis_to_utc(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ts)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Escapes calendar-reserved characters in free-text property values
pub fn escape_ics_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Inverse of `escape_ics_value`
pub fn unescape_ics_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}
