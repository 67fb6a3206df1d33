use chrono::NaiveDateTime;
use regex::Regex;
use shared_types::ExtractionError;
use std::sync::OnceLock;

const REPORT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

fn subject_date_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\d\d[.]\d\d[.]\d\d\d\d").expect("subject date regex"))
}

/// First `DD.MM.YYYY` substring of a mail subject.
pub fn subject_date(subject: &str) -> Option<&str> {
    subject_date_regex().find(subject).map(|m| m.as_str())
}

/// Parses one timestamp cell of a report.
///
/// Daily reports only carry `HH:MM` in their rows; the day is then taken
/// from the subject line of the mail.
pub fn parse_report_timestamp(cell: &str, subject: &str) -> Result<NaiveDateTime, ExtractionError> {
    let full = if cell.chars().count() == 5 {
        let date = subject_date(subject)
            .ok_or_else(|| ExtractionError::MissingSubjectDate(subject.to_string()))?;
        format!("{} {}", date, cell)
    } else {
        cell.to_string()
    };

    NaiveDateTime::parse_from_str(&full, REPORT_TIMESTAMP_FORMAT)
        .map_err(|e| ExtractionError::Parse(format!("Invalid timestamp '{}': {}", full, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_subject_date() {
        assert_eq!(
            subject_date("FRITZ!DECT 200 Wohnzimmer: Bericht vom 01.02.2023"),
            Some("01.02.2023")
        );
        assert_eq!(subject_date("03.04.2023 bis 10.04.2023"), Some("03.04.2023"));
        assert_eq!(subject_date("FRITZ!DECT Wochenbericht"), None);
    }

    #[test]
    fn test_time_only_takes_date_from_subject() {
        let ts = parse_report_timestamp("09:15", "FRITZ!DECT 200: 01.02.2023").unwrap();

        assert_eq!(ts.year(), 2023);
        assert_eq!(ts.month(), 2);
        assert_eq!(ts.day(), 1);
        assert_eq!(ts.hour(), 9);
        assert_eq!(ts.minute(), 15);
    }

    #[test]
    fn test_full_timestamp_ignores_subject() {
        let ts = parse_report_timestamp("01.02.2023 09:15", "FRITZ!DECT 200: 24.12.2022").unwrap();
        assert_eq!(ts.to_string(), "2023-02-01 09:15:00");

        let ts = parse_report_timestamp("01.02.2023 09:15", "no date here").unwrap();
        assert_eq!(ts.to_string(), "2023-02-01 09:15:00");
    }

    #[test]
    fn test_time_only_without_subject_date() {
        let err = parse_report_timestamp("09:15", "FRITZ!DECT Wochenbericht").unwrap_err();
        assert!(matches!(err, ExtractionError::MissingSubjectDate(_)));
    }

    #[test]
    fn test_invalid_timestamp() {
        let err = parse_report_timestamp("yesterday", "01.02.2023").unwrap_err();
        assert!(matches!(err, ExtractionError::Parse(_)));
    }
}
