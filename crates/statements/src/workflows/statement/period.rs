use super::extract::FieldValue;
use chrono::NaiveDate;

const WIRE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("absence period is missing from the submission")]
    Missing,
    #[error("could not parse '{value}' as a calendar date")]
    Unparseable { value: String },
}

/// Inclusive absence window. A single-day absence has equal start and end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsencePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AbsencePeriod {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            start,
            end: end.unwrap_or(start),
        }
    }

    /// Parses the period out of the extracted field value. The form widget
    /// reports a list of ISO dates: two entries bound a range, one entry
    /// means a single day, anything empty is an error the caller surfaces
    /// to the user.
    pub fn from_field(value: Option<&FieldValue>) -> Result<Self, PeriodError> {
        let entries = value.map(FieldValue::entries).unwrap_or_default();
        match entries.as_slice() {
            [] => Err(PeriodError::Missing),
            [single] => {
                let day = parse_wire_date(single)?;
                Ok(Self::new(day, None))
            }
            [start, end, ..] => Ok(Self {
                start: parse_wire_date(start)?,
                end: parse_wire_date(end)?,
            }),
        }
    }

    /// Human-readable rendering: `ДД.ММ.ГГГГ` for one day, localized
    /// "с ... по ..." for a range.
    pub fn display(&self) -> String {
        let start = self.start.format(DISPLAY_FORMAT);
        if self.end == self.start {
            start.to_string()
        } else {
            format!("с {start} по {}", self.end.format(DISPLAY_FORMAT))
        }
    }
}

fn parse_wire_date(raw: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(raw.trim(), WIRE_FORMAT).map_err(|_| PeriodError::Unparseable {
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
    }

    #[test]
    fn single_day_renders_one_date() {
        let period = AbsencePeriod::new(date("2025-11-14"), Some(date("2025-11-14")));
        assert_eq!(period.display(), "14.11.2025");
    }

    #[test]
    fn range_renders_with_connectives() {
        let period = AbsencePeriod::new(date("2025-11-14"), Some(date("2025-11-16")));
        assert_eq!(period.display(), "с 14.11.2025 по 16.11.2025");
    }

    #[test]
    fn field_with_two_dates_becomes_range() {
        let value = FieldValue::Many(vec!["2025-11-14".to_string(), "2025-11-16".to_string()]);
        let period = AbsencePeriod::from_field(Some(&value)).expect("period parses");
        assert_eq!(period.start, date("2025-11-14"));
        assert_eq!(period.end, date("2025-11-16"));
    }

    #[test]
    fn field_with_one_date_is_single_day() {
        let value = FieldValue::Scalar("2025-11-14".to_string());
        let period = AbsencePeriod::from_field(Some(&value)).expect("period parses");
        assert_eq!(period.start, period.end);
    }

    #[test]
    fn absent_field_is_reported_missing() {
        assert_eq!(
            AbsencePeriod::from_field(None),
            Err(PeriodError::Missing)
        );
        assert_eq!(
            AbsencePeriod::from_field(Some(&FieldValue::Null)),
            Err(PeriodError::Missing)
        );
    }

    #[test]
    fn garbage_dates_are_surfaced_not_panicked() {
        let value = FieldValue::Scalar("14.11.2025".to_string());
        let error = AbsencePeriod::from_field(Some(&value)).expect_err("bad format");
        assert!(matches!(error, PeriodError::Unparseable { .. }));
    }
}
