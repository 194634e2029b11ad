//! Receipt submissions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::LineInput;

/// A create or edit submission for a receipt document, as entered.
///
/// Nothing here is trusted: the number is trimmed and bounded, the date must
/// be present and every line is classified before anything is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptInput {
    /// Document number, unique case-insensitively.
    pub number: String,

    /// Receipt date.
    pub date: Option<NaiveDate>,

    /// Submitted lines, in form order.
    pub lines: Vec<LineInput>,
}

impl ReceiptInput {
    /// Creates a new submission.
    pub fn new(number: impl Into<String>, date: NaiveDate, lines: Vec<LineInput>) -> Self {
        Self {
            number: number.into(),
            date: Some(date),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let input: ReceiptInput = serde_json::from_str(r#"{"number": "R-1"}"#).unwrap();

        assert_eq!(input.number, "R-1");
        assert!(input.date.is_none());
        assert!(input.lines.is_empty());
    }

    #[test]
    fn date_uses_iso_format() {
        let input: ReceiptInput =
            serde_json::from_str(r#"{"number": "R-1", "date": "2024-03-15", "lines": [{}]}"#)
                .unwrap();

        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(input.lines, vec![LineInput::empty()]);
    }
}
