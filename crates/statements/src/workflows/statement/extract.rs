use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One question definition of the survey. Column order aligns positionally
/// with each answer's `data` array; there is no explicit key linking them.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDefinition {
    pub text: String,
}

/// One slot of a submission's positional answer array.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSlot {
    #[serde(default)]
    pub value: Option<Value>,
}

/// One respondent's completed form as returned by the forms API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnswer {
    #[serde(default)]
    pub data: Option<Vec<Option<AnswerSlot>>>,
}

/// First page of submissions, newest first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionPage {
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub answers: Vec<RawAnswer>,
}

/// Normalized answer value: single-element lists are unwrapped, longer
/// lists kept intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Scalar(String),
    Many(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Dates and similar multi-valued answers viewed as a list regardless
    /// of how many entries the respondent supplied.
    pub fn entries(&self) -> Vec<&str> {
        match self {
            FieldValue::Null => Vec::new(),
            FieldValue::Scalar(value) => vec![value.as_str()],
            FieldValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

pub type FieldMap = BTreeMap<String, FieldValue>;

/// Zips the positional answer array with the shared column definitions into
/// a named field map. Pure; a missing `data` array yields an empty map and
/// columns beyond the array length are skipped without error.
pub fn extract(answer: &RawAnswer, columns: &[ColumnDefinition]) -> FieldMap {
    let mut fields = FieldMap::new();

    let Some(data) = answer.data.as_ref() else {
        return fields;
    };

    for (column, slot) in columns.iter().zip(data.iter()) {
        let value = match slot {
            None => FieldValue::Null,
            Some(slot) => normalize_value(slot.value.as_ref()),
        };
        fields.insert(column.text.clone(), value);
    }

    fields
}

/// Collapses the wire representation of a single answer value.
pub(crate) fn normalize_value(value: Option<&Value>) -> FieldValue {
    match value {
        None | Some(Value::Null) => FieldValue::Null,
        Some(Value::Array(items)) => {
            let mut rendered: Vec<String> = items.iter().map(render_scalar).collect();
            if rendered.len() == 1 {
                FieldValue::Scalar(rendered.remove(0))
            } else {
                FieldValue::Many(rendered)
            }
        }
        Some(other) => FieldValue::Scalar(render_scalar(other)),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(texts: &[&str]) -> Vec<ColumnDefinition> {
        texts
            .iter()
            .map(|text| ColumnDefinition {
                text: (*text).to_string(),
            })
            .collect()
    }

    fn answer(data: Value) -> RawAnswer {
        serde_json::from_value(json!({ "data": data })).expect("answer parses")
    }

    #[test]
    fn missing_data_yields_empty_map() {
        let answer: RawAnswer = serde_json::from_value(json!({})).expect("answer parses");
        let fields = extract(&answer, &columns(&["Q"]));
        assert!(fields.is_empty());
    }

    #[test]
    fn single_element_lists_unwrap_to_scalar() {
        let fields = extract(&answer(json!([{ "value": ["x"] }])), &columns(&["Q"]));
        assert_eq!(fields["Q"], FieldValue::Scalar("x".to_string()));
    }

    #[test]
    fn multi_element_lists_stay_lists() {
        let fields = extract(&answer(json!([{ "value": ["x", "y"] }])), &columns(&["Q"]));
        assert_eq!(
            fields["Q"],
            FieldValue::Many(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn null_slots_and_null_values_map_to_null() {
        let fields = extract(
            &answer(json!([null, { "value": null }])),
            &columns(&["A", "B"]),
        );
        assert_eq!(fields["A"], FieldValue::Null);
        assert_eq!(fields["B"], FieldValue::Null);
    }

    #[test]
    fn columns_beyond_data_are_skipped() {
        let fields = extract(
            &answer(json!([{ "value": "only" }])),
            &columns(&["A", "B", "C"]),
        );
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["A"], FieldValue::Scalar("only".to_string()));
        assert!(!fields.contains_key("B"));
    }

    #[test]
    fn key_set_is_subset_of_column_texts() {
        let cols = columns(&["A", "B"]);
        let fields = extract(
            &answer(json!([{ "value": 1 }, { "value": true }, { "value": "extra" }])),
            &cols,
        );
        assert!(fields.len() <= cols.len());
        assert!(fields.keys().all(|key| key == "A" || key == "B"));
        assert_eq!(fields["A"], FieldValue::Scalar("1".to_string()));
        assert_eq!(fields["B"], FieldValue::Scalar("true".to_string()));
    }
}
