use super::extract::{FieldMap, FieldValue};
use super::grammar::{ApplicantRole, Gender};
use super::period::AbsencePeriod;
use super::StatementError;

// Question texts of the production survey. The forms API carries no stable
// field keys, so the literal column text is the contract.
pub(crate) const COL_TICKET: &str = "Ведите номер студенческого билета (пример: 000893)";
pub(crate) const COL_STUDENT_NAME: &str = "Укажите ФИО студента";
pub(crate) const COL_GROUP: &str = "Группа студента (пример: 403ИС-22)";
pub(crate) const COL_GENDER: &str = "Укажите пол студента";
pub(crate) const COL_ROLE: &str = "Я";
pub(crate) const COL_APPLICANT_NAME: &str = "Укажите ФИО заявителя";
pub(crate) const COL_PERIOD: &str = "Укажите период отсутствия";

// Key aliases used by the archived disk exports, which predate the renamed
// survey questions.
const LEGACY_STUDENT_NAME: &str = "ФИО студента";
const LEGACY_GROUP: &str = "Группа студента";

/// Ticket value of a submission, if the respondent filled it.
pub(crate) fn ticket_number(fields: &FieldMap) -> Option<&str> {
    fields.get(COL_TICKET).and_then(FieldValue::as_scalar)
}

/// Validated view over an extracted field map, ready for generation.
#[derive(Debug, Clone)]
pub struct StatementFields {
    pub student_name: String,
    pub group: String,
    pub gender: Gender,
    pub role: ApplicantRole,
    pub applicant_name: Option<String>,
    pub period: AbsencePeriod,
}

impl StatementFields {
    pub fn from_map(fields: &FieldMap) -> Result<Self, StatementError> {
        let student_name = required(fields, COL_STUDENT_NAME, LEGACY_STUDENT_NAME)?;
        let group = required(fields, COL_GROUP, LEGACY_GROUP)?;

        let gender = optional(fields, COL_GENDER)
            .map(Gender::from_label)
            .unwrap_or(Gender::Unknown);
        // An unanswered role question never matches the student label, so it
        // lands on the guardian branch, same as any other answer.
        let role = ApplicantRole::from_label(optional(fields, COL_ROLE).unwrap_or("-"));
        let applicant_name = optional(fields, COL_APPLICANT_NAME).map(str::to_string);
        let period = AbsencePeriod::from_field(fields.get(COL_PERIOD))?;

        Ok(Self {
            student_name,
            group,
            gender,
            role,
            applicant_name,
            period,
        })
    }
}

fn optional<'a>(fields: &'a FieldMap, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(FieldValue::as_scalar)
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "-")
}

fn required(
    fields: &FieldMap,
    key: &'static str,
    legacy_key: &'static str,
) -> Result<String, StatementError> {
    optional(fields, key)
        .or_else(|| optional(fields, legacy_key))
        .map(str::to_string)
        .ok_or(StatementError::MissingField { field: key })
}
