//! Absence-statement pipeline: locate a submission, extract and validate
//! its fields, resolve grammar, and fill a statement template.

mod disk;
mod document;
mod extract;
mod fields;
mod grammar;
mod period;

pub mod forms;

pub use disk::{row_fields, DiskError, DiskGateway, ExportRow, YandexDiskClient};
pub use document::{DocumentError, GeneratedStatement, StatementGenerator, StatementRequest};
pub use extract::{extract, ColumnDefinition, FieldMap, FieldValue, RawAnswer, SubmissionPage};
pub use fields::StatementFields;
pub use forms::{FormsError, FormsGateway, YandexFormsClient};
pub use grammar::{decline_surname, resolve, short_name, ApplicantRole, Gender, GrammarForms};
pub use period::{AbsencePeriod, PeriodError};

use crate::config::DocumentsConfig;
use chrono::Local;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    #[error("could not fetch submissions: {0}")]
    Transport(#[from] FormsError),
    #[error("could not fetch export: {0}")]
    Disk(#[from] DiskError),
    #[error("no submission found for ticket number {ticket}")]
    NotFound { ticket: String },
    #[error("the forms service returned no submissions")]
    NoSubmissions,
    #[error("could not extract required data: field '{field}' is empty")]
    MissingField { field: &'static str },
    #[error("invalid absence period: {0}")]
    Period(#[from] PeriodError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Scans a fetched page in returned order (newest first) for the first
/// submission whose ticket field equals the requested value exactly.
fn locate_by_ticket(page: &SubmissionPage, ticket: &str) -> Option<FieldMap> {
    page.answers
        .iter()
        .map(|answer| extract(answer, &page.columns))
        .find(|candidate| fields::ticket_number(candidate) == Some(ticket))
}

/// The most recent submission of the page, already extracted.
fn locate_latest(page: &SubmissionPage) -> Option<FieldMap> {
    page.answers
        .first()
        .map(|answer| extract(answer, &page.columns))
}

/// One sequential fetch -> extract -> resolve -> render -> write pipeline
/// per user command. The gateway and document locations are injected at
/// construction; no process-wide state.
#[derive(Debug)]
pub struct StatementWorkflow {
    forms: Box<dyn FormsGateway>,
    generator: StatementGenerator,
}

impl StatementWorkflow {
    pub fn new(forms: Box<dyn FormsGateway>, documents: DocumentsConfig) -> Self {
        Self {
            forms,
            generator: StatementGenerator::new(documents),
        }
    }

    /// Statement for the submission matching a student ticket number. An
    /// empty page is reported as such before any ticket is searched for.
    pub fn generate_for_ticket(&self, ticket: &str) -> Result<GeneratedStatement, StatementError> {
        let page = self.forms.fetch_recent()?;
        if page.answers.is_empty() {
            return Err(StatementError::NoSubmissions);
        }
        let fields = locate_by_ticket(&page, ticket).ok_or_else(|| StatementError::NotFound {
            ticket: ticket.to_string(),
        })?;
        self.generate_from_fields(&fields)
    }

    /// Statement for the most recent submission, whoever filed it.
    pub fn generate_latest(&self) -> Result<GeneratedStatement, StatementError> {
        let page = self.forms.fetch_recent()?;
        let fields = locate_latest(&page).ok_or(StatementError::NoSubmissions)?;
        self.generate_from_fields(&fields)
    }

    /// Statement for the last row of an archived disk export.
    pub fn generate_from_export(
        &self,
        disk: &dyn DiskGateway,
        export_path: &str,
    ) -> Result<GeneratedStatement, StatementError> {
        let rows = disk.fetch_export(export_path)?;
        let row = rows.last().ok_or(StatementError::NoSubmissions)?;
        self.generate_from_fields(&row_fields(row))
    }

    fn generate_from_fields(
        &self,
        fields: &FieldMap,
    ) -> Result<GeneratedStatement, StatementError> {
        let parsed = StatementFields::from_map(fields)?;
        let request = StatementRequest {
            student_name: parsed.student_name,
            group: parsed.group,
            gender: parsed.gender,
            role: parsed.role,
            applicant_name: parsed.applicant_name,
            period: parsed.period,
        };

        let statement = self
            .generator
            .generate(&request, Local::now().date_naive())?;
        info!(
            file = %statement.file_name,
            role = statement.applicant_role.label(),
            "statement generated"
        );
        Ok(statement)
    }
}
