use super::grammar::{self, ApplicantRole, Gender};
use super::period::AbsencePeriod;
use crate::config::DocumentsConfig;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const STUDENT_TEMPLATE: &str = "template_student.txt";
const GUARDIAN_TEMPLATE: &str = "template_parent.txt";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read template {path}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write statement {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything the generator needs, already validated upstream.
#[derive(Debug, Clone)]
pub struct StatementRequest {
    pub student_name: String,
    pub group: String,
    pub gender: Gender,
    pub role: ApplicantRole,
    /// Name signing the statement. Falls back to the student's own name
    /// when the guardian question was left unanswered.
    pub applicant_name: Option<String>,
    pub period: AbsencePeriod,
}

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedStatement {
    pub path: PathBuf,
    pub file_name: String,
    pub applicant_role: ApplicantRole,
}

/// Fills a statement template and persists it under a name derived from the
/// student's full name. Repeated runs for the same student overwrite the
/// same file; that collision is accepted behavior, not an error.
#[derive(Debug, Clone)]
pub struct StatementGenerator {
    documents: DocumentsConfig,
}

impl StatementGenerator {
    pub fn new(documents: DocumentsConfig) -> Self {
        Self { documents }
    }

    pub fn generate(
        &self,
        request: &StatementRequest,
        today: NaiveDate,
    ) -> Result<GeneratedStatement, DocumentError> {
        let template_name = match request.role {
            ApplicantRole::Student => STUDENT_TEMPLATE,
            ApplicantRole::Guardian => GUARDIAN_TEMPLATE,
        };
        let template_path = self.documents.template_dir.join(template_name);
        let template = fs::read_to_string(&template_path).map_err(|source| {
            DocumentError::Template {
                path: template_path,
                source,
            }
        })?;

        let content = render(&template, request, today);

        let file_name = format!("Заявление_{}.txt", request.student_name.replace(' ', "_"));
        let path = self.documents.output_dir.join(&file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| DocumentError::Write {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, content).map_err(|source| DocumentError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(GeneratedStatement {
            path,
            file_name,
            applicant_role: request.role,
        })
    }
}

/// Literal find-replace of the known placeholder tokens. Tokens without a
/// resolved value stay in the text untouched; that is not an error.
fn render(template: &str, request: &StatementRequest, today: NaiveDate) -> String {
    let forms = grammar::resolve(request.gender, request.role);
    let applicant = request
        .applicant_name
        .as_deref()
        .unwrap_or(&request.student_name);
    let short = grammar::short_name(applicant, request.gender);
    let period = request.period.display();
    let current_date = today.format("%d.%m.%Y").to_string();

    let substitutions: [(&str, &str); 9] = [
        ("{fio}", &request.student_name),
        ("{fio_short}", &short),
        ("{group}", &request.group),
        ("{date}", &period),
        ("{current_date}", &current_date),
        ("{My}", forms.possessive),
        ("{sex}", forms.kinship),
        ("{absence_verb}", forms.absence_verb),
        ("{responsibility}", forms.responsibility),
    ];

    let mut content = template.to_string();
    for (token, value) in substitutions {
        content = content.replace(token, value);
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn scratch_dir(label: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let dir = std::env::temp_dir().join(format!(
            "statements-{label}-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).expect("scratch dir creates");
        dir
    }

    fn write_templates(dir: &Path) {
        fs::write(
            dir.join(STUDENT_TEMPLATE),
            "{My}, {fio}, группы {group}, {absence_verb} {date}.\n{current_date} {fio_short}\n",
        )
        .expect("student template writes");
        fs::write(
            dir.join(GUARDIAN_TEMPLATE),
            "{My} {sex} {fio} ({group}) {absence_verb} {date}. Ответственность {responsibility}.\n{current_date} {fio_short}\n",
        )
        .expect("guardian template writes");
    }

    fn request(role: ApplicantRole) -> StatementRequest {
        StatementRequest {
            student_name: "Иванова Анна Ильинична".to_string(),
            group: "403ИС-22".to_string(),
            gender: Gender::Feminine,
            role,
            applicant_name: None,
            period: AbsencePeriod::new(
                NaiveDate::from_ymd_opt(2025, 11, 14).expect("valid date"),
                NaiveDate::from_ymd_opt(2025, 11, 16),
            ),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 17).expect("valid date")
    }

    #[test]
    fn fills_guardian_template_without_leftover_tokens() {
        let templates = scratch_dir("templates");
        let output = scratch_dir("output");
        write_templates(&templates);
        let generator = StatementGenerator::new(DocumentsConfig {
            template_dir: templates,
            output_dir: output,
        });

        let statement = generator
            .generate(&request(ApplicantRole::Guardian), today())
            .expect("statement generates");
        let content = fs::read_to_string(&statement.path).expect("statement reads");

        assert!(content.contains("Моя дочь Иванова Анна Ильинична"));
        assert!(content.contains("с 14.11.2025 по 16.11.2025"));
        assert!(content.contains("Ивановой А. И."));
        assert!(!content.contains('{'), "unresolved token in: {content}");
        assert_eq!(
            statement.file_name,
            "Заявление_Иванова_Анна_Ильинична.txt"
        );
    }

    #[test]
    fn student_template_is_selected_by_role() {
        let templates = scratch_dir("templates");
        let output = scratch_dir("output");
        write_templates(&templates);
        let generator = StatementGenerator::new(DocumentsConfig {
            template_dir: templates,
            output_dir: output,
        });

        let statement = generator
            .generate(&request(ApplicantRole::Student), today())
            .expect("statement generates");
        let content = fs::read_to_string(&statement.path).expect("statement reads");

        assert!(content.starts_with("Я, Иванова Анна Ильинична"));
        assert!(content.contains("буду отсутствовать"));
    }

    #[test]
    fn regeneration_is_byte_identical_and_overwrites() {
        let templates = scratch_dir("templates");
        let output = scratch_dir("output");
        write_templates(&templates);
        let generator = StatementGenerator::new(DocumentsConfig {
            template_dir: templates,
            output_dir: output.clone(),
        });

        let first = generator
            .generate(&request(ApplicantRole::Guardian), today())
            .expect("first run");
        let first_bytes = fs::read(&first.path).expect("first read");
        let second = generator
            .generate(&request(ApplicantRole::Guardian), today())
            .expect("second run");
        let second_bytes = fs::read(&second.path).expect("second read");

        assert_eq!(first.path, second.path);
        assert_eq!(first_bytes, second_bytes);
        assert_eq!(fs::read_dir(output).expect("dir lists").count(), 1);
    }

    #[test]
    fn unknown_tokens_stay_literal() {
        let templates = scratch_dir("templates");
        let output = scratch_dir("output");
        fs::write(
            templates.join(GUARDIAN_TEMPLATE),
            "{fio} {unknown_token}\n",
        )
        .expect("template writes");
        let generator = StatementGenerator::new(DocumentsConfig {
            template_dir: templates,
            output_dir: output,
        });

        let statement = generator
            .generate(&request(ApplicantRole::Guardian), today())
            .expect("statement generates");
        let content = fs::read_to_string(&statement.path).expect("statement reads");
        assert!(content.contains("{unknown_token}"));
    }

    #[test]
    fn missing_template_is_a_template_error() {
        let templates = scratch_dir("templates");
        let output = scratch_dir("output");
        let generator = StatementGenerator::new(DocumentsConfig {
            template_dir: templates,
            output_dir: output,
        });

        let error = generator
            .generate(&request(ApplicantRole::Student), today())
            .expect_err("template absent");
        assert!(matches!(error, DocumentError::Template { .. }));
    }
}
