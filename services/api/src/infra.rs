use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use statements::config::DocumentsConfig;
use statements::workflows::statement::{
    FormsError, FormsGateway, StatementWorkflow, SubmissionPage,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) workflow: Arc<StatementWorkflow>,
    pub(crate) documents: DocumentsConfig,
}

/// Gateway serving a fixed page, used by the offline demo and the handler
/// tests.
#[derive(Debug, Clone)]
pub(crate) struct InMemoryFormsGateway {
    page: SubmissionPage,
}

impl InMemoryFormsGateway {
    pub(crate) fn new(page: SubmissionPage) -> Self {
        Self { page }
    }
}

impl FormsGateway for InMemoryFormsGateway {
    fn fetch_recent(&self) -> Result<SubmissionPage, FormsError> {
        Ok(self.page.clone())
    }
}

/// A page shaped like the production survey: one guardian filing for ticket
/// 000892 and one student self-filing on top as the most recent entry.
pub(crate) fn sample_page() -> SubmissionPage {
    serde_json::from_value(json!({
        "columns": [
            { "text": "Ведите номер студенческого билета (пример: 000893)" },
            { "text": "Укажите ФИО студента" },
            { "text": "Группа студента (пример: 403ИС-22)" },
            { "text": "Укажите пол студента" },
            { "text": "Я" },
            { "text": "Укажите ФИО заявителя" },
            { "text": "Укажите период отсутствия" }
        ],
        "answers": [
            {
                "data": [
                    { "value": "000901" },
                    { "value": "Новикова Дарья Павловна" },
                    { "value": "401ИС-23" },
                    { "value": "Женский" },
                    { "value": "Студент(ка)" },
                    null,
                    { "value": ["2025-12-01"] }
                ]
            },
            {
                "data": [
                    { "value": "000892" },
                    { "value": "Иванова Анна Ильинична" },
                    { "value": "403ИС-22" },
                    { "value": "Женский" },
                    { "value": "Родитель" },
                    { "value": "Иванова Алла Игоревна" },
                    { "value": ["2025-11-14", "2025-11-16"] }
                ]
            }
        ]
    }))
    .expect("sample page is well-formed")
}
