use super::extract::SubmissionPage;
use crate::config::FormsConfig;
use std::fmt::Debug;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Debug, thiserror::Error)]
pub enum FormsError {
    #[error("forms request failed: {0}")]
    Backend(String),
    #[error("forms service returned status {status}")]
    Status { status: u16 },
    #[error("forms response could not be decoded: {0}")]
    Decode(String),
    #[error("forms runtime unavailable: {0}")]
    Runtime(String),
}

/// Read side of the remote forms service: one page of the most recent
/// submissions, newest first. No pagination beyond that page.
pub trait FormsGateway: Debug + Send + Sync {
    fn fetch_recent(&self) -> Result<SubmissionPage, FormsError>;
}

/// Thin wrapper around reqwest allowing the synchronous workflow to call
/// the Yandex Forms API without exposing async details.
pub struct YandexFormsClient {
    http: reqwest::Client,
    config: FormsConfig,
    runtime: Runtime,
}

impl YandexFormsClient {
    pub fn new(config: FormsConfig) -> Result<Self, FormsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|err| FormsError::Backend(err.to_string()))?;
        let runtime = Runtime::new().map_err(|err| FormsError::Runtime(err.to_string()))?;
        Ok(Self {
            http,
            config,
            runtime,
        })
    }
}

impl Debug for YandexFormsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YandexFormsClient")
            .field("survey_id", &self.config.survey_id)
            .finish_non_exhaustive()
    }
}

impl FormsGateway for YandexFormsClient {
    fn fetch_recent(&self) -> Result<SubmissionPage, FormsError> {
        let url = format!(
            "{}/surveys/{}/answers",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.survey_id
        );

        let response = self
            .runtime
            .block_on(
                self.http
                    .get(&url)
                    .header(
                        reqwest::header::AUTHORIZATION,
                        format!("OAuth {}", self.config.oauth_token),
                    )
                    .query(&[
                        ("page_size", self.config.page_size.to_string()),
                        ("sort", "-submitted_at".to_string()),
                    ])
                    .send(),
            )
            .map_err(|err| FormsError::Backend(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FormsError::Status {
                status: status.as_u16(),
            });
        }

        self.runtime
            .block_on(response.json::<SubmissionPage>())
            .map_err(|err| FormsError::Decode(err.to_string()))
    }
}
