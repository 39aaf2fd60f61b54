use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes;
use axum_prometheus::PrometheusMetricLayer;
use statements::config::AppConfig;
use statements::error::AppError;
use statements::telemetry;
use statements::workflows::statement::{StatementError, StatementWorkflow, YandexFormsClient};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let forms = YandexFormsClient::new(config.forms.clone())
        .map_err(|err| AppError::Statement(StatementError::Transport(err)))?;
    let workflow = StatementWorkflow::new(Box::new(forms), config.documents.clone());

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        workflow: Arc::new(workflow),
        documents: config.documents.clone(),
    };

    let app = routes::router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "absence statement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
