use crate::infra::{sample_page, InMemoryFormsGateway};
use clap::Args;
use statements::config::AppConfig;
use statements::error::AppError;
use statements::workflows::statement::{
    GeneratedStatement, StatementError, StatementWorkflow, YandexDiskClient, YandexFormsClient,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Student ticket number to look up among the recent submissions
    #[arg(long, conflicts_with_all = ["latest", "from_export"])]
    pub(crate) ticket: Option<String>,
    /// Use the most recent submission instead of a ticket lookup
    #[arg(long, conflicts_with = "from_export")]
    pub(crate) latest: bool,
    /// Read the last row of an archived disk export at this path instead
    /// of calling the forms API
    #[arg(long)]
    pub(crate) from_export: Option<String>,
    /// Override the configured output directory
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Ticket number to look up in the bundled fixture page
    #[arg(long, default_value = "000892")]
    pub(crate) ticket: String,
}

pub(crate) fn run_generate(mut args: GenerateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(output_dir) = args.output_dir.take() {
        config.documents.output_dir = output_dir;
    }

    let forms = YandexFormsClient::new(config.forms.clone())
        .map_err(|err| AppError::Statement(StatementError::Transport(err)))?;
    let workflow = StatementWorkflow::new(Box::new(forms), config.documents.clone());

    let statement = if let Some(export_path) = args.from_export.as_deref() {
        let disk = YandexDiskClient::new(config.disk.clone())
            .map_err(|err| AppError::Statement(StatementError::Disk(err)))?;
        workflow.generate_from_export(&disk, export_path)?
    } else if args.latest {
        workflow.generate_latest()?
    } else if let Some(ticket) = args.ticket.as_deref() {
        workflow.generate_for_ticket(ticket)?
    } else {
        return Err(AppError::InvalidRequest(
            "pass --ticket, --latest or --from-export".to_string(),
        ));
    };

    render_outcome(&statement);
    Ok(())
}

/// Runs the whole pipeline against a bundled submission page, writing into
/// the configured output directory. Useful for demos and smoke checks
/// without forms-service credentials.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let workflow = StatementWorkflow::new(
        Box::new(InMemoryFormsGateway::new(sample_page())),
        config.documents.clone(),
    );

    println!("Absence statement demo (fixture data, no network)");
    let statement = workflow.generate_for_ticket(&args.ticket)?;
    render_outcome(&statement);
    Ok(())
}

fn render_outcome(statement: &GeneratedStatement) {
    println!("Statement generated");
    println!("  applicant: {}", statement.applicant_role.label());
    println!("  file:      {}", statement.path.display());
}
