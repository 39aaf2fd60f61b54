use crate::generate::{run_demo, run_generate, DemoArgs, GenerateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use statements::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Absence Statement Service",
    about = "Generate student absence statements from survey form submissions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with absence statements from the command line
    Statement {
        #[command(subcommand)]
        command: StatementCommand,
    },
}

#[derive(Subcommand, Debug)]
enum StatementCommand {
    /// Fetch a submission and generate the filled statement
    Generate(GenerateArgs),
    /// Run the full pipeline against a bundled fixture, no network needed
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Statement {
            command: StatementCommand::Generate(args),
        } => tokio::task::spawn_blocking(move || run_generate(args)).await?,
        Command::Statement {
            command: StatementCommand::Demo(args),
        } => tokio::task::spawn_blocking(move || run_demo(args)).await?,
    }
}
