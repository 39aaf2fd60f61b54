mod cli;
mod commands;
mod generate;
mod infra;
mod routes;
mod server;

use statements::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
