mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use partner_align::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
