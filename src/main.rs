use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match rci_last_call::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Failed to start server: {e}");
            ExitCode::FAILURE
        }
    }
}
