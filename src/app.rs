use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::qa_canvas::QaCanvasUseCase;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::Settings;
use crate::infrastructure::llm_clients::{LlmStructuredGenerator, RouterClient};
use crate::interfaces::http::{add_log, start_server, LogBuffer};

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            init_tracing("info");
            error!(error = %err, "Failed to load settings");
            return Err(err);
        }
    };
    init_tracing(&settings.log_filter);

    info!(
        provider = ?settings.llm.provider,
        base_url = %settings.llm.base_url,
        model = %settings.llm.model,
        fallback_to_minimal = settings.generation.fallback_to_minimal,
        "Starting QA canvas service"
    );

    let generator = LlmStructuredGenerator::new(Arc::new(RouterClient::new()), settings.llm.clone());
    let qa_canvas = Arc::new(QaCanvasUseCase::new(
        Arc::new(generator),
        settings.generation.clone(),
    ));

    let logs: LogBuffer = Arc::new(Mutex::new(VecDeque::new()));
    let server = start_server(
        qa_canvas,
        logs.clone(),
        &settings.server.host,
        settings.server.port,
    )
    .map_err(|e| {
        AppError::Internal(format!(
            "Failed to bind {}:{}: {}",
            settings.server.host, settings.server.port, e
        ))
    })?;

    add_log(
        &logs,
        "INFO",
        "System",
        &format!(
            "HTTP server started on {}:{}",
            settings.server.host, settings.server.port
        ),
    );
    info!(host = %settings.server.host, port = settings.server.port, "HTTP server listening");

    server
        .await
        .map_err(|e| AppError::Internal(format!("HTTP server stopped: {}", e)))
}
