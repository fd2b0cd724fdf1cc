use crate::application::use_cases::document_schema::{
    validate_analysis_request, validate_qa_canvas_document, validate_suggestion_request,
};
use crate::application::use_cases::qa_canvas::QaCanvasUseCase;
use crate::domain::error::{AppError, FieldError};
use actix_cors::Cors;
use actix_web::{
    dev::Server, get, http::StatusCode, post, web, App, HttpResponse, HttpServer, Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub type LogBuffer = Arc<Mutex<VecDeque<LogEntry>>>;

pub struct HttpState {
    pub qa_canvas: Arc<QaCanvasUseCase>,
    pub logs: LogBuffer,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    details: Vec<FieldError>,
}

fn validation_failed(details: Vec<FieldError>) -> HttpResponse {
    let message = match details.len() {
        1 => details[0].to_string(),
        n => format!("{} fields failed validation", n),
    };
    HttpResponse::BadRequest().json(ErrorBody {
        error: "validation",
        message,
        details,
    })
}

fn error_response(err: AppError) -> HttpResponse {
    let status = match &err {
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::InvalidDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::ParseError(_) | AppError::LLMError(_) => StatusCode::BAD_GATEWAY,
        AppError::ConfigError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = err.to_string();
    let error = err.kind();
    let details = match err {
        AppError::InvalidDocument(errors) => errors,
        _ => Vec::new(),
    };
    HttpResponse::build(status).json(ErrorBody {
        error,
        message,
        details,
    })
}

#[post("/analyze-ticket")]
async fn analyze_ticket(data: web::Data<HttpState>, body: web::Json<Value>) -> impl Responder {
    let request = match validate_analysis_request(&body) {
        Ok(request) => request,
        Err(details) => {
            add_log(
                &data.logs,
                "WARN",
                "HttpApi",
                &format!("Rejected analyze-ticket request ({} errors)", details.len()),
            );
            return validation_failed(details);
        }
    };

    let ticket_id = request.ticket_json.issue_key.clone();
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!(
            "Analyzing ticket {} (format={})",
            ticket_id, request.qa_profile.test_case_format
        ),
    );

    match data.qa_canvas.generate_document(request).await {
        Ok(document) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!(
                    "Generated {} test cases for {}",
                    document.test_cases.len(),
                    ticket_id
                ),
            );
            HttpResponse::Ok().json(document)
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Analysis of {} failed: {}", ticket_id, e),
            );
            error_response(e)
        }
    }
}

#[post("/analyze-ticket/preview")]
async fn preview_ticket(data: web::Data<HttpState>, body: web::Json<Value>) -> impl Responder {
    match validate_analysis_request(&body) {
        Ok(request) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!("Previewing analysis of {}", request.ticket_json.issue_key),
            );
            HttpResponse::Ok().json(data.qa_canvas.preview(&request))
        }
        Err(details) => validation_failed(details),
    }
}

#[post("/generate-suggestions")]
async fn generate_suggestions(
    data: web::Data<HttpState>,
    body: web::Json<Value>,
) -> impl Responder {
    let request = match validate_suggestion_request(&body) {
        Ok(request) => request,
        Err(details) => return validation_failed(details),
    };

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!(
            "Generating up to {} suggestions for {}",
            request.max_suggestions, request.current_document.metadata.ticket_id
        ),
    );

    match data.qa_canvas.generate_suggestions(request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Suggestion generation failed: {}", e),
            );
            error_response(e)
        }
    }
}

#[post("/validate-document")]
async fn validate_document(data: web::Data<HttpState>, body: web::Json<Value>) -> impl Responder {
    match validate_qa_canvas_document(&body) {
        Ok(_) => HttpResponse::Ok().json(json!({ "valid": true })),
        Err(details) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!("Document failed validation ({} errors)", details.len()),
            );
            validation_failed(details)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(|p| p.into_inner());
    HttpResponse::Ok().json(&*logs)
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn add_log_entry(
    logs: &Mutex<VecDeque<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|p| p.into_inner());
    logs.push_back(entry.clone());
    while logs.len() > MAX_LOG_ENTRIES {
        logs.pop_front();
    }
    entry
}

pub fn add_log(logs: &Mutex<VecDeque<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(
        web::scope("/api")
            .service(preview_ticket)
            .service(analyze_ticket)
            .service(generate_suggestions)
            .service(validate_document)
            .service(get_logs),
    );
}

pub fn start_server(
    qa_canvas: Arc<QaCanvasUseCase>,
    logs: LogBuffer,
    host: &str,
    port: u16,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { qa_canvas, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // local tool, any origin

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
