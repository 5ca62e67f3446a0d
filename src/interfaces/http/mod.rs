use actix_cors::Cors;
use actix_multipart::form::bytes::Bytes;
use actix_multipart::form::text::Text;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};

use crate::application::{ChartDataService, ChartMode};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::ServerConfig;
use crate::infrastructure::csv::TableParser;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub config: ServerConfig,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

static UNSAFE_FILENAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]+").unwrap());

/// Strip path components and unsafe characters from a client-supplied
/// filename before it is logged or echoed anywhere.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    UNSAFE_FILENAME_PATTERN
        .replace_all(base, "_")
        .trim_matches('_')
        .to_string()
}

/// The upload endpoint only accepts files named `*.csv`.
fn allowed_file(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Reject uploads with no file part, an empty filename, or a filename
/// without the expected extension.
fn validate_upload(file: Option<Bytes>) -> Result<Bytes> {
    let file = file.ok_or(AppError::MissingUpload)?;
    let name = file.file_name.as_deref().unwrap_or("");
    if name.is_empty() || !allowed_file(name) {
        return Err(AppError::InvalidExtension(sanitize_filename(name)));
    }
    Ok(file)
}

/// Map an error to its HTTP response. Upload validation failures keep
/// the fixed plain-text bodies the charting client matches on; anything
/// surfaced from parsing or computation becomes a 500 with the message
/// in a JSON envelope.
fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::MissingUpload => HttpResponse::BadRequest().body("No file part"),
        AppError::InvalidExtension(_) => HttpResponse::BadRequest().body("Invalid file"),
        _ => HttpResponse::InternalServerError().json(json!({ "error": err.to_string() })),
    }
}

#[derive(MultipartForm)]
pub struct UploadForm {
    pub file: Option<Bytes>,
    pub x_axis_column: Text<String>,
    pub y_axis_column: Text<String>,
    pub header_row: Option<Text<usize>>,
    pub graph_type: Option<Text<String>>,
}

#[derive(MultipartForm)]
pub struct ColumnNamesForm {
    pub file: Option<Bytes>,
    pub header_row: Option<Text<usize>>,
}

#[post("/upload")]
async fn upload(data: web::Data<HttpState>, form: MultipartForm<UploadForm>) -> impl Responder {
    let UploadForm {
        file,
        x_axis_column,
        y_axis_column,
        header_row,
        graph_type,
    } = form.into_inner();

    let header_row = header_row.map(|t| t.into_inner()).unwrap_or(0);
    let mode = ChartMode::from_graph_type(graph_type.as_ref().map(|t| t.as_str()));

    let result = validate_upload(file).and_then(|file| {
        add_log(
            &data.logs,
            "INFO",
            "Upload",
            &format!(
                "Processing {} (header_row={} mode={:?})",
                sanitize_filename(file.file_name.as_deref().unwrap_or("")),
                header_row,
                mode
            ),
        );

        let content = TableParser::decode(&file.data);
        let table = ChartDataService::parse_table(&content, header_row)?;

        let y_axes: Vec<String> = y_axis_column.split(',').map(|s| s.to_string()).collect();
        ChartDataService::chart_payload(&table, &x_axis_column, &y_axes, mode)
    });

    match result {
        Ok(payload) => HttpResponse::Ok().json(payload),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Upload",
                &format!("Chart extraction failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[post("/get_column_names")]
async fn get_column_names(
    data: web::Data<HttpState>,
    form: MultipartForm<ColumnNamesForm>,
) -> impl Responder {
    let ColumnNamesForm { file, header_row } = form.into_inner();
    let header_row = header_row.map(|t| t.into_inner()).unwrap_or(0);

    let result = file.ok_or(AppError::MissingUpload).and_then(|file| {
        let content = TableParser::decode(&file.data);
        ChartDataService::column_names(&content, header_row)
    });

    match result {
        Ok(names) => HttpResponse::Ok().json(names),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "ColumnNames",
                &format!("Failed to read column names: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap();
    HttpResponse::Ok().json(&*logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
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
    let mut logs = logs.lock().unwrap();
    logs.push(entry.clone());
    if logs.len() > 100 {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn start_server(
    config: ServerConfig,
    logs: Arc<Mutex<Vec<LogEntry>>>,
) -> std::io::Result<Server> {
    let bind = (config.host.clone(), config.port);
    let max_upload = config.max_upload_bytes;
    let state = web::Data::new(HttpState { config, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // The charting front-end may be served from anywhere

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(max_upload)
                    .memory_limit(max_upload),
            )
            .service(upload)
            .service(
                web::scope("/api")
                    .service(get_column_names)
                    .service(get_logs),
            )
    })
    .bind(bind)?
    .run();

    Ok(server)
}
