use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::engine::present;
use crate::core::normalize::normalize;
use crate::core::Engine;
use crate::models::{ChatRequest, ChatResponse, ChatTurn, ErrorResponse, HealthResponse};
use crate::services::formatter;
use crate::services::{CatalogClient, ExtractionClient, ExtractionOutcome, IntentKind};

/// Number of history entries kept in the response (three exchanges).
const HISTORY_WINDOW: usize = 6;

/// Message words that ask for the full listing instead of a short page.
const FULL_LISTING_KEYWORDS: &[&str] = &[
    "tout",
    "tous",
    "liste",
    "enumere",
    "disponible",
    "complet",
    "entier",
];

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub extraction: Arc<ExtractionClient>,
    pub catalog: Arc<CatalogClient>,
    pub engine: Engine,
    pub default_limit: usize,
    pub expanded_limit: usize,
}

/// Configure all chat-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/chat", web::post().to(chat));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Conversational search endpoint
///
/// POST /api/v1/chat
///
/// Request body:
/// ```json
/// {
///   "message": "string",
///   "history": [{"role": "user|assistant", "content": "string"}]
/// }
/// ```
async fn chat(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for chat request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let extraction = match state.extraction.analyze(&req.message, &req.history).await {
        ExtractionOutcome::Extracted(extraction) => extraction,
        ExtractionOutcome::Fallback { reply } => {
            // Upstream analysis is down; answer gracefully and leave the
            // history untouched.
            return HttpResponse::Ok().json(ChatResponse {
                reply,
                history: req.history.clone(),
            });
        }
    };

    tracing::info!("Extracted filters: {:?}", extraction.filters);

    let mut reply = extraction.reply.clone();

    if extraction.intent == IntentKind::Search {
        let catalog = match state.catalog.fetch_events().await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("Catalog fetch failed, searching an empty catalog: {}", e);
                Arc::new(Vec::new())
            }
        };

        let ranked = state.engine.filter_events(&catalog, &extraction.filters);
        tracing::info!("Events matched: {} of {}", ranked.len(), catalog.len());

        if ranked.is_empty() {
            reply = format!(
                "{}\n\n{}",
                reply,
                formatter::no_results_note(&extraction.filters)
            );
        } else {
            let limit = if wants_full_listing(&req.message) {
                state.expanded_limit
            } else {
                state.default_limit
            };
            let page = present(ranked, limit);
            reply = format!(
                "{}\n\n{}\n\n{}",
                reply,
                formatter::format_events(&page.events),
                formatter::count_note(page.events.len(), page.total)
            );
        }
    }

    let mut history = req.history.clone();
    history.push(ChatTurn::user(req.message.clone()));
    history.push(ChatTurn::assistant(reply.clone()));

    HttpResponse::Ok().json(ChatResponse {
        reply,
        history: trim_history(history),
    })
}

/// "Show everything" detection on the raw user message.
fn wants_full_listing(message: &str) -> bool {
    let msg = normalize(message);
    FULL_LISTING_KEYWORDS.iter().any(|k| msg.contains(k))
}

fn trim_history(history: Vec<ChatTurn>) -> Vec<ChatTurn> {
    let overflow = history.len().saturating_sub(HISTORY_WINDOW);
    history.into_iter().skip(overflow).collect()
}
