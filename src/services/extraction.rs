use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::core::lexicon::canonical_categories;
use crate::models::{ChatTurn, FilterIntent};

/// Generic reply served when the extraction collaborator is unavailable.
const FALLBACK_REPLY: &str = "Je suis prêt à vous aider ! Que cherchez-vous au Bénin ?";

/// Errors that can occur when calling the extraction model
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Malformed extraction payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// What the user wants this turn, as classified upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Search,
    Chat,
}

/// A successful extraction: classified intent, best-effort filters, and a
/// short conversational reply to lead the response with.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub intent: IntentKind,
    pub filters: FilterIntent,
    pub reply: String,
}

/// Outcome of an extraction attempt.
///
/// Upstream failure is a value, not a suppressed exception, so callers
/// branch deterministically between the extracted intent and the fallback
/// reply.
#[derive(Debug, Clone)]
pub enum ExtractionOutcome {
    Extracted(Extraction),
    Fallback { reply: String },
}

/// Raw JSON shape the model is instructed to answer with.
#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(default)]
    intent: String,
    #[serde(default)]
    filters: FilterIntent,
    #[serde(default)]
    ai_reply: String,
}

/// Intent extraction client backed by the Gemini API.
///
/// The model is a black box producing a best-effort, possibly incomplete
/// structured filter object; everything downstream treats its output as
/// untrusted input.
pub struct ExtractionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ExtractionClient {
    pub fn new(endpoint: String, api_key: String, model: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint,
            api_key,
            model,
        }
    }

    /// Analyze a user message against the recent history.
    ///
    /// Never fails: any transport or format problem degrades to
    /// [`ExtractionOutcome::Fallback`] with a generic reply.
    pub async fn analyze(&self, message: &str, history: &[ChatTurn]) -> ExtractionOutcome {
        let today = chrono::Utc::now().date_naive();
        match self.request_extraction(message, history, today).await {
            Ok(extraction) => ExtractionOutcome::Extracted(extraction),
            Err(e) => {
                tracing::warn!("Intent extraction failed, falling back to chat: {}", e);
                ExtractionOutcome::Fallback {
                    reply: FALLBACK_REPLY.to_string(),
                }
            }
        }
    }

    async fn request_extraction(
        &self,
        message: &str,
        history: &[ChatTurn],
        today: NaiveDate,
    ) -> Result<Extraction, ExtractionError> {
        let prompt = build_prompt(message, history, today);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            urlencoding::encode(&self.api_key)
        );

        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "response_mime_type": "application/json",
                "temperature": 0.1
            }
        });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(ExtractionError::ApiError(format!(
                "Extraction request failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        parse_extraction(&json)
    }
}

/// Pull the model's JSON answer out of the generateContent envelope.
fn parse_extraction(response: &Value) -> Result<Extraction, ExtractionError> {
    let text = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|p| p.first())
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| ExtractionError::InvalidResponse("Missing candidate text".into()))?;

    let raw: RawExtraction = serde_json::from_str(text)?;

    let intent = match raw.intent.as_str() {
        "search" => IntentKind::Search,
        _ => IntentKind::Chat,
    };
    let reply = if raw.ai_reply.is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        raw.ai_reply
    };

    Ok(Extraction {
        intent,
        filters: raw.filters,
        reply,
    })
}

/// Build the extraction prompt: date context, extraction rules, and the
/// strict JSON response shape.
fn build_prompt(message: &str, history: &[ChatTurn], today: NaiveDate) -> String {
    let tomorrow = today.succ_opt().unwrap_or(today);
    let categories = canonical_categories().join(", ");
    let history_json = serde_json::to_string(history).unwrap_or_default();

    format!(
        r#"Tu es l'intelligence artificielle de l'Agenda.bj au Bénin. Aujourd'hui nous sommes le {today}.

TON RÔLE :
Analyser la demande de l'utilisateur et extraire TOUS les critères de recherche pertinents.

RÈGLES D'EXTRACTION TEMPORELLE :
1. 'date_start' et 'date_end' doivent TOUJOURS être au format YYYY-MM-DD.
2. SI "aujourd'hui" ou "ce soir" : start et end = {today}.
3. SI "demain" : start et end = {tomorrow}.
4. SI "ce week-end" : du Vendredi au Dimanche de CETTE semaine.
5. SI "la semaine prochaine" : du Lundi au Dimanche de la semaine suivante.
6. SI "ce mois" : du 1er au dernier jour du mois actuel.
7. SI "en [Mois]" : du 01 au dernier jour de ce mois.
8. SI aucune date mentionnée : date_start = {today}, date_end = null (événements futurs).

RÈGLES D'EXTRACTION DE CATÉGORIE :
Catégories reconnues : {categories}.
- Extrais la catégorie principale si mentionnée, la plus spécifique en cas de doute.
- Si aucune catégorie claire, mets null.

RÈGLES D'EXTRACTION DE VILLE :
- Villes et communes du Bénin : Cotonou, Porto-Novo, Abomey-Calavi, Ouidah, Parakou, Bohicon, Natitingou, Lokossa, Abomey, Grand-Popo, Sèmè-Kpodji, Djougou, Kandi...
- Gère les variantes (ex: "Calavi" = "Abomey-Calavi", "PK" = "Porto-Novo").

RÈGLES POUR search_query :
- Extrais les mots-clés thématiques spécifiques (ex: "jazz", "afrobeat", "startup", "yoga").
- NE PAS inclure les mots génériques comme "événement", "activité", "truc".
- Si question générale ("quoi de neuf", "que faire"), mets null.

RÈGLES POUR is_free :
- "gratuit", "free", "entrée libre" : is_free = true.
- "payant" : is_free = false.
- Sinon : is_free = null.

RÉPONDS UNIQUEMENT EN JSON VALIDE :
{{
  "intent": "search" | "chat",
  "filters": {{
    "city": string | null,
    "date_start": "YYYY-MM-DD" | null,
    "date_end": "YYYY-MM-DD" | null,
    "category": string | null,
    "search_query": string | null,
    "is_free": boolean | null
  }},
  "ai_reply": "Message court et chaleureux en français"
}}

Historique récent: {history_json}
Utilisateur: {message}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {"parts": [{"text": text}]}
            }]
        })
    }

    #[test]
    fn test_parse_extraction_search() {
        let payload = r#"{
            "intent": "search",
            "filters": {"city": "Cotonou", "search_query": "jazz"},
            "ai_reply": "Je cherche les concerts de jazz à Cotonou..."
        }"#;

        let extraction = parse_extraction(&envelope(payload)).unwrap();
        assert_eq!(extraction.intent, IntentKind::Search);
        assert_eq!(extraction.filters.city.as_deref(), Some("Cotonou"));
        assert_eq!(extraction.filters.search_query.as_deref(), Some("jazz"));
        assert!(extraction.reply.starts_with("Je cherche"));
    }

    #[test]
    fn test_parse_extraction_unknown_intent_is_chat() {
        let payload = r#"{"intent": "banter", "filters": {}, "ai_reply": "Bonjour !"}"#;
        let extraction = parse_extraction(&envelope(payload)).unwrap();
        assert_eq!(extraction.intent, IntentKind::Chat);
        assert!(extraction.filters.is_empty());
    }

    #[test]
    fn test_parse_extraction_empty_reply_gets_fallback() {
        let payload = r#"{"intent": "chat", "filters": {}}"#;
        let extraction = parse_extraction(&envelope(payload)).unwrap();
        assert_eq!(extraction.reply, FALLBACK_REPLY);
    }

    #[test]
    fn test_parse_extraction_missing_candidates() {
        let result = parse_extraction(&json!({"candidates": []}));
        assert!(matches!(result, Err(ExtractionError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_extraction_invalid_inner_json() {
        let result = parse_extraction(&envelope("pas du json"));
        assert!(matches!(result, Err(ExtractionError::MalformedPayload(_))));
    }

    #[test]
    fn test_build_prompt_carries_date_and_message() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let prompt = build_prompt("concerts ce soir", &[], today);
        assert!(prompt.contains("2026-08-06"));
        assert!(prompt.contains("2026-08-07"));
        assert!(prompt.contains("concerts ce soir"));
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = ExtractionClient::new(
            server.url(),
            "test-key".to_string(),
            "gemini-2.5-flash".to_string(),
            5,
        );

        let outcome = client.analyze("bonjour", &[]).await;
        match outcome {
            ExtractionOutcome::Fallback { reply } => assert_eq!(reply, FALLBACK_REPLY),
            ExtractionOutcome::Extracted(_) => panic!("expected fallback"),
        }
    }
}
