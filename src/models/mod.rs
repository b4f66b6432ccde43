// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ChatTurn, Event, FilterIntent, ScoredEvent, ScoringWeights, SearchPage};
pub use requests::ChatRequest;
pub use responses::{ChatResponse, ErrorResponse, HealthResponse};
