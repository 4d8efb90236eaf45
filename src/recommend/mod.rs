pub mod dispatch;
pub mod http;
pub mod service;
pub mod types;

pub use http::HttpRecommendationService;
pub use service::{RecommendationService, ServiceError};
pub use types::{RecommendRequest, RecommendResponse};
