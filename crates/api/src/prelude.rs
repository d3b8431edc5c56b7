pub use crate::config::{AppConfig, ConfigError, ServerConfig};
pub use crate::error::ApiError;
pub use crate::models::{
    EstimateRequest, HealthResponse, PositionRequest, ScenariosQuery, ScenariosResponse,
};
pub use crate::routes::create_router;
pub use crate::server::ApiServer;
pub use crate::state::{AppState, StateError};
