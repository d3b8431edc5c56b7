use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lp_il_analysis::AnalysisError;
use lp_il_domain::SnapshotError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request parameters.
    #[error("{0}")]
    BadRequest(String),

    /// No analyzer is configured for the chain id.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(u64),

    /// The pool analysis failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::UnsupportedChain(_) => StatusCode::BAD_REQUEST,
            Self::Analysis(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            Self::Analysis(AnalysisError::Snapshot(SnapshotError::WeightCount { .. })) => {
                StatusCode::BAD_REQUEST
            }
            Self::Analysis(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            Self::Analysis(
                AnalysisError::PriceUnavailable { .. }
                | AnalysisError::Tokens(_)
                | AnalysisError::Reserves(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lp_il_protocols::error::CallError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::UnsupportedChain(999).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AnalysisError::EmptyWindow).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AnalysisError::Tokens(CallError::Reverted("no".into()))).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(AnalysisError::Tokens(CallError::Transport("down".into()))).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(AnalysisError::PriceUnavailable {
                symbol: "XYZ".into(),
                address: "0x0".into()
            })
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
