use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use relay_core::Error as RelayError;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug)]
pub struct ServerError(anyhow::Error);

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        let status = self.status_code();
        (status, self.to_string()).into_response()
    }
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        let err = &self.0;
        for cause in err.chain() {
            if let Some(err) = cause.downcast_ref::<RelayError>() {
                match err {
                    RelayError::Upstream(_) => return StatusCode::BAD_GATEWAY,
                    RelayError::RunawayPagination(_) => return StatusCode::BAD_GATEWAY,
                    RelayError::RateLimit(_) => return StatusCode::TOO_MANY_REQUESTS,
                    RelayError::Timeout(_) => return StatusCode::GATEWAY_TIMEOUT,
                    _ => return StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
            if let Some(err) = cause.downcast_ref::<twitter_client::Error>() {
                match err {
                    twitter_client::Error::RateLimit(_) => return StatusCode::TOO_MANY_REQUESTS,
                    twitter_client::Error::NotFound(_) => return StatusCode::NOT_FOUND,
                    twitter_client::Error::NetworkError(_) => return StatusCode::BAD_GATEWAY,
                    twitter_client::Error::Api(_) => return StatusCode::BAD_GATEWAY,
                    _ => return StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
            if let Some(err) = cause.downcast_ref::<dexscreener_client::Error>() {
                match err {
                    dexscreener_client::Error::RateLimit => return StatusCode::TOO_MANY_REQUESTS,
                    dexscreener_client::Error::NetworkError(_) => return StatusCode::BAD_GATEWAY,
                    _ => return StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
            if let Some(err) = cause.downcast_ref::<telegram_client::Error>() {
                match err {
                    telegram_client::Error::RateLimit(_) => return StatusCode::TOO_MANY_REQUESTS,
                    telegram_client::Error::Api { code: 400, .. } => return StatusCode::BAD_REQUEST,
                    telegram_client::Error::Api { .. } => return StatusCode::BAD_GATEWAY,
                    telegram_client::Error::NetworkError(_) => return StatusCode::BAD_GATEWAY,
                    _ => return StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
            if cause.downcast_ref::<relay_util::ParsingError>().is_some() {
                return StatusCode::BAD_REQUEST;
            }
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Only failures the reconciliation reports as transient are worth another attempt.
    pub fn retryable(&self) -> bool {
        self.0
            .chain()
            .find_map(|cause| cause.downcast_ref::<RelayError>())
            .is_some_and(|err| err.retryable())
    }
}
