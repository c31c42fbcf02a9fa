//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON input of an RPC procedure.
///
/// An empty body reads as `{}` so procedures whose fields are all optional
/// can be called without one. Parse failures are reported as
/// [`ApiError::BadRequest`] in the standard error body.
pub struct RpcInput<T>(pub T);

impl<S, T> FromRequest<S> for RpcInput<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest {
                message: e.body_text(),
            })?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body)
            .map(Self)
            .map_err(|e| ApiError::BadRequest {
                message: format!("invalid request body: {}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Input {
        limit: Option<u32>,
    }

    async fn extract(body: &'static str) -> Result<Input, ApiError> {
        let req = Request::builder().body(Body::from(body)).unwrap();
        RpcInput::<Input>::from_request(req, &()).await.map(|RpcInput(i)| i)
    }

    #[tokio::test]
    async fn empty_body_is_empty_object() {
        let input = extract("").await.unwrap();
        assert_eq!(input.limit, None);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = extract("{\"limit\":").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn wrong_type_is_bad_request() {
        let err = extract("{\"limit\":\"ten\"}").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }
}
