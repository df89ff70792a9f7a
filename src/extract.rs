//! Body extractors that reject with the API's `{"detail": ...}` format

use axum::{
    async_trait,
    extract::{rejection::FormRejection, rejection::JsonRejection, FromRequest, Request},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body; malformed input becomes [`ApiError::MalformedBody`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

/// URL-encoded form body; malformed input becomes [`ApiError::MalformedBody`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(FormBody(value)),
            Err(rejection) => Err(form_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::MalformedBody {
        status: rejection.status(),
        message: rejection.body_text(),
    }
}

fn form_rejection(rejection: FormRejection) -> ApiError {
    ApiError::MalformedBody {
        status: rejection.status(),
        message: rejection.body_text(),
    }
}
