//! Utilities for validating constraints on request bodies.

use super::{error::ApiError, extract::Json};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// A type that cannot be instatiated without validating the value within.
/// That is, if you have a [`Valid<T>`], `T` is guaranteed to be valid.
///
/// As an extractor it reads a JSON body and validates it before the handler runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Valid<T> {
    value: T,
}

impl<T> Valid<T> {
    /// Constructs a new validated value.
    pub fn new(value: T) -> Result<Valid<T>, ValidationErrors>
    where
        T: Validate,
    {
        value.validate().map(|_| Valid { value })
    }

    /// Returns a reference to the validated value.
    pub fn inner(&self) -> &T {
        &self.value
    }

    /// Returns the validated value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> AsRef<T> for Valid<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Valid::new(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::Valid;
    use crate::infra::error::{ApiError, ClientError};
    use axum::{body::Body, extract::FromRequest};
    use http::Request;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Validate, Deserialize)]
    struct Fields {
        #[validate(length(min = 1))]
        title: String,
        #[validate(length(min = 1))]
        subtitle: Option<String>,
    }

    async fn extract(body: &'static str) -> Result<Valid<Fields>, ApiError> {
        let req = Request::post("/")
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap();
        Valid::<Fields>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn valid_body_succeeds() {
        let value = extract(r#"{ "title": "Minecraft", "subtitle": "Java Edition" }"#)
            .await
            .unwrap();
        assert_eq!("Minecraft", value.inner().title);
    }

    #[tokio::test]
    async fn missing_optional_field_succeeds() {
        let value = extract(r#"{ "title": "Minecraft" }"#).await.unwrap();
        assert!(value.into_inner().subtitle.is_none());
    }

    #[tokio::test]
    async fn invalid_value_fails() {
        let error = extract(r#"{ "title": "" }"#).await.unwrap_err();
        assert_eq!("invalid field(s): title (length)", error.to_string());
    }

    #[tokio::test]
    async fn invalid_optional_value_fails() {
        let result = extract(r#"{ "title": "Minecraft", "subtitle": "" }"#).await;
        assert!(matches!(
            result,
            Err(ApiError::ClientError(ClientError::BadRequest(_)))
        ));
    }

    #[tokio::test]
    async fn wrong_type_fails_before_validation() {
        let result = extract(r#"{ "title": 42 }"#).await;
        assert!(matches!(
            result,
            Err(ApiError::ClientError(ClientError::BadRequest(_)))
        ));
    }
}
