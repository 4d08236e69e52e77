//! Request parameter extractors.
//!
//! Handlers read loose string parameters the way an HTML form submits them.
//! A repeated key resolves to its first value, and extractor failures are
//! reported as [`AppError`] so every error body stays JSON.

use axum::{
    Form,
    extract::{FromRequest, FromRequestParts, Multipart, Query, Request},
    http::{Method, header::CONTENT_TYPE, request::Parts},
};

use crate::error::AppError;

const URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// Key/value pairs in the order they were sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// First value sent for `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Owned copy of the first value sent for `key`.
    #[must_use]
    pub fn take(&self, key: &str) -> Option<String> {
        self.first(key).map(str::to_string)
    }
}

impl From<Vec<(String, String)>> for Params {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

/// Query string parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(pub Params);

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Self(pairs.into()))
    }
}

/// Form fields from the body, or from the query string on `GET`/`HEAD`.
///
/// Accepts urlencoded and multipart bodies. File parts are skipped. Any other
/// content type, or no body at all, yields no fields.
#[derive(Debug, Clone, Default)]
pub struct FormParams(pub Params);

impl<S> FromRequest<S> for FormParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.method() == Method::GET || req.method() == Method::HEAD {
            let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self(pairs.into()));
        }

        let mime = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            URLENCODED => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Ok(Self(pairs.into()))
            }
            MULTIPART => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Ok(Self(read_multipart(multipart).await?))
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Collect the text parts of a multipart body.
async fn read_multipart(mut multipart: Multipart) -> Result<Params, AppError> {
    let mut pairs = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        pairs.push((name, value));
    }

    Ok(pairs.into())
}
