//! Extractor collecting query, form and upload parameters of a request

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{FormRejection, QueryRejection},
        FromRequest, Multipart, Query, Request,
    },
    http::{header::CONTENT_TYPE, Method},
    response::{IntoResponse, Response},
    Form,
};
use bytes::Bytes;
use thiserror::Error;

use super::envelope::ResponseEnvelope;
use crate::domain::ParameterBag;

/// Raw parameters of a request, before any validation
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    pub method: Method,
    pub query: ParameterBag,
    /// Body parameters; only read for POST
    pub form: Option<ParameterBag>,
    /// First uploaded file of a multipart body
    pub file: Option<Bytes>,
}

impl RequestParams {
    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    /// Form parameters when the request is a POST carrying at least one key
    pub fn posted_form(&self) -> Option<&ParameterBag> {
        self.form
            .as_ref()
            .filter(|form| self.is_post() && !form.is_empty())
    }

    /// Query parameters followed by form parameters
    pub fn merged(&self) -> ParameterBag {
        let mut merged = self.query.clone();
        if let Some(form) = &self.form {
            merged.extend(form.clone());
        }
        merged
    }
}

#[derive(Debug, Error)]
pub enum ParamsRejection {
    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("Invalid form body: {0}")]
    Form(#[from] FormRejection),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartRejection),

    #[error("Invalid multipart field: {0}")]
    MultipartField(#[from] MultipartError),
}

impl IntoResponse for ParamsRejection {
    fn into_response(self) -> Response {
        ResponseEnvelope::failure(self.to_string()).into_response()
    }
}

impl<S> FromRequest<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = ParamsRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())?;
        let query = ParameterBag::from_pairs(pairs);

        if method != Method::POST {
            return Ok(Self {
                method,
                query,
                form: None,
                file: None,
            });
        }

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let (form, file) = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            read_multipart(multipart).await?
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
            (ParameterBag::from_pairs(pairs), None)
        } else {
            (ParameterBag::new(), None)
        };

        Ok(Self {
            method,
            query,
            form: Some(form),
            file,
        })
    }
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(ParameterBag, Option<Bytes>), MultipartError> {
    let mut form = ParameterBag::new();
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some() {
            let bytes = field.bytes().await?;
            if file.is_none() {
                file = Some(bytes);
            }
            continue;
        }

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field.text().await?;
        form.push(name, value);
    }

    Ok((form, file))
}
