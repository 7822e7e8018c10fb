//! Content delivery: conditional GET, response headers and byte streaming.
//!
//! Routes that send stored bytes follow the same sequence: answer 304 through
//! [`respond_not_modified`] when possible, plan [`DeliveryHeaders`], then hand
//! the source to [`stream::ContentStreamer`].

pub mod conditional;
pub mod disposition;
pub mod stream;

use chrono::{DateTime, Utc};
use salvo::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use vellum_core::config::DispositionThreshold;

use crate::error::{ServiceError, ServiceResult};

use conditional::{CacheDecision, evaluate, format_http_date, if_modified_since};
use disposition::{Disposition, content_disposition};

/// Destination for planned response headers.
pub trait HeaderSink {
    /// ## Errors
    /// Returns `InvariantViolation` if the value is not a valid header value.
    fn set_header(&mut self, name: HeaderName, value: &str) -> ServiceResult<()>;
}

impl HeaderSink for HeaderMap {
    fn set_header(&mut self, name: HeaderName, value: &str) -> ServiceResult<()> {
        let value = HeaderValue::from_str(value)
            .map_err(|_err| ServiceError::InvariantViolation("Invalid response header value"))?;
        self.insert(name, value);
        Ok(())
    }
}

impl HeaderSink for salvo::Response {
    fn set_header(&mut self, name: HeaderName, value: &str) -> ServiceResult<()> {
        self.headers_mut().set_header(name, value)
    }
}

/// Headers describing a body before any of it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryHeaders {
    pub content_type: String,
    pub content_length: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_encoding: Option<&'static str>,
    pub content_disposition: Option<String>,
}

impl DeliveryHeaders {
    /// ## Summary
    /// Plans headers for `length` bytes, marking the body as an attachment when
    /// the threshold forces it.
    #[must_use]
    pub fn plan(
        content_type: &str,
        length: u64,
        filename: &str,
        threshold: DispositionThreshold,
    ) -> Self {
        let content_disposition = threshold
            .forces_attachment(length)
            .then(|| content_disposition(Disposition::Attachment, filename));

        Self {
            content_type: content_type.to_string(),
            content_length: length,
            last_modified: None,
            content_encoding: None,
            content_disposition,
        }
    }

    #[must_use]
    pub fn with_disposition(mut self, disposition: Disposition, filename: &str) -> Self {
        self.content_disposition = Some(content_disposition(disposition, filename));
        self
    }

    #[must_use]
    pub const fn with_last_modified(mut self, last_modified: Option<DateTime<Utc>>) -> Self {
        self.last_modified = last_modified;
        self
    }

    #[must_use]
    pub const fn with_content_encoding(mut self, encoding: Option<&'static str>) -> Self {
        self.content_encoding = encoding;
        self
    }

    /// ## Errors
    /// Returns `InvariantViolation` if a planned value is not a valid header value.
    pub fn apply(&self, sink: &mut impl HeaderSink) -> ServiceResult<()> {
        sink.set_header(header::CONTENT_TYPE, &self.content_type)?;
        sink.set_header(header::CONTENT_LENGTH, &self.content_length.to_string())?;
        if let Some(last_modified) = self.last_modified {
            sink.set_header(header::LAST_MODIFIED, &format_http_date(last_modified))?;
        }
        if let Some(encoding) = self.content_encoding {
            sink.set_header(header::CONTENT_ENCODING, encoding)?;
        }
        if let Some(disposition) = &self.content_disposition {
            sink.set_header(header::CONTENT_DISPOSITION, disposition)?;
        }
        Ok(())
    }
}

/// ## Summary
/// Answers `304 Not Modified` when the request's `If-Modified-Since` covers
/// `last_modified`. Returns `true` if the response is complete.
///
/// ## Errors
/// Returns `InvariantViolation` if the `Last-Modified` header cannot be set.
#[tracing::instrument(skip(req, res))]
pub fn respond_not_modified(
    req: &salvo::Request,
    res: &mut salvo::Response,
    last_modified: Option<DateTime<Utc>>,
) -> ServiceResult<bool> {
    match evaluate(last_modified, if_modified_since(req.headers())) {
        CacheDecision::Stream => Ok(false),
        CacheDecision::NotModified => {
            tracing::debug!("Content not modified since client copy");
            res.status_code(salvo::http::StatusCode::NOT_MODIFIED);
            if let Some(last_modified) = last_modified {
                HeaderSink::set_header(res, header::LAST_MODIFIED, &format_http_date(last_modified))?;
            }
            Ok(true)
        }
    }
}
