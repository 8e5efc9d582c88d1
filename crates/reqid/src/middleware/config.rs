//! Configuration for request identifier resolution.

use axum::http::{HeaderMap, HeaderName};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::context::RequestContext;
use crate::id::{GenerateRequestId, GeneratorKind, RequestId, SharedGenerator};
use crate::{Error, Result};

/// Header trusted and emitted by the default configuration.
pub const DEFAULT_HEADER: &str = "Request-Id";

/// Where a resolved identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum IdSource {
    /// Already bound in the request context.
    Context,
    /// Read from the configured request header.
    Header,
    /// Produced by the generator.
    Generated,
}

/// How request identifiers are sourced and exposed.
///
/// `None` for either header disables that side: no inbound header is trusted,
/// or no response header is written.
#[derive(Debug, Clone)]
#[must_use = "config does nothing unless you use it"]
pub struct RequestIdConfig {
    request_header: Option<HeaderName>,
    response_header: Option<HeaderName>,
    generator: SharedGenerator,
}

impl RequestIdConfig {
    /// Creates the default configuration, see [`Default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that trusts no inbound header, writes no
    /// response header and uses the default generator.
    pub fn disabled() -> Self {
        Self {
            request_header: None,
            response_header: None,
            generator: SharedGenerator::default(),
        }
    }

    /// Sets the inbound header to trust. An empty name disables it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Config`] if `name` is not a valid header name.
    ///
    /// [`ErrorKind::Config`]: crate::ErrorKind::Config
    pub fn with_request_header(mut self, name: &str) -> Result<Self> {
        self.request_header = parse_header_name(name)?;
        Ok(self)
    }

    /// Sets the response header to emit. An empty name disables it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Config`] if `name` is not a valid header name.
    ///
    /// [`ErrorKind::Config`]: crate::ErrorKind::Config
    pub fn with_response_header(mut self, name: &str) -> Result<Self> {
        self.response_header = parse_header_name(name)?;
        Ok(self)
    }

    /// Replaces the generator used when no identifier is otherwise available.
    pub fn with_generator(mut self, generator: impl GenerateRequestId) -> Self {
        self.generator = SharedGenerator::new(generator);
        self
    }

    /// Returns the trusted inbound header, if any.
    #[inline]
    #[must_use]
    pub fn request_header(&self) -> Option<&HeaderName> {
        self.request_header.as_ref()
    }

    /// Returns the emitted response header, if any.
    #[inline]
    #[must_use]
    pub fn response_header(&self) -> Option<&HeaderName> {
        self.response_header.as_ref()
    }

    /// Resolves the effective identifier for a request.
    ///
    /// The context wins over the inbound header, which wins over generation.
    /// The generator is only called when both are absent.
    ///
    /// # Errors
    ///
    /// Returns the generator's error when generation was needed and failed.
    pub fn resolve(
        &self,
        context: &RequestContext,
        headers: &HeaderMap,
    ) -> Result<(RequestId, IdSource)> {
        if let Some(id) = context.request_id() {
            return Ok((id.clone(), IdSource::Context));
        }

        let from_header = self
            .request_header
            .as_ref()
            .and_then(|name| headers.get(name))
            .and_then(RequestId::from_header_value);

        if let Some(id) = from_header {
            return Ok((id, IdSource::Header));
        }

        let id = self.generator.generate()?;
        Ok((id, IdSource::Generated))
    }
}

impl Default for RequestIdConfig {
    /// Trusts and emits [`DEFAULT_HEADER`] on both sides.
    fn default() -> Self {
        let name = HeaderName::from_static("request-id");
        Self {
            request_header: Some(name.clone()),
            response_header: Some(name),
            generator: SharedGenerator::default(),
        }
    }
}

fn parse_header_name(name: &str) -> Result<Option<HeaderName>> {
    if name.is_empty() {
        return Ok(None);
    }

    HeaderName::try_from(name).map(Some).map_err(|err| {
        Error::config(format!("invalid header name '{name}'")).with_source(err)
    })
}

/// Plain-data request identifier settings.
///
/// Mirrors [`RequestIdConfig`] with strings and a named generator so it can
/// be deserialized or parsed from the command line. Empty header names
/// disable the corresponding side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RequestIdSettings {
    /// Inbound header whose value is adopted as the request identifier.
    /// Pass an empty string to never trust inbound headers.
    #[cfg_attr(
        feature = "config",
        arg(long = "request-id-header", env = "REQUEST_ID_HEADER", default_value = DEFAULT_HEADER)
    )]
    #[serde(default = "default_header")]
    pub request_header: String,

    /// Response header that receives the resolved identifier.
    /// Pass an empty string to never set a response header.
    #[cfg_attr(
        feature = "config",
        arg(long = "response-id-header", env = "RESPONSE_ID_HEADER", default_value = DEFAULT_HEADER)
    )]
    #[serde(default = "default_header")]
    pub response_header: String,

    /// Generator used when neither the context nor the request supplies an id.
    #[cfg_attr(
        feature = "config",
        arg(long = "request-id-generator", env = "REQUEST_ID_GENERATOR", value_enum, default_value_t = GeneratorKind::AlphaTimestamp)
    )]
    #[serde(default)]
    pub generator: GeneratorKind,
}

fn default_header() -> String {
    DEFAULT_HEADER.to_owned()
}

impl Default for RequestIdSettings {
    fn default() -> Self {
        Self {
            request_header: default_header(),
            response_header: default_header(),
            generator: GeneratorKind::default(),
        }
    }
}

impl TryFrom<RequestIdSettings> for RequestIdConfig {
    type Error = Error;

    fn try_from(settings: RequestIdSettings) -> Result<Self> {
        let mut config = RequestIdConfig::disabled()
            .with_request_header(&settings.request_header)?
            .with_response_header(&settings.response_header)?;
        config.generator = settings.generator.into_generator();

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::HeaderValue;

    use super::*;
    use crate::ErrorKind;

    fn fixed(value: &'static str) -> impl GenerateRequestId {
        move || RequestId::new(value)
    }

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn default_uses_request_id_header() {
        let config = RequestIdConfig::default();
        assert_eq!(config.request_header().unwrap(), "request-id");
        assert_eq!(config.response_header().unwrap(), "request-id");
    }

    #[test]
    fn empty_names_disable_headers() {
        let config = RequestIdConfig::default()
            .with_request_header("")
            .unwrap()
            .with_response_header("")
            .unwrap();

        assert!(config.request_header().is_none());
        assert!(config.response_header().is_none());
    }

    #[test]
    fn invalid_names_are_rejected() {
        let error = RequestIdConfig::disabled()
            .with_request_header("not a header")
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn context_wins_over_header_and_generator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let config = RequestIdConfig::default().with_generator(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            RequestId::new("from-make")
        });

        let ctx = RequestContext::new().with_request_id(RequestId::new("from-ctx").unwrap());
        let (id, source) = config
            .resolve(&ctx, &headers("request-id", "from-header"))
            .unwrap();

        assert_eq!(id.as_str(), "from-ctx");
        assert_eq!(source, IdSource::Context);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn header_wins_over_generator() {
        let config = RequestIdConfig::default().with_generator(|| -> Result<RequestId> {
            Err(Error::generation("must not be called"))
        });

        let (id, source) = config
            .resolve(&RequestContext::new(), &headers("request-id", "from-header"))
            .unwrap();

        assert_eq!(id.as_str(), "from-header");
        assert_eq!(source, IdSource::Header);
    }

    #[test]
    fn empty_header_value_falls_back_to_generator() {
        let config = RequestIdConfig::default().with_generator(fixed("from-make"));
        let (id, source) = config
            .resolve(&RequestContext::new(), &headers("request-id", ""))
            .unwrap();

        assert_eq!(id.as_str(), "from-make");
        assert_eq!(source, IdSource::Generated);
    }

    #[test]
    fn disabled_request_header_ignores_inbound_value() {
        let config = RequestIdConfig::disabled().with_generator(fixed("from-make"));
        let (id, source) = config
            .resolve(&RequestContext::new(), &headers("request-id", "from-header"))
            .unwrap();

        assert_eq!(id.as_str(), "from-make");
        assert_eq!(source, IdSource::Generated);
    }

    #[test]
    fn generator_error_is_returned() {
        let config = RequestIdConfig::disabled()
            .with_generator(|| -> Result<RequestId> { Err(Error::generation("make error")) });

        let error = config
            .resolve(&RequestContext::new(), &HeaderMap::new())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Generation);
    }

    #[test]
    fn settings_convert_into_config() {
        let settings = RequestIdSettings {
            request_header: "X-Input".to_owned(),
            response_header: String::new(),
            generator: GeneratorKind::UuidV7,
        };

        let config = RequestIdConfig::try_from(settings).unwrap();
        assert_eq!(config.request_header().unwrap(), "x-input");
        assert!(config.response_header().is_none());
    }

    #[test]
    fn settings_default_matches_config_default() {
        let config = RequestIdConfig::try_from(RequestIdSettings::default()).unwrap();
        assert_eq!(config.request_header().unwrap(), "request-id");
        assert_eq!(config.response_header().unwrap(), "request-id");
    }
}
