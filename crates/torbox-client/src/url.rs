//! URL construction helpers for TorBox API calls.
//!
//! Pure functions only: the dispatcher decides what goes into a URL, these
//! helpers decide how it is spelled.

use url::Url;

use crate::error::{TransportCause, TransportFailure};

/// Ordered name/value parameters.
///
/// Used for both query strings and form bodies. Parameters whose value is
/// absent are kept in order but never emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Option<String>)>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, Some(value));
        self
    }

    /// Append a parameter that is skipped when `value` is `None`.
    #[must_use]
    pub fn with_opt<V: ToString>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push<V: ToString>(&mut self, name: impl Into<String>, value: Option<V>) {
        self.entries
            .push((name.into(), value.map(|v| v.to_string())));
    }

    /// Present parameters in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
    }

    /// Present parameters as owned pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.present()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// Parse the configured base URL.
pub fn parse_base_url(base: &str) -> Result<Url, TransportFailure> {
    let url = Url::parse(base).map_err(|err| {
        TransportFailure::new(TransportCause::Config, format!("invalid base URL '{base}': {err}"))
    })?;
    if url.cannot_be_a_base() {
        return Err(TransportFailure::new(
            TransportCause::Config,
            format!("base URL '{base}' cannot hold endpoint paths"),
        ));
    }
    Ok(url)
}

/// Join `path` under `base`, append `segments` percent-encoded, then the
/// present query parameters.
pub fn build_url(
    base: &Url,
    path: &str,
    segments: &[String],
    query: &Params,
) -> Result<Url, TransportFailure> {
    let mut url = base.join(path.trim_start_matches('/')).map_err(|err| {
        TransportFailure::new(TransportCause::Request, format!("invalid path '{path}': {err}"))
    })?;

    if !segments.is_empty() {
        url.path_segments_mut()
            .map_err(|()| {
                TransportFailure::new(
                    TransportCause::Request,
                    format!("path '{path}' cannot take extra segments"),
                )
            })?
            .extend(segments);
    }

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in query.present() {
            pairs.append_pair(name, value);
        }
    }

    Ok(url)
}
