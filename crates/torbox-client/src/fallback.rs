//! Ordered fallback shapes for payloads whose schema drifted.
//!
//! A caller declares the shape it wants (the payload type) and, optionally,
//! a chain of alternate shapes with pure transforms back to that type. The
//! resolver tries the chain in order and the first candidate that parses
//! wins; later candidates are never attempted.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeFailure;

type Attempt<T> = Box<dyn Fn(&Value) -> Result<T, serde_json::Error> + Send + Sync>;

/// One alternate shape plus the transform that normalizes it.
pub struct FallbackCandidate<T> {
    shape: String,
    attempt: Attempt<T>,
}

impl<T: 'static> FallbackCandidate<T> {
    /// Candidate that parses as `A` and converts with `transform`.
    pub fn new<A, F>(shape: impl Into<String>, transform: F) -> Self
    where
        A: DeserializeOwned + 'static,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self {
            shape: shape.into(),
            attempt: Box::new(move |value| A::deserialize(value).map(&transform)),
        }
    }

    /// Same as [`new`](Self::new), labelled with the type name of `A`.
    pub fn of<A, F>(transform: F) -> Self
    where
        A: DeserializeOwned + 'static,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self::new(shape_name::<A>(), transform)
    }
}

impl<T> FallbackCandidate<T> {
    #[must_use]
    pub fn shape(&self) -> &str {
        &self.shape
    }
}

impl<T> fmt::Debug for FallbackCandidate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackCandidate")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Candidates in the order they are tried.
pub struct FallbackChain<T> {
    candidates: Vec<FallbackCandidate<T>>,
}

impl<T> FallbackChain<T> {
    /// A chain with no candidates: a mismatch is final.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Append a candidate after the ones already declared.
    #[must_use]
    pub fn or(mut self, candidate: FallbackCandidate<T>) -> Self {
        self.candidates.push(candidate);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(FallbackCandidate::shape)
    }
}

impl<T> Default for FallbackChain<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> fmt::Debug for FallbackChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.shapes()).finish()
    }
}

/// Try each candidate against `value`; the first one that parses wins.
pub fn resolve<T>(value: &Value, chain: &FallbackChain<T>) -> Result<T, DecodeFailure> {
    let mut attempted = Vec::with_capacity(chain.len());
    let mut last_error = None;

    for candidate in &chain.candidates {
        attempted.push(candidate.shape.clone());
        match (candidate.attempt)(value) {
            Ok(payload) => {
                tracing::debug!(shape = %candidate.shape, "fallback shape accepted");
                return Ok(payload);
            }
            Err(err) => last_error = Some(err),
        }
    }

    let message = last_error.map_or_else(
        || "no fallback shapes declared".to_string(),
        |err| format!("no fallback shape matched: {err}"),
    );
    Err(DecodeFailure::shape_mismatch(attempted, message))
}

/// Type name without module paths, e.g. `Vec<Option<AvailableTorrent>>`.
pub(crate) fn shape_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}
