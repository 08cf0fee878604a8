//! The Riemann event and its metric value.
//!
//! An [`Event`] is a plain value: building one performs no I/O.  Callers
//! either fill the public fields directly or chain the setter methods:
//!
//! ```rust
//! use riemann_core::{Event, Metric};
//!
//! let event = Event::new()
//!     .service("cpu")
//!     .state("ok")
//!     .metric(Metric::Double(0.5))
//!     .tags(["a", "b"]);
//!
//! assert_eq!(event.service.as_deref(), Some("cpu"));
//! assert_eq!(event.tags, vec!["a".to_string(), "b".to_string()]);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

// ── Metric ────────────────────────────────────────────────────────────────────

/// A numeric metric carried by an event.
///
/// The wire format has three distinct optional metric fields and the server's
/// query predicates are type-sensitive, so the caller picks the
/// representation explicitly instead of the codec guessing from the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    /// Signed 64-bit integer, encoded in `metric_sint64`.
    Int(i64),
    /// 64-bit IEEE double, encoded in `metric_d`.
    Double(f64),
    /// 32-bit IEEE float, encoded in `metric_f`.
    Float(f32),
}

impl From<i64> for Metric {
    fn from(value: i64) -> Self {
        Metric::Int(value)
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Metric::Double(value)
    }
}

impl From<f32> for Metric {
    fn from(value: f32) -> Self {
        Metric::Float(value)
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// One monitoring observation.
///
/// Every field is optional.  Unset fields are omitted from the encoding and
/// the server treats them as "not applicable", so `Event::default()` is a
/// valid event to send.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Event {
    /// Seconds since the Unix epoch.  The server stamps its own time when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    /// Short status string such as `"ok"` or `"critical"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// The thing being measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// The origin of the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered tags; duplicates are kept.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Seconds the event stays valid in the server index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<f32>,
    /// Custom key/value fields.  Ordered by key so encoding is deterministic.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// The measured value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,
}

impl Event {
    /// Creates an event with no fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the event time (seconds since the Unix epoch).
    pub fn time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    /// Sets the state string.
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the service name.
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Sets the originating host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a single tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Appends several tags, keeping their order.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Sets the time-to-live in seconds.
    pub fn ttl(mut self, ttl: f32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sets the metric.  Accepts a [`Metric`] or a bare `i64` / `f64` / `f32`.
    pub fn metric(mut self, metric: impl Into<Metric>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Inserts a custom attribute, replacing any previous value for `key`.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_has_no_fields_set() {
        // Arrange / Act
        let event = Event::new();

        // Assert
        assert_eq!(event, Event::default());
        assert!(event.time.is_none());
        assert!(event.metric.is_none());
        assert!(event.tags.is_empty());
        assert!(event.attributes.is_empty());
    }

    #[test]
    fn test_setters_populate_fields() {
        // Arrange / Act
        let event = Event::new()
            .time(1_700_000_000)
            .state("critical")
            .service("disk /")
            .host("web-1")
            .description("98% full")
            .ttl(60.0)
            .metric(Metric::Double(0.98));

        // Assert
        assert_eq!(event.time, Some(1_700_000_000));
        assert_eq!(event.state.as_deref(), Some("critical"));
        assert_eq!(event.service.as_deref(), Some("disk /"));
        assert_eq!(event.host.as_deref(), Some("web-1"));
        assert_eq!(event.description.as_deref(), Some("98% full"));
        assert_eq!(event.ttl, Some(60.0));
        assert_eq!(event.metric, Some(Metric::Double(0.98)));
    }

    #[test]
    fn test_tags_preserve_order_and_duplicates() {
        let event = Event::new().tag("b").tags(["a", "b"]).tag("c");
        assert_eq!(event.tags, vec!["b", "a", "b", "c"]);
    }

    #[test]
    fn test_attribute_overwrites_same_key() {
        let event = Event::new().attribute("env", "staging").attribute("env", "prod");
        assert_eq!(event.attributes.len(), 1);
        assert_eq!(event.attributes.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_metric_from_integer_is_int_variant() {
        // An i64 must never silently become a double.
        let event = Event::new().metric(42_i64);
        assert_eq!(event.metric, Some(Metric::Int(42)));
    }

    #[test]
    fn test_metric_from_f64_is_double_variant() {
        let event = Event::new().metric(42.0_f64);
        assert_eq!(event.metric, Some(Metric::Double(42.0)));
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        // Arrange
        let event = Event::new().service("cpu").metric(Metric::Int(7));

        // Act
        let json = serde_json::to_string(&event).unwrap();

        // Assert
        assert_eq!(json, r#"{"service":"cpu","metric":7}"#);
    }
}
