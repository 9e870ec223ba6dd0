//! Service configuration.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use clientele_core::error::{DocumentStoreError, DocumentStoreResult};

/// UTC+8, the offset the customer timestamps have always been written in.
pub const DEFAULT_UTC_OFFSET_SECONDS: i32 = 8 * 3600;

/// Configuration for a [`CustomerService`](crate::service::CustomerService).
///
/// # Example
///
/// ```ignore
/// use clientele::config::CustomerServiceConfig;
///
/// let config = CustomerServiceConfig::builder()
///     .with_utc_offset_hours(0)
///     .build();
///
/// let config = CustomerServiceConfig::from_json(r#"{ "utcOffsetSeconds": 3600 }"#)?;
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerServiceConfig {
    /// Offset east of UTC, in seconds, that timestamps are computed in.
    pub utc_offset_seconds: i32,
}

impl CustomerServiceConfig {
    pub fn builder() -> CustomerServiceConfigBuilder {
        CustomerServiceConfigBuilder::new()
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> DocumentStoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DocumentStoreError::Initialization(format!("invalid configuration: {e}")))
    }

    /// The configured offset.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Initialization`] if the offset is not
    /// strictly between -24h and +24h.
    pub fn utc_offset(&self) -> DocumentStoreResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            DocumentStoreError::Initialization(format!(
                "utc offset out of range: {} seconds",
                self.utc_offset_seconds
            ))
        })
    }
}

impl Default for CustomerServiceConfig {
    fn default() -> Self {
        Self { utc_offset_seconds: DEFAULT_UTC_OFFSET_SECONDS }
    }
}

/// Builder for [`CustomerServiceConfig`].
pub struct CustomerServiceConfigBuilder {
    utc_offset_seconds: Option<i32>,
}

impl CustomerServiceConfigBuilder {
    pub fn new() -> Self {
        Self { utc_offset_seconds: None }
    }

    pub fn with_utc_offset_hours(mut self, hours: i32) -> Self {
        self.utc_offset_seconds = Some(hours.saturating_mul(3600));
        self
    }

    pub fn with_utc_offset_seconds(mut self, seconds: i32) -> Self {
        self.utc_offset_seconds = Some(seconds);
        self
    }

    /// Builds the configuration. Unset values use their defaults (UTC+8).
    pub fn build(self) -> CustomerServiceConfig {
        CustomerServiceConfig {
            utc_offset_seconds: self.utc_offset_seconds.unwrap_or(DEFAULT_UTC_OFFSET_SECONDS),
        }
    }
}

impl Default for CustomerServiceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_utc_plus_eight() {
        let config = CustomerServiceConfig::default();

        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(CustomerServiceConfig::builder().build(), config);
    }

    #[test]
    fn builder_overrides_offset() {
        let config = CustomerServiceConfig::builder()
            .with_utc_offset_hours(-5)
            .build();

        assert_eq!(config.utc_offset_seconds, -5 * 3600);
    }

    #[test]
    fn parses_json_with_defaults() {
        assert_eq!(
            CustomerServiceConfig::from_json(r#"{ "utcOffsetSeconds": 3600 }"#).unwrap(),
            CustomerServiceConfig { utc_offset_seconds: 3600 }
        );
        assert_eq!(
            CustomerServiceConfig::from_json("{}").unwrap(),
            CustomerServiceConfig::default()
        );
        assert!(CustomerServiceConfig::from_json("not json").is_err());
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let config = CustomerServiceConfig::builder()
            .with_utc_offset_hours(24)
            .build();

        assert!(matches!(
            config.utc_offset(),
            Err(DocumentStoreError::Initialization(_))
        ));
    }
}
