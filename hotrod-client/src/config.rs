//! Client configuration types and builders.

use hotrod_core::protocol::constants::{PROTOCOL_VERSION_28, PROTOCOL_VERSION_30};
use hotrod_core::{ClientIntelligence, HotRodError, MediaType, Result};

/// Default protocol version.
const DEFAULT_PROTOCOL_VERSION: u8 = PROTOCOL_VERSION_30;
/// Default client intelligence level.
const DEFAULT_INTELLIGENCE: ClientIntelligence = ClientIntelligence::HashDistributionAware;

/// Configuration for a Hot Rod client session.
///
/// Use [`ClientConfig::builder`] to create one with the builder pattern.
///
/// # Example
///
/// ```
/// use hotrod_client::ClientConfig;
/// use hotrod_core::ClientIntelligence;
///
/// let config = ClientConfig::builder()
///     .cache_name("accounts")
///     .intelligence(ClientIntelligence::HashDistributionAware)
///     .build()
///     .unwrap();
/// assert_eq!(config.cache_name(), b"accounts");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    cache_name: Vec<u8>,
    protocol_version: u8,
    intelligence: ClientIntelligence,
    flags: u32,
    key_media_type: MediaType,
    value_media_type: MediaType,
}

impl ClientConfig {
    /// Creates a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the target cache name; empty selects the server default cache.
    pub fn cache_name(&self) -> &[u8] {
        &self.cache_name
    }

    /// Returns the protocol version byte.
    pub fn protocol_version(&self) -> u8 {
        self.protocol_version
    }

    /// Returns the declared client intelligence level.
    pub fn intelligence(&self) -> ClientIntelligence {
        self.intelligence
    }

    /// Returns the operation flags sent with every request.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Returns the key media type advertised in 3.0 headers.
    pub fn key_media_type(&self) -> &MediaType {
        &self.key_media_type
    }

    /// Returns the value media type advertised in 3.0 headers.
    pub fn value_media_type(&self) -> &MediaType {
        &self.value_media_type
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cache_name: Vec::new(),
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            intelligence: DEFAULT_INTELLIGENCE,
            flags: 0,
            key_media_type: MediaType::Unspecified,
            value_media_type: MediaType::Unspecified,
        }
    }
}

/// Builder for [`ClientConfig`] instances.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    cache_name: Vec<u8>,
    protocol_version: Option<u8>,
    intelligence: Option<ClientIntelligence>,
    flags: u32,
    key_media_type: Option<MediaType>,
    value_media_type: Option<MediaType>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    fn new() -> Self {
        Self::default()
    }

    /// Sets the target cache name.
    ///
    /// An empty name (the default) selects the server default cache.
    pub fn cache_name(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.cache_name = name.into();
        self
    }

    /// Sets the protocol version (28 or 30).
    pub fn protocol_version(mut self, version: u8) -> Self {
        self.protocol_version = Some(version);
        self
    }

    /// Sets the client intelligence level.
    pub fn intelligence(mut self, intelligence: ClientIntelligence) -> Self {
        self.intelligence = Some(intelligence);
        self
    }

    /// Sets the operation flags sent with every request.
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the key media type (only transmitted on protocol 3.0).
    pub fn key_media_type(mut self, media_type: MediaType) -> Self {
        self.key_media_type = Some(media_type);
        self
    }

    /// Sets the value media type (only transmitted on protocol 3.0).
    pub fn value_media_type(mut self, media_type: MediaType) -> Self {
        self.value_media_type = Some(media_type);
        self
    }

    /// Builds the configuration.
    ///
    /// Returns a configuration error for protocol versions this client does
    /// not speak.
    pub fn build(self) -> Result<ClientConfig> {
        let protocol_version = self.protocol_version.unwrap_or(DEFAULT_PROTOCOL_VERSION);
        if protocol_version != PROTOCOL_VERSION_28 && protocol_version != PROTOCOL_VERSION_30 {
            return Err(HotRodError::Configuration(format!(
                "unsupported protocol version {protocol_version}, expected 28 or 30"
            )));
        }

        Ok(ClientConfig {
            cache_name: self.cache_name,
            protocol_version,
            intelligence: self.intelligence.unwrap_or(DEFAULT_INTELLIGENCE),
            flags: self.flags,
            key_media_type: self.key_media_type.unwrap_or_default(),
            value_media_type: self.value_media_type.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.cache_name().is_empty());
        assert_eq!(config.protocol_version(), PROTOCOL_VERSION_30);
        assert_eq!(
            config.intelligence(),
            ClientIntelligence::HashDistributionAware
        );
        assert_eq!(config.flags(), 0);
    }

    #[test]
    fn test_builder_sets_all_fields() {
        let config = ClientConfig::builder()
            .cache_name("accounts")
            .protocol_version(PROTOCOL_VERSION_28)
            .intelligence(ClientIntelligence::Basic)
            .flags(0x02)
            .key_media_type(MediaType::Predefined(3))
            .value_media_type(MediaType::Predefined(4))
            .build()
            .unwrap();

        assert_eq!(config.cache_name(), b"accounts");
        assert_eq!(config.protocol_version(), PROTOCOL_VERSION_28);
        assert_eq!(config.intelligence(), ClientIntelligence::Basic);
        assert_eq!(config.flags(), 0x02);
        assert_eq!(config.key_media_type(), &MediaType::Predefined(3));
        assert_eq!(config.value_media_type(), &MediaType::Predefined(4));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let err = ClientConfig::builder()
            .protocol_version(25)
            .build()
            .unwrap_err();
        assert!(matches!(err, HotRodError::Configuration(_)));
    }

    #[test]
    fn test_binary_cache_name() {
        let config = ClientConfig::builder()
            .cache_name(vec![0x01u8, 0x02])
            .build()
            .unwrap();
        assert_eq!(config.cache_name(), &[0x01, 0x02]);
    }
}
