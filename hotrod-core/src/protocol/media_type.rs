//! Media-type descriptors selecting key/value serialization formats.

use crate::error::{HotRodError, Result};
use crate::io::{ByteSink, ByteSource};
use crate::protocol::wire;

/// Describes how a key or value is serialized.
///
/// The wire form starts with a one-byte discriminant (the "info type"),
/// written even for [`MediaType::Unspecified`]. Headers only carry media
/// types from protocol version 3.0 on; for older versions the descriptors
/// are omitted entirely and this codec must not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    /// No media type information.
    Unspecified,
    /// One of the predefined encodings, referenced by id.
    Predefined(u32),
    /// A custom media-type name with optional parameters.
    Custom {
        /// The media-type name, e.g. `application/json`.
        name: Vec<u8>,
        /// Parameter key/value pairs.
        params: Vec<(Vec<u8>, Vec<u8>)>,
    },
}

impl MediaType {
    /// Returns the wire discriminant for this variant.
    pub fn info_type(&self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Predefined(_) => 1,
            Self::Custom { .. } => 2,
        }
    }

    /// Writes the descriptor, discriminant first.
    pub fn write_to<S: ByteSink>(&self, sink: &mut S) -> Result<()> {
        wire::write_u8(sink, self.info_type())?;
        match self {
            Self::Unspecified => {}
            Self::Predefined(id) => wire::write_vint(sink, *id)?,
            Self::Custom { name, params } => {
                wire::write_byte_array(sink, name)?;
                wire::write_vint(sink, params.len() as u32)?;
                for (key, value) in params {
                    wire::write_byte_array(sink, key)?;
                    wire::write_byte_array(sink, value)?;
                }
            }
        }
        Ok(())
    }

    /// Reads a descriptor, branching on the discriminant.
    pub fn read_from<S: ByteSource>(source: &mut S) -> Result<Self> {
        let info_type = wire::read_u8(source)?;
        match info_type {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Predefined(wire::read_vint(source)?)),
            2 => {
                let name = wire::read_byte_array(source)?;
                let params_num = wire::read_vint(source)?;
                let mut params = Vec::with_capacity(params_num as usize);
                for _ in 0..params_num {
                    let key = wire::read_byte_array(source)?;
                    let value = wire::read_byte_array(source)?;
                    params.push((key, value));
                }
                Ok(Self::Custom { name, params })
            }
            other => Err(HotRodError::Protocol(format!(
                "impossible media type discriminant {other}"
            ))),
        }
    }
}

impl Default for MediaType {
    fn default() -> Self {
        Self::Unspecified
    }
}
