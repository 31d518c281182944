//! Protocol constants for the Hot Rod binary protocol.

use std::fmt;

/// Magic byte opening every request header.
pub const REQUEST_MAGIC: u8 = 0xA0;

/// Magic byte opening every response header.
pub const RESPONSE_MAGIC: u8 = 0xA1;

/// Protocol version byte for Hot Rod 2.8.
pub const PROTOCOL_VERSION_28: u8 = 28;

/// Protocol version byte for Hot Rod 3.0.
///
/// Starting with this version, request headers carry key and value media
/// type descriptors.
pub const PROTOCOL_VERSION_30: u8 = 30;

/// Hash function identifier for the MurmurHash3-based consistent hash.
pub const MURMUR3_HASH_FUNCTION: u8 = 0x03;

/// Response opcode reserved for server error responses.
///
/// A response carrying this opcode is a server error regardless of its
/// status byte.
pub const ERROR_RESPONSE: u8 = 0x50;

/// Event opcode: cache entry created.
pub const CACHE_ENTRY_CREATED_EVENT: u8 = 0x60;
/// Event opcode: cache entry modified.
pub const CACHE_ENTRY_MODIFIED_EVENT: u8 = 0x61;
/// Event opcode: cache entry removed.
pub const CACHE_ENTRY_REMOVED_EVENT: u8 = 0x62;
/// Event opcode: cache entry expired.
pub const CACHE_ENTRY_EXPIRED_EVENT: u8 = 0x63;
/// Event opcode: counter state change.
pub const COUNTER_EVENT: u8 = 0x66;

/// Hot Rod operations, identified by their request opcode.
///
/// Request and response opcodes come in pairs; [`OpCode::response_code`]
/// returns the response twin. The pairing is `request + 1` everywhere except
/// `CounterIsDefined`, whose response skips over the reserved
/// [`ERROR_RESPONSE`] opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Store a value under a key.
    Put = 0x01,
    /// Fetch the value stored under a key.
    Get = 0x03,
    /// Store a value only if the key is absent.
    PutIfAbsent = 0x05,
    /// Replace the value of an existing key.
    Replace = 0x07,
    /// Replace only if the entry version matches.
    ReplaceIfUnmodified = 0x09,
    /// Remove a key.
    Remove = 0x0B,
    /// Remove only if the entry version matches.
    RemoveIfUnmodified = 0x0D,
    /// Test whether a key exists.
    ContainsKey = 0x0F,
    /// Fetch a value together with its entry version.
    GetWithVersion = 0x11,
    /// Remove every entry in the cache.
    Clear = 0x13,
    /// Fetch server statistics.
    Stats = 0x15,
    /// Probe the server; bootstraps the initial topology.
    Ping = 0x17,
    /// Fetch multiple entries.
    BulkGet = 0x19,
    /// Fetch a value together with its metadata.
    GetWithMetadata = 0x1B,
    /// Fetch multiple keys.
    BulkGetKeys = 0x1D,
    /// Run a query.
    Query = 0x1F,
    /// List the SASL mechanisms the server accepts.
    AuthMechList = 0x21,
    /// Perform a SASL authentication step.
    Auth = 0x23,
    /// Register a remote event listener.
    AddClientListener = 0x25,
    /// Unregister a remote event listener.
    RemoveClientListener = 0x27,
    /// Count the entries in the cache.
    Size = 0x29,
    /// Execute a server-side script.
    Exec = 0x2B,
    /// Store multiple entries.
    PutAll = 0x2D,
    /// Fetch multiple entries by key set.
    GetAll = 0x2F,
    /// Open a server-side iterator.
    IterationStart = 0x31,
    /// Advance a server-side iterator.
    IterationNext = 0x33,
    /// Close a server-side iterator.
    IterationEnd = 0x35,
    /// Stream a large value from the server.
    GetStream = 0x37,
    /// Stream a large value to the server.
    PutStream = 0x39,
    /// Prepare a transaction.
    Prepare = 0x3B,
    /// Commit a prepared transaction.
    Commit = 0x3D,
    /// Roll back a prepared transaction.
    Rollback = 0x3F,
    /// Create a counter.
    CounterCreate = 0x4B,
    /// Fetch a counter's configuration.
    CounterGetConfiguration = 0x4D,
    /// Test whether a counter exists.
    CounterIsDefined = 0x4F,
    /// Atomically add to a counter and return the new value.
    CounterAddAndGet = 0x52,
    /// Reset a counter to its initial value.
    CounterReset = 0x54,
    /// Fetch a counter's value.
    CounterGet = 0x56,
    /// Compare-and-swap a counter's value.
    CounterCas = 0x58,
    /// Register a counter listener.
    CounterAddListener = 0x5A,
    /// Unregister a counter listener.
    CounterRemoveListener = 0x5C,
    /// Remove a counter.
    CounterRemove = 0x5E,
    /// List the defined counters.
    CounterGetNames = 0x64,
}

impl OpCode {
    /// Returns the request opcode byte.
    pub fn request_code(self) -> u8 {
        self as u8
    }

    /// Returns the response opcode byte paired with this operation.
    pub fn response_code(self) -> u8 {
        match self {
            // 0x50 is reserved for ERROR_RESPONSE
            Self::CounterIsDefined => 0x51,
            _ => self as u8 + 1,
        }
    }

    /// Creates an `OpCode` from a request opcode byte.
    pub fn from_request_code(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Put),
            0x03 => Some(Self::Get),
            0x05 => Some(Self::PutIfAbsent),
            0x07 => Some(Self::Replace),
            0x09 => Some(Self::ReplaceIfUnmodified),
            0x0B => Some(Self::Remove),
            0x0D => Some(Self::RemoveIfUnmodified),
            0x0F => Some(Self::ContainsKey),
            0x11 => Some(Self::GetWithVersion),
            0x13 => Some(Self::Clear),
            0x15 => Some(Self::Stats),
            0x17 => Some(Self::Ping),
            0x19 => Some(Self::BulkGet),
            0x1B => Some(Self::GetWithMetadata),
            0x1D => Some(Self::BulkGetKeys),
            0x1F => Some(Self::Query),
            0x21 => Some(Self::AuthMechList),
            0x23 => Some(Self::Auth),
            0x25 => Some(Self::AddClientListener),
            0x27 => Some(Self::RemoveClientListener),
            0x29 => Some(Self::Size),
            0x2B => Some(Self::Exec),
            0x2D => Some(Self::PutAll),
            0x2F => Some(Self::GetAll),
            0x31 => Some(Self::IterationStart),
            0x33 => Some(Self::IterationNext),
            0x35 => Some(Self::IterationEnd),
            0x37 => Some(Self::GetStream),
            0x39 => Some(Self::PutStream),
            0x3B => Some(Self::Prepare),
            0x3D => Some(Self::Commit),
            0x3F => Some(Self::Rollback),
            0x4B => Some(Self::CounterCreate),
            0x4D => Some(Self::CounterGetConfiguration),
            0x4F => Some(Self::CounterIsDefined),
            0x52 => Some(Self::CounterAddAndGet),
            0x54 => Some(Self::CounterReset),
            0x56 => Some(Self::CounterGet),
            0x58 => Some(Self::CounterCas),
            0x5A => Some(Self::CounterAddListener),
            0x5C => Some(Self::CounterRemoveListener),
            0x5E => Some(Self::CounterRemove),
            0x64 => Some(Self::CounterGetNames),
            _ => None,
        }
    }
}

/// Status byte of a Hot Rod response.
///
/// Statuses in `0x81..=0x86` carry an error-message payload and surface as
/// server errors. The remaining statuses are operation outcomes returned to
/// the caller as values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// The operation succeeded.
    Ok = 0x00,
    /// The operation was valid but not executed (e.g. conditional failed).
    NotExecuted = 0x01,
    /// The addressed key does not exist.
    KeyNotFound = 0x02,
    /// The request magic byte or message id was invalid.
    InvalidMagicOrMessageId = 0x81,
    /// The server does not know the request opcode.
    UnknownCommand = 0x82,
    /// The server does not speak the requested protocol version.
    UnknownVersion = 0x83,
    /// The server failed to parse the request.
    RequestParsingError = 0x84,
    /// A generic server-side failure.
    ServerError = 0x85,
    /// The command timed out on the server.
    CommandTimeout = 0x86,
}

impl Status {
    /// Creates a `Status` from its wire byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Ok),
            0x01 => Some(Self::NotExecuted),
            0x02 => Some(Self::KeyNotFound),
            0x81 => Some(Self::InvalidMagicOrMessageId),
            0x82 => Some(Self::UnknownCommand),
            0x83 => Some(Self::UnknownVersion),
            0x84 => Some(Self::RequestParsingError),
            0x85 => Some(Self::ServerError),
            0x86 => Some(Self::CommandTimeout),
            _ => None,
        }
    }

    /// Returns the wire byte.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` if this status carries an error-message payload.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::InvalidMagicOrMessageId
                | Self::UnknownCommand
                | Self::UnknownVersion
                | Self::RequestParsingError
                | Self::ServerError
                | Self::CommandTimeout
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::NotExecuted => write!(f, "NOT_EXECUTED"),
            Self::KeyNotFound => write!(f, "KEY_NOT_FOUND"),
            Self::InvalidMagicOrMessageId => write!(f, "INVALID_MAGIC_OR_MESSAGE_ID"),
            Self::UnknownCommand => write!(f, "UNKNOWN_COMMAND"),
            Self::UnknownVersion => write!(f, "UNKNOWN_VERSION"),
            Self::RequestParsingError => write!(f, "REQUEST_PARSING_ERROR"),
            Self::ServerError => write!(f, "SERVER_ERROR"),
            Self::CommandTimeout => write!(f, "COMMAND_TIMEOUT"),
        }
    }
}

/// How much topology information the client asks the server to piggyback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ClientIntelligence {
    /// No topology information.
    Basic = 0x01,
    /// Server list only.
    TopologyAware = 0x02,
    /// Full segment-to-owner map; enables client-side routing.
    HashDistributionAware = 0x03,
}

impl ClientIntelligence {
    /// Creates a `ClientIntelligence` from its wire byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Basic),
            0x02 => Some(Self::TopologyAware),
            0x03 => Some(Self::HashDistributionAware),
            _ => None,
        }
    }

    /// Returns the wire byte.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` if topology frames addressed to this client carry the
    /// hash/segment section.
    pub fn includes_hash_info(self) -> bool {
        matches!(self, Self::HashDistributionAware)
    }
}

/// Time unit nibble used by expiration descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimeUnit {
    /// Seconds.
    Seconds = 0x00,
    /// Milliseconds.
    Milliseconds = 0x01,
    /// Nanoseconds.
    Nanoseconds = 0x02,
    /// Microseconds.
    Microseconds = 0x03,
    /// Minutes.
    Minutes = 0x04,
    /// Hours.
    Hours = 0x05,
    /// Days.
    Days = 0x06,
    /// The server-configured default.
    Default = 0x07,
    /// Never expires.
    Infinitum = 0x08,
}

impl TimeUnit {
    /// Creates a `TimeUnit` from its nibble value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Seconds),
            0x01 => Some(Self::Milliseconds),
            0x02 => Some(Self::Nanoseconds),
            0x03 => Some(Self::Microseconds),
            0x04 => Some(Self::Minutes),
            0x05 => Some(Self::Hours),
            0x06 => Some(Self::Days),
            0x07 => Some(Self::Default),
            0x08 => Some(Self::Infinitum),
            _ => None,
        }
    }

    /// Returns the nibble value.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` if a duration value follows this unit on the wire.
    ///
    /// `Default` and `Infinitum` are fully described by the nibble alone.
    pub fn carries_value(self) -> bool {
        !matches!(self, Self::Default | Self::Infinitum)
    }
}
