//! Version 1 (time-based) UUID validation, generation and timestamp decoding.
//!
//! Only lowercase canonical v1 UUIDs are understood anywhere in suuid. A
//! well-formed UUID of any other version is treated as not-a-UUID.

use crate::error::{Result, SuuidError};
use crate::TimeProvider;
use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;
use uuid::Uuid;

/// Length of a canonical UUID string.
pub const UUID_LEN: usize = 36;

/// Length of a `YYYY-MM-DDTHH:MM:SS.NNNNNNNZ` timestamp.
pub const TIMESTAMP_LEN: usize = 28;

/// 100 ns intervals between 1582-10-15 and 1970-01-01.
pub const GREGORIAN_UNIX_OFFSET: u64 = 0x01b2_1dd2_1381_4000;

const TICKS_PER_SEC: u64 = 10_000_000;
const TICKS_MASK: u64 = 0x0fff_ffff_ffff_ffff;

/// `x` is a lowercase hex digit, anything else must match literally.
const UUID_TEMPLATE: &[u8; UUID_LEN] = b"xxxxxxxx-xxxx-1xxx-xxxx-xxxxxxxxxxxx";

/// A digit is the largest digit allowed at that position.
const TIMESTAMP_TEMPLATE: &[u8; TIMESTAMP_LEN] = b"9999-19-39T29:59:69.9999999Z";

/// Returns true if `s` starts with a canonical lowercase v1 UUID.
///
/// With `exact_length` the string must be exactly 36 characters, otherwise
/// trailing text after the UUID is allowed.
///
/// # Examples
///
/// ```
/// use suuid_core::is_valid_uuid;
///
/// assert!(is_valid_uuid("d3de2000-4695-11e6-8000-000000000000", true));
/// assert!(is_valid_uuid("d3de2000-4695-11e6-8000-000000000000 trailing", false));
/// // version 4
/// assert!(!is_valid_uuid("d3de2000-4695-41e6-8000-000000000000", false));
/// ```
pub fn is_valid_uuid(s: &str, exact_length: bool) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < UUID_LEN || (exact_length && bytes.len() != UUID_LEN) {
        return false;
    }
    bytes
        .iter()
        .zip(UUID_TEMPLATE.iter())
        .all(|(&b, &t)| match t {
            b'x' => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            t => b == t,
        })
}

/// Returns the first v1 UUID found anywhere in `s`.
pub fn find_uuid(s: &str) -> Option<&str> {
    find_uuid_index(s).map(|i| &s[i..i + UUID_LEN])
}

/// Byte offset of the first v1 UUID in `s`.
pub(crate) fn find_uuid_index(s: &str) -> Option<usize> {
    let len = s.len();
    if len < UUID_LEN {
        return None;
    }
    (0..=len - UUID_LEN)
        .filter(|&i| s.is_char_boundary(i))
        .find(|&i| is_valid_uuid(&s[i..], false))
}

/// Returns true if `s` has the shape `YYYY-MM-DDTHH:MM:SS.NNNNNNNZ`.
///
/// Each digit is checked against the range legal at its position (month
/// tens 0-1, day tens 0-3, hour tens 0-2, minute tens 0-5, second tens
/// 0-6). Calendar correctness such as February 31 is not checked.
pub fn is_valid_timestamp(s: &str, exact_length: bool) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < TIMESTAMP_LEN || (exact_length && bytes.len() != TIMESTAMP_LEN) {
        return false;
    }
    bytes
        .iter()
        .zip(TIMESTAMP_TEMPLATE.iter())
        .all(|(&b, &t)| {
            if t.is_ascii_digit() {
                (b'0'..=t).contains(&b)
            } else {
                b == t
            }
        })
}

/// Extracts the 60-bit clock value (100 ns ticks since 1582-10-15).
pub fn ticks_of(uuid: &str) -> Result<u64> {
    if !is_valid_uuid(uuid, false) {
        return Err(SuuidError::InvalidUuid(uuid.to_string()));
    }
    let field = |range: std::ops::Range<usize>| {
        u64::from_str_radix(&uuid[range], 16).map_err(|_| SuuidError::InvalidUuid(uuid.to_string()))
    };
    let low = field(0..8)?;
    let mid = field(9..13)?;
    // Skip the version nibble at offset 14.
    let high = field(15..18)?;
    Ok(high << 48 | mid << 32 | low)
}

/// Decodes the creation time embedded in a v1 UUID.
///
/// Returns an ISO-8601 string with 100 ns precision and a trailing `Z`.
///
/// # Examples
///
/// ```
/// use suuid_core::timestamp_of;
///
/// let ts = timestamp_of("d3de2000-4695-11e6-8000-000000000000").unwrap();
/// assert_eq!(ts, "2016-07-10T12:00:00.0000000Z");
/// ```
pub fn timestamp_of(uuid: &str) -> Result<String> {
    let ticks = ticks_of(uuid)?;
    let epoch = NaiveDate::from_ymd_opt(1582, 10, 15)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| SuuidError::InvalidTimestamp("UUID epoch".to_string()))?;
    let secs = (ticks / TICKS_PER_SEC) as i64;
    let frac = ticks % TICKS_PER_SEC;
    let time = epoch
        .checked_add_signed(chrono::Duration::seconds(secs))
        .ok_or_else(|| SuuidError::InvalidTimestamp(format!("{} ticks out of range", ticks)))?;
    Ok(format!("{}.{:07}Z", time.format("%Y-%m-%dT%H:%M:%S"), frac))
}

/// Encodes a v1 UUID from its clock value, clock sequence and node.
///
/// Only the low 60 bits of `ticks` and the low 14 bits of `clock_seq` are
/// used. The variant is always RFC 4122.
///
/// ```
/// use suuid_core::{uuid_from_parts, NodeId, GREGORIAN_UNIX_OFFSET};
///
/// let uuid = uuid_from_parts(GREGORIAN_UNIX_OFFSET, 0, NodeId::from_bytes([0; 6]));
/// assert_eq!(uuid, "13814000-1dd2-11b2-8000-000000000000");
/// ```
pub fn uuid_from_parts(ticks: u64, clock_seq: u16, node: NodeId) -> String {
    let ticks = ticks & TICKS_MASK;
    let time_low = (ticks & 0xffff_ffff) as u32;
    let time_mid = ((ticks >> 32) & 0xffff) as u16;
    let time_hi_and_version = ((ticks >> 48) & 0x0fff) as u16 | 0x1000;
    let seq = clock_seq & 0x3fff;
    let mut tail = [0u8; 8];
    tail[0] = (seq >> 8) as u8 | 0x80;
    tail[1] = (seq & 0xff) as u8;
    tail[2..].copy_from_slice(node.as_bytes());
    Uuid::from_fields(time_low, time_mid, time_hi_and_version, &tail)
        .hyphenated()
        .to_string()
}

/// The 48-bit node field of a v1 UUID.
///
/// Parsed from and displayed as `xx:xx:xx:xx:xx:xx`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId([u8; 6]);

impl NodeId {
    /// Creates a NodeId from raw bytes.
    pub fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Returns the raw node bytes.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Random node with the multicast bit set, so it can never collide with
    /// a real hardware address.
    pub fn random() -> Self {
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&random_bytes()[10..16]);
        bytes[0] |= 0x01;
        Self(bytes)
    }

    /// Looks up the first non-loopback, non-zero hardware address.
    pub fn from_system() -> Option<Self> {
        Self::from_sysfs(Path::new("/sys/class/net"))
    }

    fn from_sysfs(root: &Path) -> Option<Self> {
        let mut interfaces: Vec<_> = fs::read_dir(root)
            .ok()?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        interfaces.sort();

        interfaces
            .iter()
            .filter(|dir| dir.file_name().map_or(false, |n| n != "lo"))
            .filter_map(|dir| fs::read_to_string(dir.join("address")).ok())
            .filter_map(|addr| addr.trim().parse::<NodeId>().ok())
            .find(|node| node.0 != [0; 6])
    }
}

impl FromStr for NodeId {
    type Err = SuuidError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SuuidError::ConfigError(format!("invalid hardware address: {}", s));
        let mut bytes = [0u8; 6];
        let mut parts = s.split(':');
        for byte in bytes.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 {
                return Err(invalid());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self)
    }
}

/// Generates time-ordered v1 UUIDs.
///
/// The clock sequence is randomized once per generator. Within a generator
/// the clock value strictly increases, so two UUIDs generated in the same
/// 100 ns interval still differ.
pub struct UuidGenerator {
    node: NodeId,
    clock_seq: u16,
    last_ticks: u64,
    /// Time provider for testing (None = use system time).
    time_provider: Option<Arc<dyn TimeProvider>>,
}

impl UuidGenerator {
    /// Creates a generator stamping UUIDs with `node`.
    pub fn new(node: NodeId) -> Self {
        let seed = random_bytes();
        Self {
            node,
            clock_seq: u16::from_be_bytes([seed[0], seed[1]]) & 0x3fff,
            last_ticks: 0,
            time_provider: None,
        }
    }

    /// Sets a custom time provider for testing.
    pub fn with_time_provider(mut self, provider: impl TimeProvider + 'static) -> Self {
        self.time_provider = Some(Arc::new(provider));
        self
    }

    /// Overrides the randomly chosen clock sequence.
    pub fn with_clock_seq(mut self, clock_seq: u16) -> Self {
        self.clock_seq = clock_seq & 0x3fff;
        self
    }

    /// Returns the node stamped into generated UUIDs.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Produces a new canonical v1 UUID.
    pub fn generate(&mut self) -> String {
        let mut ticks = self.now_ticks();
        if ticks <= self.last_ticks {
            ticks = self.last_ticks + 1;
        }
        self.last_ticks = ticks;
        let uuid = uuid_from_parts(ticks, self.clock_seq, self.node);
        debug!(uuid = %uuid, "generated UUID");
        uuid
    }

    fn now_ticks(&self) -> u64 {
        let since_unix = match self.time_provider {
            Some(ref provider) => provider.now(),
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or(Duration::ZERO),
        };
        let ticks = (since_unix.as_nanos() / 100) as u64;
        ticks.wrapping_add(GREGORIAN_UNIX_OFFSET) & TICKS_MASK
    }
}

fn random_bytes() -> [u8; 16] {
    Uuid::new_v4().into_bytes()
}
