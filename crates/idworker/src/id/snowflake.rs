use core::{fmt, str::FromStr};

use crate::{Epoch, Error, NodeId, Result};

/// A 63-bit Snowflake ID.
///
/// - 1 bit reserved (always zero, so the value is positive as an `i64`)
/// - 41 bits timestamp (ms since the worker's [`Epoch`])
/// - 5 bits datacenter ID
/// - 5 bits machine ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21              17 16             12 11             0
///              +--------------+----------------+------------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter ID (5)| machine ID (5)  | sequence (12) |
///              +--------------+----------------+------------------+-----------------+---------------+
///              |<----------------------- MSB ----------- 64 bits ----------- LSB ---------------------->|
/// ```
///
/// Ordering follows the raw integer, so IDs from one worker sort by creation
/// time.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u64 = 41;

    /// Width of the datacenter ID field.
    pub const DATACENTER_ID_BITS: u64 = 5;

    /// Width of the machine ID field.
    pub const MACHINE_ID_BITS: u64 = 5;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u64 = 12;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 5-bit datacenter ID field. Occupies bits 17
    /// through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << Self::DATACENTER_ID_BITS) - 1;

    /// Bitmask for extracting the 5-bit machine ID field. Occupies bits 12
    /// through 16.
    pub const MACHINE_ID_MASK: u64 = (1 << Self::MACHINE_ID_BITS) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Number of bits to shift the machine ID to its correct position (bit 12).
    pub const MACHINE_ID_SHIFT: u64 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;

    /// Number of bits to shift the datacenter ID to its correct position (bit
    /// 17).
    pub const DATACENTER_ID_SHIFT: u64 = Self::MACHINE_ID_SHIFT + Self::MACHINE_ID_BITS;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = Self::DATACENTER_ID_SHIFT + Self::DATACENTER_ID_BITS;

    /// Largest relative timestamp representable, roughly 69.7 years of
    /// milliseconds.
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Largest datacenter ID (31).
    pub const MAX_DATACENTER_ID: u64 = Self::DATACENTER_ID_MASK;

    /// Largest machine ID (31).
    pub const MAX_MACHINE_ID: u64 = Self::MACHINE_ID_MASK;

    /// Largest sequence value within one millisecond (4095).
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Packs the four fields into an ID.
    ///
    /// Each component is masked to its field width, so out-of-range values are
    /// truncated rather than bleeding into neighbouring fields. Callers that
    /// care about range violations validate before packing, as
    /// [`IdWorker`](crate::IdWorker) does.
    pub const fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        machine_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id = (datacenter_id & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter_id | machine_id | sequence,
        }
    }

    pub(crate) const fn assemble(timestamp: u64, node_id: NodeId, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::MAX_TIMESTAMP, "timestamp overflow");
        debug_assert!(sequence <= Self::MAX_SEQUENCE, "sequence overflow");
        Self::from_components(
            timestamp,
            node_id.datacenter_id() as u64,
            node_id.machine_id() as u64,
            sequence,
        )
    }

    /// Interprets a raw integer as an ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if the reserved top bit is set.
    ///
    /// # Example
    ///
    /// ```
    /// use idworker::SnowflakeId;
    ///
    /// let id = SnowflakeId::try_from_raw(0x0000_0000_0042_1001)?;
    /// assert_eq!(id.sequence(), 1);
    /// assert!(SnowflakeId::try_from_raw(u64::MAX).is_err());
    /// # Ok::<(), idworker::Error>(())
    /// ```
    pub const fn try_from_raw(raw: u64) -> Result<Self> {
        if raw >> 63 != 0 {
            return Err(Error::InvalidId {
                reason: "reserved sign bit is set",
            });
        }
        Ok(Self { id: raw })
    }

    /// Returns the packed integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp (ms since the worker's epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID from the packed ID.
    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    /// Extracts the machine ID from the packed ID.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the node that issued this ID.
    pub const fn node_id(&self) -> NodeId {
        NodeId::from_masked(self.datacenter_id() as u8, self.machine_id() as u8)
    }

    /// Converts the relative timestamp back to milliseconds since the Unix
    /// epoch, given the epoch the issuing worker was configured with.
    pub const fn to_unix_millis(&self, epoch: Epoch) -> u64 {
        epoch.as_millis() + self.timestamp()
    }

    /// Returns the ID as a zero-padded 19-digit string, so that string order
    /// matches numeric order.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("machine_id", &self.machine_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim().parse::<u64>().map_err(|_| Error::InvalidId {
            reason: "not a decimal integer",
        })?;
        Self::try_from_raw(raw)
    }
}

impl TryFrom<u64> for SnowflakeId {
    type Error = Error;

    fn try_from(raw: u64) -> Result<Self> {
        Self::try_from_raw(raw)
    }
}

impl TryFrom<i64> for SnowflakeId {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        let raw = u64::try_from(raw).map_err(|_| Error::InvalidId {
            reason: "negative value",
        })?;
        Self::try_from_raw(raw)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.id
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        // Bit 63 is never set, so the value is always non-negative.
        id.id as i64
    }
}
