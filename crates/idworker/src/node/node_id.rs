use core::fmt;

use crate::{Error, NodeField, Result, SnowflakeId};

/// The `(datacenter id, machine id)` pair embedded in every ID a worker
/// issues.
///
/// Both halves are validated against their 5-bit fields on construction, so a
/// `NodeId` can never spill into the timestamp bits.
///
/// # Example
///
/// ```
/// use idworker::{Error, NodeId};
///
/// let node = NodeId::new(10, 1)?;
/// assert_eq!(node.datacenter_id(), 10);
///
/// assert!(matches!(NodeId::new(32, 0), Err(Error::InvalidNodeId { .. })));
/// # Ok::<(), idworker::Error>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    datacenter_id: u8,
    machine_id: u8,
}

impl NodeId {
    /// Largest datacenter ID (31).
    pub const MAX_DATACENTER_ID: u8 = SnowflakeId::MAX_DATACENTER_ID as u8;

    /// Largest machine ID (31).
    pub const MAX_MACHINE_ID: u8 = SnowflakeId::MAX_MACHINE_ID as u8;

    /// Creates a node ID, failing if either half is out of range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeId`] if `datacenter_id` or `machine_id`
    /// exceeds 31.
    pub const fn new(datacenter_id: u8, machine_id: u8) -> Result<Self> {
        if datacenter_id > Self::MAX_DATACENTER_ID {
            return Err(Error::InvalidNodeId {
                field: NodeField::DatacenterId,
                value: datacenter_id,
                max: Self::MAX_DATACENTER_ID,
            });
        }
        if machine_id > Self::MAX_MACHINE_ID {
            return Err(Error::InvalidNodeId {
                field: NodeField::MachineId,
                value: machine_id,
                max: Self::MAX_MACHINE_ID,
            });
        }
        Ok(Self {
            datacenter_id,
            machine_id,
        })
    }

    pub(crate) const fn from_masked(datacenter_id: u8, machine_id: u8) -> Self {
        Self {
            datacenter_id: datacenter_id & Self::MAX_DATACENTER_ID,
            machine_id: machine_id & Self::MAX_MACHINE_ID,
        }
    }

    /// The datacenter half, in `0..=31`.
    pub const fn datacenter_id(&self) -> u8 {
        self.datacenter_id
    }

    /// The machine half, in `0..=31`.
    pub const fn machine_id(&self) -> u8 {
        self.machine_id
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.datacenter_id, self.machine_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_range() {
        for dc in 0..=31 {
            for machine in 0..=31 {
                let node = NodeId::new(dc, machine).unwrap();
                assert_eq!(node.datacenter_id(), dc);
                assert_eq!(node.machine_id(), machine);
            }
        }
    }

    #[test]
    fn rejects_out_of_range_datacenter() {
        assert_eq!(
            NodeId::new(32, 0),
            Err(Error::InvalidNodeId {
                field: NodeField::DatacenterId,
                value: 32,
                max: 31,
            })
        );
    }

    #[test]
    fn rejects_out_of_range_machine() {
        assert_eq!(
            NodeId::new(0, 255),
            Err(Error::InvalidNodeId {
                field: NodeField::MachineId,
                value: 255,
                max: 31,
            })
        );
    }

    #[test]
    fn error_message_names_the_field() {
        let err = NodeId::new(0, 40).unwrap_err();
        assert_eq!(err.to_string(), "machine id 40 is out of range (max 31)");
    }
}
