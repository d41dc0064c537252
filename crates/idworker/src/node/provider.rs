use crate::{NodeId, RandSource, Result, SnowflakeId};

/// Supplies the [`NodeId`] a worker is constructed with.
///
/// Provisioning node IDs across a fleet is outside this crate. Implement this
/// trait to plug in whatever registry or configuration hands them out; a plain
/// [`NodeId`] is itself a provider.
pub trait NodeIdProvider {
    /// Resolves the node ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved ID is out of range.
    fn node_id(&self) -> Result<NodeId>;
}

impl NodeIdProvider for NodeId {
    fn node_id(&self) -> Result<NodeId> {
        Ok(*self)
    }
}

impl<P: NodeIdProvider + ?Sized> NodeIdProvider for &P {
    fn node_id(&self) -> Result<NodeId> {
        (**self).node_id()
    }
}

/// A provider that uses explicit values where given and draws the missing
/// halves from a [`RandSource`].
///
/// Random assignment gives no uniqueness guarantee between workers. Use it for
/// development or single-node deployments; fleets need explicit IDs.
///
/// # Example
///
/// ```
/// use idworker::{FallbackNodeId, NodeIdProvider, RandSource};
///
/// struct Fixed(u64);
/// impl RandSource for Fixed {
///     fn rand(&self) -> u64 {
///         self.0
///     }
/// }
///
/// let provider = FallbackNodeId::new(Some(3), None, Fixed(0b1_00111));
/// let node = provider.node_id()?;
/// assert_eq!(node.datacenter_id(), 3);
/// assert_eq!(node.machine_id(), 7);
/// # Ok::<(), idworker::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct FallbackNodeId<R> {
    datacenter_id: Option<u8>,
    machine_id: Option<u8>,
    rng: R,
}

impl<R: RandSource> FallbackNodeId<R> {
    /// Uses the given halves as-is and fills each `None` from `rng`.
    pub fn new(datacenter_id: Option<u8>, machine_id: Option<u8>, rng: R) -> Self {
        Self {
            datacenter_id,
            machine_id,
            rng,
        }
    }

    fn draw(&self, mask: u64) -> u8 {
        (self.rng.rand() & mask) as u8
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "rand")))]
#[cfg(feature = "rand")]
impl FallbackNodeId<crate::ThreadRandom> {
    /// Fills missing halves from the thread-local RNG.
    pub fn thread_random(datacenter_id: Option<u8>, machine_id: Option<u8>) -> Self {
        Self::new(datacenter_id, machine_id, crate::ThreadRandom)
    }
}

impl<R: RandSource> NodeIdProvider for FallbackNodeId<R> {
    fn node_id(&self) -> Result<NodeId> {
        let datacenter_id = self
            .datacenter_id
            .unwrap_or_else(|| self.draw(SnowflakeId::DATACENTER_ID_MASK));
        let machine_id = self
            .machine_id
            .unwrap_or_else(|| self.draw(SnowflakeId::MACHINE_ID_MASK));
        NodeId::new(datacenter_id, machine_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use core::cell::Cell;

    struct CountingRand {
        next: Cell<u64>,
    }

    impl RandSource for CountingRand {
        fn rand(&self) -> u64 {
            let value = self.next.get();
            self.next.set(value.wrapping_add(1));
            value
        }
    }

    #[test]
    fn explicit_values_win() {
        let rng = CountingRand {
            next: Cell::new(0),
        };
        let provider = FallbackNodeId::new(Some(10), Some(1), rng);
        assert_eq!(provider.node_id(), NodeId::new(10, 1));
        assert_eq!(provider.rng.next.get(), 0);
    }

    #[test]
    fn missing_values_are_drawn_in_range() {
        let rng = CountingRand {
            next: Cell::new(u64::MAX - 1),
        };
        let provider = FallbackNodeId::new(None, None, rng);
        let node = provider.node_id().unwrap();
        assert_eq!(node.datacenter_id(), 30);
        assert_eq!(node.machine_id(), 31);
    }

    #[test]
    fn explicit_out_of_range_still_fails() {
        let rng = CountingRand {
            next: Cell::new(0),
        };
        let provider = FallbackNodeId::new(Some(99), None, rng);
        assert!(matches!(
            provider.node_id(),
            Err(Error::InvalidNodeId { value: 99, .. })
        ));
    }

    #[cfg(feature = "rand")]
    #[test]
    fn thread_random_stays_in_range() {
        for _ in 0..1_000 {
            let node = FallbackNodeId::thread_random(None, Some(4))
                .node_id()
                .unwrap();
            assert!(node.datacenter_id() <= NodeId::MAX_DATACENTER_ID);
            assert_eq!(node.machine_id(), 4);
        }
    }
}
