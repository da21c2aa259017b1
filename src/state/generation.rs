/// Generation counter for asynchronous work
///
/// Every request captures the epoch current at issue time. When the
/// result comes back it is committed only if the counter has not moved
/// on in the meantime; late results are dropped instead of cancelled.

/// Opaque marker of one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Epoch(u64);

/// Monotonically increasing counter owned by a single controller
#[derive(Debug, Default)]
pub struct Generation {
    current: Epoch,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, invalidating every epoch handed out before
    pub fn advance(&mut self) -> Epoch {
        self.current = Epoch(self.current.0 + 1);
        self.current
    }

    pub fn current(&self) -> Epoch {
        self.current
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.current == epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_invalidates_previous_epoch() {
        let mut generation = Generation::new();
        let first = generation.advance();
        assert!(generation.is_current(first));

        let second = generation.advance();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_initial_epoch_is_current() {
        let generation = Generation::new();
        assert!(generation.is_current(Epoch::default()));
        assert_eq!(generation.current(), Epoch::default());
    }
}
