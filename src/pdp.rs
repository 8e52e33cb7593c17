//! Failure accounting for the packet data protocol (PDP) context.
//!
//! A context can get wedged in a state where the modem reports it as active
//! while no data gets through. Consecutive failures of network dependent
//! operations are counted; once they reach the threshold, the next request
//! tears the context down before opening it again and the threshold grows
//! geometrically so that a persistently failing network is not hammered with
//! reactivations.

pub const RETRY_THRESHOLD_INITIAL: u32 = 3;
pub const RETRY_THRESHOLD_MULTIPLIER: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdpManager {
    failures: u32,
    threshold: u32,
}

impl Default for PdpManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdpManager {
    pub const fn new() -> Self {
        Self {
            failures: 0,
            threshold: RETRY_THRESHOLD_INITIAL,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Called before opening the context. Returns `true` when the caller has
    /// to force-close the context first, in which case the threshold has been
    /// raised for the next round.
    pub fn should_reset(&mut self) -> bool {
        if self.failures < self.threshold {
            return false;
        }
        self.threshold = self
            .threshold
            .saturating_mul(1 + RETRY_THRESHOLD_MULTIPLIER);
        true
    }

    pub fn success(&mut self) {
        self.failures = 0;
        self.threshold = RETRY_THRESHOLD_INITIAL;
    }

    pub fn failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_after_threshold() {
        let mut pdp = PdpManager::new();
        for _ in 0..3 {
            assert!(!pdp.should_reset());
            pdp.failure();
        }
        assert_eq!(pdp.failures(), 3);

        // Fourth attempt in a row forces a reset and raises the bar.
        assert!(pdp.should_reset());
        assert_eq!(pdp.threshold(), 9);
        pdp.failure();

        for _ in 4..9 {
            assert!(!pdp.should_reset());
            pdp.failure();
        }
        assert!(pdp.should_reset());
        assert_eq!(pdp.threshold(), 27);
    }

    #[test]
    fn threshold_never_decreases_while_failing() {
        let mut pdp = PdpManager::new();
        let mut last = pdp.threshold();
        for _ in 0..100 {
            pdp.should_reset();
            pdp.failure();
            assert!(pdp.threshold() >= last);
            last = pdp.threshold();
        }
    }

    #[test]
    fn success_resets() {
        let mut pdp = PdpManager::new();
        for _ in 0..4 {
            pdp.should_reset();
            pdp.failure();
        }
        assert_eq!(pdp.threshold(), 9);
        pdp.success();
        assert_eq!(pdp, PdpManager::new());
    }
}
