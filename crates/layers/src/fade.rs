use runtime::{TickHandle, Ticker};
use tracing::trace;

use crate::scale::ScaledBuilding;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick did not belong to the running fade.
    Ignored,
    Advanced,
    /// Factor reached 1; new-building flags are cleared and the tick is stopped.
    Finished,
}

/// Grows freshly loaded buildings from the ground up.
///
/// At most one repeating tick is active; starting a new fade stops the previous one.
#[derive(Debug)]
pub struct FadeAnimator {
    factor: f64,
    step: f64,
    period_ms: u32,
    active: Option<TickHandle>,
}

impl FadeAnimator {
    pub fn new(step: f64, period_ms: u32) -> Self {
        Self {
            factor: 1.0,
            step,
            period_ms,
            active: None,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_handle(&self) -> Option<TickHandle> {
        self.active
    }

    pub fn start<K: Ticker + ?Sized>(&mut self, ticker: &mut K) {
        self.stop(ticker);
        self.factor = 0.0;
        self.active = Some(ticker.start(self.period_ms));
    }

    /// Stops the running tick, leaving the factor where it is.
    pub fn stop<K: Ticker + ?Sized>(&mut self, ticker: &mut K) {
        if let Some(handle) = self.active.take() {
            ticker.stop(handle);
        }
    }

    /// Stops any running tick and shows everything at full height.
    pub fn finish<K: Ticker + ?Sized>(&mut self, ticker: &mut K, buildings: &mut [ScaledBuilding]) {
        self.stop(ticker);
        self.factor = 1.0;
        for b in buildings.iter_mut() {
            b.is_new = false;
        }
    }

    pub fn tick<K: Ticker + ?Sized>(
        &mut self,
        handle: TickHandle,
        ticker: &mut K,
        buildings: &mut [ScaledBuilding],
    ) -> TickOutcome {
        if self.active != Some(handle) {
            return TickOutcome::Ignored;
        }

        self.factor += self.step;
        if self.factor >= 1.0 {
            self.finish(ticker, buildings);
            trace!("fade finished");
            return TickOutcome::Finished;
        }
        TickOutcome::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::{FadeAnimator, TickOutcome};
    use crate::scale::ScaledBuilding;
    use foundation::math::Pixel;
    use runtime::{ManualTicker, TickHandle};

    fn buildings() -> Vec<ScaledBuilding> {
        vec![
            ScaledBuilding {
                height: 10,
                footprint: vec![Pixel::new(0, 0)],
                is_new: true,
            },
            ScaledBuilding {
                height: 20,
                footprint: vec![Pixel::new(5, 5)],
                is_new: false,
            },
        ]
    }

    #[test]
    fn idle_animator_is_at_full_height() {
        let fade = FadeAnimator::new(0.1, 33);
        assert_eq!(fade.factor(), 1.0);
        assert!(!fade.is_running());
    }

    #[test]
    fn runs_to_exactly_one_and_clears_flags() {
        let mut ticker = ManualTicker::new();
        let mut data = buildings();
        let mut fade = FadeAnimator::new(0.1, 33);
        fade.start(&mut ticker);
        assert_eq!(fade.factor(), 0.0);
        assert_eq!(ticker.last_period_ms(), Some(33));

        let handle = fade.active_handle().expect("running");
        let mut ticks = 0;
        loop {
            ticks += 1;
            match fade.tick(handle, &mut ticker, &mut data) {
                TickOutcome::Advanced => assert!(data[0].is_new),
                TickOutcome::Finished => break,
                TickOutcome::Ignored => panic!("own tick ignored"),
            }
            assert!(ticks < 100);
        }

        assert!((10..=11).contains(&ticks));
        assert_eq!(fade.factor(), 1.0);
        assert!(!fade.is_running());
        assert_eq!(ticker.running_count(), 0);
        assert!(data.iter().all(|b| !b.is_new));
    }

    #[test]
    fn restart_cancels_previous_tick() {
        let mut ticker = ManualTicker::new();
        let mut data = buildings();
        let mut fade = FadeAnimator::new(0.1, 33);
        fade.start(&mut ticker);
        let first = fade.active_handle().expect("first");
        fade.tick(first, &mut ticker, &mut data);

        fade.start(&mut ticker);
        let second = fade.active_handle().expect("second");
        assert_ne!(first, second);
        assert_eq!(ticker.running_count(), 1);
        assert_eq!(fade.factor(), 0.0);
        assert_eq!(fade.tick(first, &mut ticker, &mut data), TickOutcome::Ignored);
        assert_eq!(fade.factor(), 0.0);
    }

    #[test]
    fn foreign_handle_is_ignored() {
        let mut ticker = ManualTicker::new();
        let mut data = buildings();
        let mut fade = FadeAnimator::new(0.1, 33);
        assert_eq!(
            fade.tick(TickHandle(42), &mut ticker, &mut data),
            TickOutcome::Ignored
        );
        assert!(data[0].is_new);
    }
}
