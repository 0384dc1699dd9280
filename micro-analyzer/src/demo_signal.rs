use core::f32::consts::PI;

#[allow(unused_imports)]
use micromath::F32Ext;

pub const DEMO_POINTS: usize = 32;

const DEMO_START: u32 = 201;
const DEMO_ACTIVE: u32 = 201; // frames with a non-zero envelope
const DEMO_PERIOD: u32 = 999;

/// Synthetic scope shown while nothing is playing: a half-sine hump that
/// swells for 200 frames and then stays flat until the cycle wraps.
#[derive(Debug, Clone)]
pub struct DemoSignal {
    t: u32,
    scope: [f32; DEMO_POINTS],
}

impl Default for DemoSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSignal {
    pub const fn new() -> Self {
        Self {
            t: DEMO_START,
            scope: [0.0; DEMO_POINTS],
        }
    }

    pub fn phase(&self) -> u32 {
        self.t
    }

    pub fn reset(&mut self) {
        self.t = DEMO_START;
        self.scope = [0.0; DEMO_POINTS];
    }

    /// Produces the next frame's envelope and advances the cycle.
    pub fn next_frame(&mut self) -> &[f32] {
        if self.t > DEMO_PERIOD {
            self.t = 1;
        }

        if self.t < DEMO_ACTIVE {
            let dt = self.t as f32 / 200.0;
            for (i, v) in self.scope.iter_mut().enumerate() {
                *v = dt * ((PI + i as f32 * PI / DEMO_POINTS as f32).sin() + 1.0);
            }
        } else {
            self.scope = [0.0; DEMO_POINTS];
        }

        self.t += 1;
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn starts_flat() {
        let mut demo = DemoSignal::new();
        assert!(demo.next_frame().iter().all(|&v| v == 0.0));
        assert_eq!(demo.phase(), 202);
    }

    #[test]
    fn wraps_into_envelope() {
        let mut demo = DemoSignal::new();
        // 201..=999 is flat
        for _ in 201..=999 {
            assert!(demo.next_frame().iter().all(|&v| v == 0.0));
        }
        let first = demo.next_frame();
        assert_eq!(first.len(), DEMO_POINTS);
        // t = 1, dt = 1/200
        assert_abs_diff_eq!(first[0], 0.005, epsilon = 1e-4);
        assert_eq!(demo.phase(), 2);
    }

    #[test]
    fn envelope_grows_then_stops() {
        let mut demo = DemoSignal::new();
        for _ in 201..=999 {
            demo.next_frame();
        }
        let mut previous = 0.0;
        for _ in 1..201 {
            let v = demo.next_frame()[0];
            assert!(v > previous);
            previous = v;
        }
        assert_abs_diff_eq!(previous, 1.0, epsilon = 1e-2);
        // the hump dips in the middle: sin(pi + x) is negative on (0, pi)
        let mut demo_mid = demo.clone();
        demo_mid.t = 100;
        let frame = demo_mid.next_frame();
        assert!(frame[16] < frame[0]);
        assert!(frame.iter().all(|&v| v > -1e-3));

        assert!(demo.next_frame().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn reset_restarts_cycle() {
        let mut demo = DemoSignal::new();
        for _ in 0..900 {
            demo.next_frame();
        }
        demo.reset();
        assert_eq!(demo.phase(), 201);
    }
}
