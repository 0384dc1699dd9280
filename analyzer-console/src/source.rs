use micro_analyzer::ScopeSource;
use wavegen::{sine, wf};

const SWEEP_LOW_HZ: f32 = 60.0;
const SWEEP_HIGH_HZ: f32 = 6000.0;
const OVERTONE_LEVEL: f32 = 0.3;

/// Synthetic player: a tone with one overtone sweeping up the spectrum,
/// paused now and then so the idle fallback gets its turn.
pub struct SweepSource {
    sample_rate: f32,
    play_frames: u32,
    pause_frames: u32,
    frame: u32,
    scope: Vec<f32>,
}

impl SweepSource {
    pub fn new(sample_rate: f32, scope_len: usize, play_frames: u32, pause_frames: u32) -> Self {
        Self {
            sample_rate,
            play_frames: play_frames.max(1),
            pause_frames,
            frame: 0,
            scope: vec![0.0; scope_len],
        }
    }

    pub fn is_playing(&self) -> bool {
        self.frame % (self.play_frames + self.pause_frames) < self.play_frames
    }

    fn frequency(&self) -> f32 {
        let progress = (self.frame % (self.play_frames + self.pause_frames)) as f32
            / self.play_frames as f32;
        // exponential sweep so every octave gets the same screen time
        SWEEP_LOW_HZ * (SWEEP_HIGH_HZ / SWEEP_LOW_HZ).powf(progress.min(1.0))
    }

    fn render(&mut self) {
        let f = self.frequency();
        let tone = wf!(f32, self.sample_rate, sine!(f));
        let overtone = wf!(f32, self.sample_rate, sine!(3.0 * f));
        for (sample, (a, b)) in self
            .scope
            .iter_mut()
            .zip(tone.iter().zip(overtone.iter()))
        {
            *sample = 0.6 * a + OVERTONE_LEVEL * b;
        }
    }
}

impl ScopeSource for SweepSource {
    fn fetch_scope(&mut self) -> Option<&[f32]> {
        let playing = self.is_playing();
        if playing {
            self.render();
        }
        self.frame = self.frame.wrapping_add(1);
        if playing {
            Some(self.scope.as_slice())
        } else {
            None
        }
    }
}
