use alloc::{vec, vec::Vec};

use micro_fht::{apply_hann_window, interpolate, load_scope, Fht};

use crate::band_decay::{BandDecayEngine, BandState, DecayParams};
use crate::config::{AnalyzerConfig, IdleMode, MAX_BAND_COUNT};
use crate::demo_signal::DemoSignal;
use crate::log_scale::LogScale;
use crate::renderer::RenderAdapter;

const LOG_INTERVAL: u32 = 200; // frames

/// Where audio samples come from. `None` or an empty slice means nothing is
/// playing.
pub trait ScopeSource {
    fn fetch_scope(&mut self) -> Option<&[f32]>;
}

/// What fed the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Live,
    Demo,
    Silence,
}

impl FrameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameKind::Live => "live",
            FrameKind::Demo => "demo",
            FrameKind::Silence => "silence",
        }
    }
}

/// Per-frame glue: scope in, animated bands out to a [`RenderAdapter`].
pub struct Analyzer {
    config: AnalyzerConfig,
    fht: Fht,
    buffer: Vec<f32>,
    targets: Vec<f32>,
    scale: LogScale,
    decay: BandDecayEngine,
    demo: DemoSignal,
    frames: u32,
    log_counter: u32,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let config = config.clamped();
        let fht = Fht::new(config.transform_size_exponent);
        info!(
            "Analyzer::new called with bands: {}, rows: {}, transform size: {}",
            config.band_count,
            config.rows,
            fht.size()
        );

        Self {
            buffer: vec![0.0; fht.size()],
            targets: vec![0.0; config.band_count],
            scale: LogScale::new(config.rows),
            decay: BandDecayEngine::new(config.band_count, DecayParams::from(&config)),
            demo: DemoSignal::new(),
            frames: 0,
            log_counter: 0,
            fht,
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn bands(&self) -> &[BandState] {
        self.decay.bands()
    }

    pub fn band_count(&self) -> usize {
        self.decay.len()
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Applies a new configuration. Bands restart from rest when the band
    /// count or the height scale changes.
    pub fn set_config(&mut self, config: AnalyzerConfig) {
        let config = config.clamped();
        let relayout = config.band_count != self.config.band_count
            || config.rows != self.config.rows
            || config.max_height != self.config.max_height;

        if self.fht.set_exponent(config.transform_size_exponent) {
            self.buffer.resize(self.fht.size(), 0.0);
            debug!("transform size now {}", self.fht.size());
        }
        self.decay.set_params(DecayParams::from(&config));
        self.config = config;

        if relayout {
            self.relayout();
        }
    }

    /// Changes the band count and full-bar height, dropping all band state.
    pub fn resize(&mut self, band_count: usize, max_height: f32) {
        let mut config = self.config.clone();
        config.band_count = band_count;
        config.max_height = max_height;
        config.max_up_step = max_height;
        self.set_config(config);
        self.relayout();
    }

    /// Lays the bands out on a pixel surface, one per block column.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        let mut config = self.config.clone();
        config.fit_surface(width, height);
        self.set_config(config);
        self.relayout();
    }

    pub fn set_transform_exponent(&mut self, exponent: u32) {
        let mut config = self.config.clone();
        config.transform_size_exponent = exponent;
        self.set_config(config);
    }

    fn relayout(&mut self) {
        self.targets.clear();
        self.targets.resize(self.config.band_count, 0.0);
        self.scale = LogScale::new(self.config.rows);
        self.decay.resize(self.config.band_count);
        debug!(
            "relayout: {} bands, {} rows",
            self.config.band_count, self.config.rows
        );
    }

    /// Bins handed to the interpolator. The upper half of the spectrum
    /// rarely carries anything worth a column of its own.
    fn kept_bins(&self) -> usize {
        self.fht
            .bins()
            .min((MAX_BAND_COUNT / 2).max(self.config.band_count))
    }

    fn prepare_live(&mut self, scope: &[f32]) {
        let loaded = load_scope(scope, &mut self.buffer);
        if self.config.hann_window {
            apply_hann_window(&mut self.buffer[..loaded]);
        }

        self.fht.scale(&mut self.buffer, 2.0);
        self.fht.spectrum(&mut self.buffer);
        self.fht.scale(&mut self.buffer, 2.0 / self.fht.size() as f32);

        let keep = self.kept_bins();
        interpolate(&self.buffer[..keep], &mut self.targets);
    }

    /// Runs one frame: fetch, transform, resize to bands, animate, draw.
    pub fn tick<S, R>(&mut self, source: &mut S, adapter: &mut R) -> Result<FrameKind, R::Error>
    where
        S: ScopeSource + ?Sized,
        R: RenderAdapter + ?Sized,
    {
        let kind = match source.fetch_scope() {
            Some(scope) if !scope.is_empty() => {
                self.prepare_live(scope);
                FrameKind::Live
            }
            _ => match self.config.idle_mode {
                IdleMode::Demo => {
                    interpolate(self.demo.next_frame(), &mut self.targets);
                    FrameKind::Demo
                }
                IdleMode::Silence => {
                    self.targets.fill(0.0);
                    FrameKind::Silence
                }
            },
        };

        let max_height = self.config.max_height;
        for target in self.targets.iter_mut() {
            *target = self.scale.height(*target, max_height);
        }
        self.decay.update(&self.targets);

        adapter.begin_frame(self.decay.len())?;
        for view in self.decay.views() {
            adapter.draw_band(&view)?;
        }
        adapter.end_frame()?;

        self.frames = self.frames.wrapping_add(1);
        self.log_counter += 1;
        if self.log_counter >= LOG_INTERVAL {
            info!(
                "{} frames, last frame {}, band 0 at {}",
                self.frames,
                kind.as_str(),
                self.decay.band(0).map_or(0.0, |b| b.bar_height())
            );
            self.log_counter = 0;
        }

        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BandView;
    use core::convert::Infallible;

    struct Silent;

    impl ScopeSource for Silent {
        fn fetch_scope(&mut self) -> Option<&[f32]> {
            None
        }
    }

    struct Fixed(Vec<f32>);

    impl ScopeSource for Fixed {
        fn fetch_scope(&mut self) -> Option<&[f32]> {
            Some(self.0.as_slice())
        }
    }

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        drawn: Vec<(usize, f32, f32)>,
    }

    impl RenderAdapter for Recorder {
        type Error = Infallible;

        fn begin_frame(&mut self, _band_count: usize) -> Result<(), Infallible> {
            self.drawn.clear();
            Ok(())
        }

        fn draw_band(&mut self, band: &BandView<'_>) -> Result<(), Infallible> {
            self.drawn.push((band.index, band.bar_height, band.roof_height));
            Ok(())
        }

        fn end_frame(&mut self) -> Result<(), Infallible> {
            self.frames += 1;
            Ok(())
        }
    }

    struct Broken;

    impl RenderAdapter for Broken {
        type Error = &'static str;

        fn draw_band(&mut self, _band: &BandView<'_>) -> Result<(), &'static str> {
            Err("display gone")
        }
    }

    fn small_config() -> AnalyzerConfig {
        AnalyzerConfig {
            band_count: 8,
            transform_size_exponent: 6,
            max_up_step: 64.0,
            ..AnalyzerConfig::default()
        }
    }

    #[test]
    fn empty_source_falls_back_to_demo() {
        let mut analyzer = Analyzer::new(small_config());
        let mut recorder = Recorder::default();
        let kind = analyzer.tick(&mut Silent, &mut recorder).unwrap();
        assert_eq!(kind, FrameKind::Demo);
        assert_eq!(recorder.drawn.len(), 8);
        assert_eq!(recorder.frames, 1);

        let kind = analyzer.tick(&mut Fixed(Vec::new()), &mut recorder).unwrap();
        assert_eq!(kind, FrameKind::Demo);
    }

    #[test]
    fn silence_mode_keeps_bars_down() {
        let config = AnalyzerConfig {
            idle_mode: IdleMode::Silence,
            ..small_config()
        };
        let mut analyzer = Analyzer::new(config);
        let mut recorder = Recorder::default();
        for _ in 0..5 {
            assert_eq!(
                analyzer.tick(&mut Silent, &mut recorder).unwrap(),
                FrameKind::Silence
            );
        }
        assert!(recorder.drawn.iter().all(|&(_, bar, _)| bar == 0.0));
        assert_eq!(analyzer.frames(), 5);
    }

    #[test]
    fn live_dc_lights_the_first_band() {
        let mut analyzer = Analyzer::new(small_config());
        let mut recorder = Recorder::default();
        let mut source = Fixed(vec![0.5; 64]);
        assert_eq!(
            analyzer.tick(&mut source, &mut recorder).unwrap(),
            FrameKind::Live
        );
        let (index, bar, roof) = recorder.drawn[0];
        assert_eq!(index, 0);
        assert!(bar > 0.0);
        assert_eq!(roof, bar);
        assert!(recorder.drawn[1..].iter().all(|&(_, bar, _)| bar == 0.0));
    }

    #[test]
    fn bars_stay_within_bounds() {
        let mut analyzer = Analyzer::new(small_config());
        let mut recorder = Recorder::default();
        let mut source = Fixed(vec![100.0; 64]);
        for _ in 0..10 {
            analyzer.tick(&mut source, &mut recorder).unwrap();
            for &(_, bar, roof) in &recorder.drawn {
                assert!((0.0..=64.0).contains(&bar));
                assert!(roof >= bar);
            }
        }
    }

    #[test]
    fn render_errors_propagate() {
        let mut analyzer = Analyzer::new(small_config());
        assert_eq!(analyzer.tick(&mut Silent, &mut Broken), Err("display gone"));
    }

    #[test]
    fn resize_recreates_bands() {
        let mut analyzer = Analyzer::new(small_config());
        let mut recorder = Recorder::default();
        analyzer.tick(&mut Fixed(vec![0.5; 64]), &mut recorder).unwrap();

        analyzer.resize(12, 32.0);
        assert_eq!(analyzer.band_count(), 12);
        assert_eq!(analyzer.config().max_height, 32.0);
        assert!(analyzer.bands().iter().all(|b| b.bar_height() == 0.0));

        analyzer.resize_surface(159, 47);
        assert_eq!(analyzer.band_count(), 32);
        assert_eq!(analyzer.config().rows, 16);
    }

    #[test]
    fn transform_exponent_is_clamped() {
        let mut analyzer = Analyzer::new(small_config());
        analyzer.set_transform_exponent(20);
        assert_eq!(analyzer.config().transform_size_exponent, 9);
        let mut recorder = Recorder::default();
        let kind = analyzer
            .tick(&mut Fixed(vec![0.25; 1000]), &mut recorder)
            .unwrap();
        assert_eq!(kind, FrameKind::Live);
    }
}
