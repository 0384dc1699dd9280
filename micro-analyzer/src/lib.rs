#![no_std]
extern crate alloc;

#[macro_use]
mod macros;

pub mod analyzer;
pub mod band_decay;
pub mod color_strategy;
pub mod config;
pub mod demo_signal;
pub mod log_scale;
pub mod renderer;
pub mod types;

pub use analyzer::{Analyzer, FrameKind, ScopeSource};
pub use band_decay::{BandDecayEngine, BandState, DecayParams, ROOF_VELOCITY_MIN};
pub use color_strategy::{
    ColorContext, ColorStrategy, GradientColor, ShiftingSpectrumColor, SpectrumColor,
};
pub use config::{AnalyzerConfig, IdleMode};
pub use demo_signal::DemoSignal;
pub use log_scale::{fall_step, LogScale};
pub use renderer::{BarGraphRenderer, RenderAdapter};
pub use types::BandView;
