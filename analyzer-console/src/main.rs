use std::error::Error;
use std::io;

use clap::{value_parser, Arg, ArgAction, Command};
use env_logger::Env;
use log::{debug, info};
use micro_analyzer::{
    Analyzer, AnalyzerConfig, BarGraphRenderer, ColorStrategy, GradientColor, IdleMode,
    ShiftingSpectrumColor, SpectrumColor,
};

mod canvas;
mod pacer;
mod source;
mod text_renderer;

use canvas::AnsiCanvas;
use pacer::Pacer;
use source::SweepSource;
use text_renderer::TextRenderer;

const SAMPLE_RATE: f32 = 44_100.0;
const PLAY_FRAMES: u32 = 400;
const PAUSE_FRAMES: u32 = 250;

fn cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Block spectrum analyzer in the terminal")
        .arg(Arg::new("bands")
            .short('b')
            .long("bands")
            .help("number of bands, text mode")
            .value_parser(value_parser!(usize))
            .default_value("32"))
        .arg(Arg::new("rows")
            .short('r')
            .long("rows")
            .help("rows per column, text mode")
            .value_parser(value_parser!(usize))
            .default_value("16"))
        .arg(Arg::new("interval")
            .short('i')
            .long("interval")
            .help("frame interval in milliseconds")
            .value_parser(value_parser!(u32))
            .default_value("20"))
        .arg(Arg::new("frames")
            .short('n')
            .long("frames")
            .help("stop after this many frames, 0 runs forever")
            .value_parser(value_parser!(u64))
            .default_value("0"))
        .arg(Arg::new("exponent")
            .short('k')
            .long("exponent")
            .help("transform size as a power of two, 3 to 9")
            .value_parser(value_parser!(u32))
            .default_value("9"))
        .arg(Arg::new("idle")
            .long("idle")
            .help("what to show while the source is paused")
            .value_parser(["demo", "silence"])
            .default_value("demo"))
        .arg(Arg::new("mode")
            .short('m')
            .long("mode")
            .help("text bars or truecolor pixels")
            .value_parser(["text", "pixels"])
            .default_value("text"))
        .arg(Arg::new("width")
            .long("width")
            .help("surface width in pixels, pixel mode")
            .value_parser(value_parser!(u32))
            .default_value("159"))
        .arg(Arg::new("height")
            .long("height")
            .help("surface height in pixels, pixel mode")
            .value_parser(value_parser!(u32))
            .default_value("47"))
        .arg(Arg::new("colors")
            .long("colors")
            .help("bar coloring, pixel mode")
            .value_parser(["spectrum", "gradient", "shifting"])
            .default_value("shifting"))
        .arg(Arg::new("hann")
            .long("hann")
            .help("apply a Hann window before the transform")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("plain")
            .long("plain")
            .help("no cursor control, append every frame")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("debug")
            .short('d')
            .long("debug")
            .help("debug logging")
            .action(ArgAction::SetTrue))
}

fn color_strategy(name: &str, band_count: usize) -> Box<dyn ColorStrategy> {
    match name {
        "spectrum" => Box::new(SpectrumColor),
        "gradient" => Box::new(GradientColor::default()),
        _ => Box::new(ShiftingSpectrumColor::new(band_count)),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let matches = cli().get_matches();

    let debug_enabled = matches.get_flag("debug");
    env_logger::Builder::from_env(Env::default().default_filter_or(if debug_enabled {"debug"} else {"info"}))
        .format_timestamp_secs()
        .init();

    let interval = matches.get_one::<u32>("interval").copied().unwrap_or(20);
    let frames = matches.get_one::<u64>("frames").copied().unwrap_or(0);
    let pixels = matches.get_one::<String>("mode").map(String::as_str) == Some("pixels");
    let ansi = !matches.get_flag("plain");

    let mut config = AnalyzerConfig {
        transform_size_exponent: matches.get_one::<u32>("exponent").copied().unwrap_or(9),
        frame_interval_ms: interval,
        hann_window: matches.get_flag("hann"),
        idle_mode: match matches.get_one::<String>("idle").map(String::as_str) {
            Some("silence") => IdleMode::Silence,
            _ => IdleMode::Demo,
        },
        ..AnalyzerConfig::default()
    };

    let (width, height) = (
        matches.get_one::<u32>("width").copied().unwrap_or(159),
        matches.get_one::<u32>("height").copied().unwrap_or(47),
    );
    if pixels {
        config.fit_surface(width, height);
    } else {
        config.band_count = matches.get_one::<usize>("bands").copied().unwrap_or(32);
        config.rows = matches.get_one::<usize>("rows").copied().unwrap_or(16);
        config.max_height = config.rows as f32;
        config.max_up_step = config.max_height;
        config.max_down_step = micro_analyzer::fall_step(config.rows, interval.max(1));
    }

    let mut analyzer = Analyzer::new(config);
    let config = analyzer.config().clone();
    info!("{} v.{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!(
        "{} bands, {} rows, {} point transform, {} ms frames",
        config.band_count,
        config.rows,
        1u32 << config.transform_size_exponent,
        config.frame_interval_ms
    );

    let mut source = SweepSource::new(
        SAMPLE_RATE,
        1usize << config.transform_size_exponent,
        PLAY_FRAMES,
        PAUSE_FRAMES,
    );
    let mut pacer = Pacer::new(config.frame_interval_ms);

    if ansi {
        // clear once, frames then redraw from the top left
        print!("\x1b[2J");
    }

    if pixels {
        let colors = color_strategy(
            matches.get_one::<String>("colors").map(String::as_str).unwrap_or("shifting"),
            config.band_count,
        );
        let mut renderer = BarGraphRenderer::new(AnsiCanvas::new(width, height), colors);
        let mut stdout = io::stdout().lock();
        run(&mut analyzer, &mut pacer, frames, |analyzer| {
            let kind = analyzer.tick(&mut source, &mut renderer)?;
            renderer.target().write_to(&mut stdout)?;
            Ok(kind)
        })?;
    } else {
        let mut renderer = TextRenderer::new(io::stdout().lock(), config.rows, ansi);
        run(&mut analyzer, &mut pacer, frames, |analyzer| {
            Ok(analyzer.tick(&mut source, &mut renderer)?)
        })?;
    }

    info!("done, {} frames skipped", pacer.skipped());
    Ok(())
}

fn run<F>(analyzer: &mut Analyzer, pacer: &mut Pacer, frames: u64, mut frame: F) -> Result<(), Box<dyn Error>>
where
    F: FnMut(&mut Analyzer) -> Result<micro_analyzer::FrameKind, Box<dyn Error>>,
{
    let mut count = 0u64;
    let mut last = None;
    while frames == 0 || count < frames {
        pacer.wait();
        let kind = frame(analyzer)?;
        if last != Some(kind) {
            debug!("source switched to {}", kind.as_str());
            last = Some(kind);
        }
        count += 1;
    }
    Ok(())
}
