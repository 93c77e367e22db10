use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use speedgauge::{
    FontBook, Gauge, GaugeApp, GaugeConfig, RandomWalk, Settings, Sweep, Theme,
};

/// Reference screen size the default gauge proportions were designed for.
const REFERENCE_SIZE: f64 = 320.0;

#[derive(Parser, Debug)]
#[command(name = "speedgauge", about = "Animated speedometer gauge demo")]
struct Args {
    /// TOML file with [gauge] and [window] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    max: Option<f64>,

    /// Value at and above which the ring turns red
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<f64>,

    /// Unit of measurement label
    #[arg(long)]
    unit: Option<String>,

    /// Start in the dark theme (Space or N toggles it at runtime)
    #[arg(long)]
    dark: bool,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Font file used for every label
    #[arg(long)]
    font: Option<PathBuf>,

    /// Wander randomly instead of sweeping min to max
    #[arg(long)]
    random: bool,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        let gauge = &mut settings.gauge;
        if let Some(min) = self.min {
            gauge.min_value = min;
        }
        if let Some(max) = self.max {
            gauge.max_value = max;
        }
        if let Some(limit) = self.limit {
            gauge.limit_value = limit;
        }
        if let Some(unit) = self.unit {
            gauge.unit_of_measurement = unit;
        }
        if let Some(font) = self.font {
            *gauge = std::mem::take(gauge).with_font_path(font);
        }

        let window = &mut settings.window;
        if self.dark {
            window.theme = Theme::Dark;
        }
        if let Some(title) = self.title {
            window.title = title;
        }
        if let Some(width) = self.width {
            window.width = width;
        }
        if let Some(height) = self.height {
            window.height = height;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let random = args.random;
    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    args.apply(&mut settings);

    let Settings { gauge, window } = settings;
    if gauge.min_value > gauge.max_value {
        log::warn!(
            "min {} is above max {}; every value will read as min",
            gauge.min_value,
            gauge.max_value
        );
    }

    let ratio = f64::from(window.width.min(window.height)) / REFERENCE_SIZE;
    let config: GaugeConfig = gauge.scaled(ratio);
    let fonts = FontBook::load(&config).context("loading label fonts")?;
    let gauge = Gauge::new(config);

    if random {
        GaugeApp::new(gauge, window, RandomWalk::new(rand::rng())).run(fonts)?;
    } else {
        GaugeApp::new(gauge, window, Sweep::default()).run(fonts)?;
    }
    Ok(())
}
