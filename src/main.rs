//! serialscope binary: an eframe host window around the engine.
//!
//! Run with:  `RUST_LOG=info serialscope /dev/ttyUSB0 --fields 2`
//!
//! The window is deliberately thin glue: it forwards its surface size to
//! [`TelemetryScope::on_redraw`] every frame and paints the returned draw
//! commands. All telemetry logic lives in the library.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use serialscope::{
    config, AcquisitionState, DrawCommand, Rgb, ScopeConfig, SerialSource, SurfaceSize,
    TelemetryScope, Theme,
};

#[derive(Parser, Debug)]
#[command(
    name = "serialscope",
    version,
    about = "Live rolling graph for CSV telemetry on a serial device"
)]
struct Args {
    /// Serial device path, e.g. /dev/ttyUSB0
    device: String,

    /// Number of data fields per record (1..=8)
    #[arg(short = 'n', long, default_value_t = 1)]
    fields: usize,

    /// Ring capacity in samples
    #[arg(long, default_value_t = config::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Baud rate
    #[arg(short, long, default_value_t = 115_200)]
    baud: u32,

    /// Poll interval in milliseconds while the device is quiet
    #[arg(long, default_value_t = config::DEFAULT_POLL_MS)]
    poll_ms: u64,

    /// Color theme
    #[arg(long, value_enum, default_value = "dark")]
    theme: ThemeArg,

    /// JSON engine config file; replaces the engine flags above
    /// (device and baud still come from the command line)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(v: ThemeArg) -> Self {
        match v {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

impl Args {
    fn scope_config(&self) -> Result<ScopeConfig, serialscope::ConfigError> {
        match &self.config {
            Some(path) => ScopeConfig::load(path),
            None => Ok(ScopeConfig {
                field_count: self.fields,
                capacity: self.capacity,
                poll_interval_ms: self.poll_ms,
                theme: self.theme.into(),
                ..ScopeConfig::default()
            }),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let scope_config = args.scope_config().context("invalid configuration")?;
    let mut scope = TelemetryScope::new(scope_config).context("invalid configuration")?;

    let source = SerialSource::open(&args.device, args.baud)
        .with_context(|| format!("cannot open serial device {}", args.device))?;
    scope.start(source);

    tracing::info!(
        device = %args.device,
        baud = args.baud,
        fields = scope.config().field_count,
        capacity = scope.config().capacity,
        "serialscope v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default().with_inner_size([800.0, 600.0]);
    eframe::run_native(
        "serialscope",
        native_options,
        Box::new(|_cc| Ok(Box::new(HostApp::new(scope)))),
    )
    .map_err(|e| anyhow::anyhow!("host window error: {e}"))
}

struct HostApp {
    scope: TelemetryScope,
    seen_generation: u64,
}

impl HostApp {
    fn new(scope: TelemetryScope) -> Self {
        Self {
            scope,
            seen_generation: 0,
        }
    }
}

fn color32(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.0, c.1, c.2)
}

impl eframe::App for HostApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let origin = rect.min;
                let at = |p: [f32; 2]| egui::Pos2::new(origin.x + p[0], origin.y + p[1]);

                let size = SurfaceSize {
                    width: rect.width(),
                    height: rect.height(),
                };
                let commands = self.scope.on_redraw(size);

                let painter = ui.painter();
                for command in &commands {
                    match command {
                        DrawCommand::Clear(c) => {
                            painter.rect_filled(rect, egui::CornerRadius::ZERO, color32(*c));
                        }
                        DrawCommand::Line { from, to, color } => {
                            painter.line_segment(
                                [at(*from), at(*to)],
                                egui::Stroke::new(1.0, color32(*color)),
                            );
                        }
                        DrawCommand::Polyline { points, color, .. } => {
                            for pair in points.windows(2) {
                                painter.line_segment(
                                    [at(pair[0]), at(pair[1])],
                                    egui::Stroke::new(1.5, color32(*color)),
                                );
                            }
                        }
                    }
                }

                if self.scope.acquisition_state() == AcquisitionState::Failed {
                    let stats = self.scope.stats();
                    painter.text(
                        at([8.0, 8.0]),
                        egui::Align2::LEFT_TOP,
                        format!(
                            "data acquisition stopped ({} samples received)",
                            stats.accepted
                        ),
                        egui::FontId::monospace(14.0),
                        egui::Color32::RED,
                    );
                }
            });

        // Repaint quickly while data flows; idle windows poll more slowly.
        let generation = self.scope.data_generation();
        let delay = if generation != self.seen_generation {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(50)
        };
        self.seen_generation = generation;
        ctx.request_repaint_after(delay);
    }
}
