//! Frame rendering: mapping a snapshot into display-agnostic draw commands.
//!
//! The engine never owns a window handle. A host calls
//! [`crate::scope::TelemetryScope::on_redraw`] with the *current* surface
//! size on every redraw and translates the returned commands into its
//! toolkit's primitives; geometry is derived from that size alone, so a
//! resize can never leave stale cached dimensions behind.

use crate::config::Theme;
use crate::range::FrameRange;
use crate::record::Sample;

/// Per-field trace palette; field `i` draws with `PALETTE[i % PALETTE.len()]`.
pub const PALETTE: [Rgb; 8] = [
    Rgb(0xE5, 0x39, 0x35), // red
    Rgb(0x43, 0xA0, 0x47), // green
    Rgb(0x1E, 0x88, 0xE5), // blue
    Rgb(0xFD, 0xD8, 0x35), // yellow
    Rgb(0xD8, 0x1B, 0x60), // magenta
    Rgb(0x00, 0xAC, 0xC1), // cyan
    Rgb(0xFB, 0x8C, 0x00), // orange
    Rgb(0x8E, 0x24, 0xAA), // purple
];

/// sRGB color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Trace color for a field index.
pub fn field_color(field: usize) -> Rgb {
    PALETTE[field % PALETTE.len()]
}

impl Theme {
    /// Surface background.
    pub fn background(&self) -> Rgb {
        match self {
            Theme::Dark => Rgb(0x12, 0x12, 0x12),
            Theme::Light => Rgb(0xFF, 0xFF, 0xFF),
        }
    }

    /// Axis line color.
    pub fn axis(&self) -> Rgb {
        match self {
            Theme::Dark => Rgb(0xB0, 0xB0, 0xB0),
            Theme::Light => Rgb(0x40, 0x40, 0x40),
        }
    }
}

/// Current size of the host's drawable surface, queried per redraw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

/// One display-agnostic draw instruction, in surface pixel coordinates with
/// the origin at the top-left.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear(Rgb),
    /// Straight line between two pixel positions.
    Line {
        from: [f32; 2],
        to: [f32; 2],
        color: Rgb,
    },
    /// Connected segments for one field's trace, in sample order.
    Polyline {
        field: usize,
        color: Rgb,
        points: Vec<[f32; 2]>,
    },
}

/// Pixel-space plot rectangle derived from the surface size and margin.
#[derive(Debug, Clone, Copy)]
struct PlotRect {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl PlotRect {
    fn from_surface(size: SurfaceSize, margin: f32) -> Self {
        // Degenerate surfaces (smaller than the margins) collapse to a
        // 1px plot area rather than flipping the axes.
        let right = (size.width - margin).max(margin + 1.0);
        let bottom = (size.height - margin).max(margin + 1.0);
        Self {
            left: margin,
            top: margin,
            right,
            bottom,
        }
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }

    fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Build the draw list for `samples` at `size`.
///
/// Axis extents are computed here, once per frame, from exactly the samples
/// being drawn.
pub fn render_frame(
    samples: &[Sample],
    field_count: usize,
    size: SurfaceSize,
    margin: f32,
    theme: Theme,
) -> Vec<DrawCommand> {
    let range = FrameRange::compute(samples);
    render_with_range(samples, field_count, &range, size, margin, theme)
}

/// Like [`render_frame`] with a caller-supplied range.
pub fn render_with_range(
    samples: &[Sample],
    field_count: usize,
    range: &FrameRange,
    size: SurfaceSize,
    margin: f32,
    theme: Theme,
) -> Vec<DrawCommand> {
    let rect = PlotRect::from_surface(size, margin);
    let mut commands = Vec::with_capacity(3 + field_count);

    commands.push(DrawCommand::Clear(theme.background()));
    // Y axis, then X axis, as in the plot frame.
    commands.push(DrawCommand::Line {
        from: [rect.left, rect.top],
        to: [rect.left, rect.bottom],
        color: theme.axis(),
    });
    commands.push(DrawCommand::Line {
        from: [rect.left, rect.bottom],
        to: [rect.right, rect.bottom],
        color: theme.axis(),
    });

    if samples.len() < 2 {
        // Nothing connectable yet; axes alone.
        return commands;
    }

    let x_scale = rect.width() as f64 / range.time_span();
    let y_scale = rect.height() as f64 / range.value_span();

    for field in 0..field_count {
        let points: Vec<[f32; 2]> = samples
            .iter()
            .filter_map(|s| {
                let v = s.values.get(field).copied()?;
                let x = rect.left as f64 + (s.timestamp - range.t_min) * x_scale;
                let y = rect.bottom as f64 - (v - range.v_min) * y_scale;
                Some([x as f32, y as f32])
            })
            .collect();
        if points.len() >= 2 {
            commands.push(DrawCommand::Polyline {
                field,
                color: field_color(field),
                points,
            });
        }
    }

    commands
}
