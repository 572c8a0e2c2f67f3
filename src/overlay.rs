//! Metrics panel layout.
//!
//! A [`PanelLayout`] places one row per displayed metric in a dark box
//! anchored to the top-right corner of the frame. Layout is computed from the
//! frame width alone, so it is deterministic for a given set of rows.

use crate::color::{palette, Rgba};
use crate::geometry::{PixelPoint, PixelRect};
use crate::render::DrawCommand;

/// Pixel constants of the metrics panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelStyle {
    /// Distance from the right frame edge to the text column.
    pub inset_from_right: i32,
    /// Top edge of the panel.
    pub top: i32,
    /// Vertical distance between row baselines.
    pub row_height: i32,
    /// Height added on top of `rows * row_height`.
    pub padding: i32,
    /// Baseline of the first row, relative to `top`.
    pub first_baseline: i32,
    /// Gap between the panel's left edge and the text column.
    pub left_margin: i32,
    /// Gap between the panel's right edge and the frame edge.
    pub right_margin: i32,
    /// Right edge of the status bar, measured left of the text column.
    pub bar_gap: i32,
    /// Status bar extent above the baseline.
    pub bar_above: i32,
    /// Status bar extent below the baseline.
    pub bar_below: i32,
    /// Offset of the value column from the text column.
    pub value_column: i32,
    /// Offset of the advice line below the baseline.
    pub advice_offset: i32,
    /// Integer glyph scale for all panel text.
    pub text_scale: u32,
    /// Panel background.
    pub background: Rgba,
    /// Label color.
    pub label_color: Rgba,
    /// Advice color.
    pub advice_color: Rgba,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            inset_from_right: 480,
            top: 20,
            row_height: 65,
            padding: 40,
            first_baseline: 45,
            left_margin: 15,
            right_margin: 10,
            bar_gap: 6,
            bar_above: 28,
            bar_below: 18,
            value_column: 170,
            advice_offset: 26,
            text_scale: 2,
            background: palette::PANEL,
            label_color: palette::LABEL,
            advice_color: palette::WARNING,
        }
    }
}

/// One line of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    /// Metric label, e.g. `Neck`.
    pub label: String,
    /// Formatted smoothed value with unit, e.g. `23 deg`.
    pub value: String,
    /// Tier color used for the status bar and the value.
    pub color: Rgba,
    /// Advice line, drawn only when present.
    pub advice: Option<String>,
}

/// Positioned metrics panel for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    style: PanelStyle,
    frame_width: u32,
    rows: Vec<PanelRow>,
}

impl PanelLayout {
    /// Lay out `rows` for a frame `frame_width` pixels wide.
    #[must_use]
    pub fn new(frame_width: u32, rows: Vec<PanelRow>, style: PanelStyle) -> Self {
        Self {
            style,
            frame_width,
            rows,
        }
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    /// Style the layout was computed with.
    #[must_use]
    pub const fn style(&self) -> &PanelStyle {
        &self.style
    }

    /// Top-left corner of the text column.
    #[must_use]
    pub fn origin(&self) -> PixelPoint {
        let x = i64::from(self.frame_width) - i64::from(self.style.inset_from_right);
        PixelPoint::new(saturate(x), self.style.top)
    }

    /// Panel height: padding plus one row height per row.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.style.padding + self.style.row_height * self.rows.len() as i32
    }

    /// Area covered by the panel background.
    #[must_use]
    pub fn background(&self) -> PixelRect {
        let origin = self.origin();
        let right = saturate(i64::from(self.frame_width) - i64::from(self.style.right_margin));
        PixelRect::from_corners(
            origin.offset(-self.style.left_margin, 0),
            PixelPoint::new(right, origin.y + self.height()),
        )
    }

    /// Baseline-left point of row `index`.
    #[must_use]
    pub fn baseline(&self, index: usize) -> PixelPoint {
        let origin = self.origin();
        origin.offset(
            0,
            self.style.first_baseline + self.style.row_height * index as i32,
        )
    }

    /// Draw commands for the background and every row.
    #[must_use]
    pub fn commands(&self) -> Vec<DrawCommand> {
        let s = &self.style;
        let mut commands = Vec::with_capacity(1 + self.rows.len() * 4);
        commands.push(DrawCommand::FillRect {
            rect: self.background(),
            color: s.background,
        });

        for (i, row) in self.rows.iter().enumerate() {
            let base = self.baseline(i);

            commands.push(DrawCommand::FillRect {
                rect: PixelRect::from_corners(
                    base.offset(-s.left_margin, -s.bar_above),
                    base.offset(-s.bar_gap, s.bar_below),
                ),
                color: row.color,
            });
            commands.push(DrawCommand::Text {
                origin: base,
                text: row.label.clone(),
                color: s.label_color,
                scale: s.text_scale,
            });
            commands.push(DrawCommand::Text {
                origin: base.offset(s.value_column, 0),
                text: row.value.clone(),
                color: row.color,
                scale: s.text_scale,
            });
            if let Some(advice) = &row.advice {
                commands.push(DrawCommand::Text {
                    origin: base.offset(0, s.advice_offset),
                    text: format!("-> {advice}"),
                    color: s.advice_color,
                    scale: s.text_scale,
                });
            }
        }

        commands
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
