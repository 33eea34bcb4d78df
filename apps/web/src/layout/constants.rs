//! Layout constants for the content-block row packer.
//!
//! Read-only at runtime: built once at startup, carried in `AppState`, and
//! published to clients through `GET /api/v1/layout/config` so the browser can
//! pick the same breakpoint and debounce interval.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Slot budget of one desktop row. A square image consumes one slot.
    pub desktop_slot_width: u32,
    pub mobile_slot_width: u32,
    /// Horizontal gap between blocks in a row, in pixels.
    pub desktop_gap: u32,
    pub mobile_gap: u32,
    /// Viewports narrower than this are laid out with the mobile budget.
    pub mobile_breakpoint: u32,
    /// Cover images are cropped to a ratio inside `[min, max]`.
    pub header_cover_min_ratio: f64,
    pub header_cover_max_ratio: f64,
    /// A cover row is never taller than this fraction of the container width.
    pub header_row_height_ratio: f64,
    /// How far ahead the pattern pass looks for a block to pull forward.
    pub pattern_window_size: usize,
    /// No block is moved more than this many positions from its ordered index.
    pub pattern_max_movement: usize,
    pub pattern_reordering: bool,
    /// Dimensions substituted for blocks without intrinsic size.
    pub default_image_width: f64,
    pub default_image_height: f64,
    /// Debounce interval clients should apply to resize-driven relayouts.
    pub resize_debounce_ms: u64,
    /// Largest container width a layout request may ask for.
    pub max_container_width: u32,
}

/// Returns the layout configuration used by the site.
pub fn default_layout_config() -> LayoutConfig {
    LayoutConfig {
        desktop_slot_width: 5,
        mobile_slot_width: 2,
        desktop_gap: 12,
        mobile_gap: 8,
        mobile_breakpoint: 768,
        header_cover_min_ratio: 1.5,
        header_cover_max_ratio: 3.0,
        header_row_height_ratio: 0.6,
        pattern_window_size: 5,
        pattern_max_movement: 2,
        pattern_reordering: true,
        default_image_width: 800.0,
        default_image_height: 800.0,
        resize_debounce_ms: 100,
        max_container_width: 10_000,
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        default_layout_config()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Viewport → row parameters
// ────────────────────────────────────────────────────────────────────────────

/// Measured viewport, as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub is_mobile: bool,
}

impl Viewport {
    pub fn from_width(width: u32, config: &LayoutConfig) -> Self {
        Viewport {
            width,
            is_mobile: width < config.mobile_breakpoint,
        }
    }
}

/// Parameters of a single packing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowParams {
    pub container_width: u32,
    pub slot_budget: u32,
    pub gap: u32,
}

impl LayoutConfig {
    pub fn row_params(&self, viewport: Viewport) -> RowParams {
        if viewport.is_mobile {
            RowParams {
                container_width: viewport.width,
                slot_budget: self.mobile_slot_width,
                gap: self.mobile_gap,
            }
        } else {
            RowParams {
                container_width: viewport.width,
                slot_budget: self.desktop_slot_width,
                gap: self.desktop_gap,
            }
        }
    }
}
