//! Row packer: partitions ordered content blocks into rows that fill the
//! container width exactly.
//!
//! # Algorithm
//! 1. Sort by `(orderIndex, id)`, then run the optional pattern pass.
//! 2. Hero blocks (rating 5) and the cover block flush the pending row and are
//!    emitted on their own.
//! 3. Every other block contributes its aspect ratio as slot weight (a square
//!    image is one slot). Weights accumulate as exact fractions.
//! 4. When `pending + weight` reaches the slot budget the row closes. The
//!    candidate joins the closing row unless that would overflow by more than
//!    one slot, in which case it opens the next row.
//! 5. The trailing partial row is emitted and scaled to full width as well.
//! 6. On narrow containers a row also closes once another gap would leave its
//!    blocks no width, so `(n−1)·gap < W` holds for every row.
//!
//! A block that is both the cover and rated 5 gets the cover row.
//!
//! # Row fitting
//! For a row of `n` blocks with ratios `r_i`, the shared height is
//! `H = (W − (n−1)·G) / Σ r_i`. Block widths are taken from rounded cumulative
//! edges so each width is within a pixel of `r_i · H` and the widths always sum
//! to the available width exactly.
//!
//! The packer is a pure function: no I/O, no shared state, and identical input
//! always yields identical output.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::constants::{LayoutConfig, RowParams, Viewport};
use crate::layout::fraction::Fraction;
use crate::layout::pattern::apply_pattern_pass;
use crate::models::block::{BlockId, ContentBlock};

/// Rating that promotes a block to a full-width hero row.
pub const HERO_RATING: u8 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Packer input: the layout-relevant projection of a content block.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    pub id: BlockId,
    pub order_index: i64,
    /// Width over height, already reduced.
    pub aspect: Fraction,
    pub rating: Option<u8>,
    pub is_cover: bool,
}

impl LayoutItem {
    pub fn is_hero(&self) -> bool {
        self.rating == Some(HERO_RATING)
    }

    pub fn is_portrait(&self) -> bool {
        self.aspect < Fraction::ONE
    }

    /// False for blocks that always get a row to themselves.
    pub(crate) fn packs(&self) -> bool {
        !self.is_hero() && !self.is_cover
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Standard,
    Hero,
    Cover,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: BlockId,
    pub render_width: u32,
    pub render_height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub kind: RowKind,
    pub height: u32,
    pub items: Vec<Placement>,
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Lays out content blocks for a viewport. `cover_id` marks the header block.
pub fn layout_blocks(
    blocks: &[ContentBlock],
    viewport: Viewport,
    cover_id: Option<&BlockId>,
    config: &LayoutConfig,
) -> Vec<Row> {
    let items = items_from_blocks(blocks, cover_id, config);
    pack_rows(&items, config.row_params(viewport), config)
}

/// Projects content blocks onto packer input.
///
/// Blocks without intrinsic dimensions take the configured default size;
/// malformed dimensions degrade to a square.
pub fn items_from_blocks(
    blocks: &[ContentBlock],
    cover_id: Option<&BlockId>,
    config: &LayoutConfig,
) -> Vec<LayoutItem> {
    blocks
        .iter()
        .map(|block| {
            let (width, height) = block
                .dimensions()
                .unwrap_or((config.default_image_width, config.default_image_height));
            LayoutItem {
                id: block.id.clone(),
                order_index: block.order_index,
                aspect: Fraction::from_dimensions(width, height),
                rating: block.rating,
                is_cover: cover_id == Some(&block.id),
            }
        })
        .collect()
}

/// Partitions `items` into rows. Every item appears in exactly one row.
pub fn pack_rows(items: &[LayoutItem], params: RowParams, config: &LayoutConfig) -> Vec<Row> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&LayoutItem> = items.iter().collect();
    ordered.sort_by(|a, b| {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| a.id.cmp(&b.id))
    });
    if config.pattern_reordering {
        apply_pattern_pass(
            &mut ordered,
            config.pattern_window_size,
            config.pattern_max_movement,
        );
    }

    let budget = Fraction::whole(i64::from(params.slot_budget));
    let tolerance = Fraction::whole(i64::from(params.slot_budget) + 1);

    let mut packer = RowPacker::new(params);
    for item in ordered {
        if item.is_cover {
            packer.close();
            packer.rows.push(cover_row(item, params, config));
            continue;
        }
        if item.is_hero() {
            packer.close();
            packer.rows.push(hero_row(item, params));
            continue;
        }

        if !packer.gap_fits() {
            packer.close();
        }

        let combined = packer.weight + item.aspect;
        if combined < budget {
            packer.push(item);
            continue;
        }

        if packer.pending.is_empty() || combined <= tolerance {
            packer.push(item);
            packer.close();
        } else {
            packer.close();
            packer.push(item);
            if item.aspect >= budget {
                packer.close();
            }
        }
    }
    packer.close();

    debug!(
        blocks = items.len(),
        rows = packer.rows.len(),
        container_width = params.container_width,
        slot_budget = params.slot_budget,
        "Packed content blocks into rows"
    );

    packer.rows
}

// ────────────────────────────────────────────────────────────────────────────
// Packing state
// ────────────────────────────────────────────────────────────────────────────

struct RowPacker<'a> {
    params: RowParams,
    pending: Vec<&'a LayoutItem>,
    weight: Fraction,
    rows: Vec<Row>,
}

impl<'a> RowPacker<'a> {
    fn new(params: RowParams) -> Self {
        RowPacker {
            params,
            pending: Vec::new(),
            weight: Fraction::ZERO,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, item: &'a LayoutItem) {
        self.weight = self.weight + item.aspect;
        self.pending.push(item);
    }

    /// True while one more block, and the gap in front of it, leaves the
    /// row's blocks at least one pixel of width to share.
    fn gap_fits(&self) -> bool {
        let gaps = u64::from(self.params.gap) * self.pending.len() as u64;
        gaps < u64::from(self.params.container_width)
    }

    /// Emits the pending row, if any, scaled to the container width.
    fn close(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.rows.push(fill_row(&self.pending, self.params));
        self.pending.clear();
        self.weight = Fraction::ZERO;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Row fitting
// ────────────────────────────────────────────────────────────────────────────

/// Solves the shared row height and assigns per-block widths.
fn fill_row(items: &[&LayoutItem], params: RowParams) -> Row {
    let count = items.len();
    let gaps = params.gap.saturating_mul(count.saturating_sub(1) as u32);
    let available = i64::from(params.container_width.saturating_sub(gaps));

    let total = items
        .iter()
        .fold(Fraction::ZERO, |acc, item| acc + item.aspect);
    if total <= Fraction::ZERO {
        return equal_division(items, available);
    }

    let height = to_px(total.invert().scale_round(available));
    let share = total.invert();

    let mut prefix = Fraction::ZERO;
    let mut left_edge = 0_i64;
    let placements = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            prefix = prefix + item.aspect;
            let right_edge = if i + 1 == count {
                available
            } else {
                (prefix * share).scale_round(available)
            };
            let width = right_edge - left_edge;
            left_edge = right_edge;
            Placement {
                id: item.id.clone(),
                render_width: to_px(width),
                render_height: height,
            }
        })
        .collect();

    Row {
        kind: RowKind::Standard,
        height,
        items: placements,
    }
}

/// Fallback when the row's ratios sum to nothing usable: equal square cells.
fn equal_division(items: &[&LayoutItem], available: i64) -> Row {
    let count = items.len() as i64;
    let cell = Fraction::new(1, count).scale_round(available);
    let height = to_px(cell);

    let mut left_edge = 0_i64;
    let placements = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let right_edge = Fraction::new(i as i64 + 1, count).scale_round(available);
            let width = right_edge - left_edge;
            left_edge = right_edge;
            Placement {
                id: item.id.clone(),
                render_width: to_px(width),
                render_height: height,
            }
        })
        .collect();

    Row {
        kind: RowKind::Standard,
        height,
        items: placements,
    }
}

/// Full-width row, height from the block's own ratio.
fn hero_row(item: &LayoutItem, params: RowParams) -> Row {
    let width = params.container_width;
    let height = to_px(item.aspect.invert().scale_round(i64::from(width)));
    Row {
        kind: RowKind::Hero,
        height,
        items: vec![Placement {
            id: item.id.clone(),
            render_width: width,
            render_height: height,
        }],
    }
}

/// Full-width header row. The image is cropped to a ratio inside the cover
/// clamps and the row never exceeds `header_row_height_ratio × width`.
fn cover_row(item: &LayoutItem, params: RowParams, config: &LayoutConfig) -> Row {
    let (low, high) = if config.header_cover_min_ratio <= config.header_cover_max_ratio {
        (config.header_cover_min_ratio, config.header_cover_max_ratio)
    } else {
        (config.header_cover_max_ratio, config.header_cover_min_ratio)
    };
    let ratio = item.aspect.to_f64().max(low).min(high);

    let width = f64::from(params.container_width);
    let height = (width / ratio)
        .min(width * config.header_row_height_ratio)
        .max(0.0)
        .round() as u32;

    Row {
        kind: RowKind::Cover,
        height,
        items: vec![Placement {
            id: item.id.clone(),
            render_width: params.container_width,
            render_height: height,
        }],
    }
}

fn to_px(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
