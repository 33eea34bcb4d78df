//! View models for collection pages: layout rows joined with per-block render data.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::layout::engine::{Placement, RowKind};
use crate::layout::{layout_blocks, LayoutConfig, Viewport};
use crate::models::block::{BlockId, BlockKind, ContentBlock, TextFormat};
use crate::models::collection::{Collection, CollectionType};

/// Render data for one block, one variant per block type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockView {
    Image {
        src: String,
        alt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Text {
        content: String,
        format: TextFormat,
    },
    Code {
        code: String,
        language: String,
    },
    Gif {
        src: String,
        alt: String,
    },
    Parallax {
        src: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBlock {
    #[serde(flatten)]
    pub placement: Placement,
    pub block: BlockView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub kind: RowKind,
    pub height: u32,
    pub items: Vec<PlacedBlock>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionLayout {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub collection_type: CollectionType,
    pub description: Option<String>,
    pub location: Option<String>,
    pub collection_date: Option<NaiveDate>,
    pub viewport: Viewport,
    pub rows: Vec<RowView>,
}

pub fn render_block(block: &ContentBlock) -> BlockView {
    match &block.kind {
        BlockKind::Image(image) => BlockView::Image {
            src: image.image_url.clone(),
            alt: first_present(&[&image.alt, &image.title, &image.caption]),
            caption: image.caption.clone(),
        },
        BlockKind::Text(text) => BlockView::Text {
            content: text.content.clone(),
            format: text.format,
        },
        BlockKind::Code(code) => BlockView::Code {
            code: code.code.clone(),
            language: code.language.clone().unwrap_or_else(|| "text".to_string()),
        },
        BlockKind::Gif(gif) => BlockView::Gif {
            src: gif.gif_url.clone(),
            alt: first_present(&[&gif.title]),
        },
        BlockKind::Parallax(parallax) => BlockView::Parallax {
            src: parallax.image_url.clone(),
            title: parallax.title.clone(),
        },
    }
}

/// Lays out a collection's blocks and attaches render data to every placement.
pub fn build_collection_layout(
    collection: &Collection,
    viewport: Viewport,
    config: &LayoutConfig,
) -> CollectionLayout {
    let rows = layout_blocks(
        &collection.blocks,
        viewport,
        collection.cover_image_id.as_ref(),
        config,
    );

    let blocks_by_id: HashMap<&BlockId, &ContentBlock> = collection
        .blocks
        .iter()
        .map(|block| (&block.id, block))
        .collect();

    let rows = rows
        .into_iter()
        .map(|row| RowView {
            kind: row.kind,
            height: row.height,
            items: row
                .items
                .into_iter()
                .filter_map(|placement| {
                    let block = blocks_by_id.get(&placement.id)?;
                    Some(PlacedBlock {
                        block: render_block(block),
                        placement,
                    })
                })
                .collect(),
        })
        .collect();

    CollectionLayout {
        id: collection.id,
        slug: collection.slug.clone(),
        title: collection.title.clone(),
        collection_type: collection.collection_type,
        description: collection.description.clone(),
        location: collection.location.clone(),
        collection_date: collection.collection_date,
        viewport,
        rows,
    }
}

fn first_present(candidates: &[&Option<String>]) -> String {
    candidates
        .iter()
        .filter_map(|value| value.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}
