use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::block::{BlockId, ContentBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionType {
    Blog,
    ArtGallery,
    Portfolio,
    Catalog,
    ClientGallery,
}

impl CollectionType {
    pub const ALL: [CollectionType; 5] = [
        CollectionType::Blog,
        CollectionType::ArtGallery,
        CollectionType::Portfolio,
        CollectionType::Catalog,
        CollectionType::ClientGallery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::Blog => "BLOG",
            CollectionType::ArtGallery => "ART_GALLERY",
            CollectionType::Portfolio => "PORTFOLIO",
            CollectionType::Catalog => "CATALOG",
            CollectionType::ClientGallery => "CLIENT_GALLERY",
        }
    }
}

fn default_visible() -> bool {
    true
}

/// An ordered set of content blocks: a blog post, gallery, portfolio or catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub collection_type: CollectionType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub collection_date: Option<NaiveDate>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Block rendered as the header row of the collection page.
    #[serde(default)]
    pub cover_image_id: Option<BlockId>,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

/// Listing entry returned by the collection index endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub collection_type: CollectionType,
    #[serde(default)]
    pub collection_date: Option<NaiveDate>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub cover_image_id: Option<BlockId>,
    #[serde(default)]
    pub block_count: u32,
}

/// Partial metadata update sent to the backend. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<CollectionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// New position of one block in a reorder request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockOrder {
    pub id: BlockId,
    pub order_index: i64,
}

/// Editable metadata of an image-like block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}
