use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a content block, unique within its collection.
///
/// The backend hands out numeric ids for stored blocks and string ids for
/// drafts, so both are accepted. Ordering puts every integer before every
/// string; it is only used to break `orderIndex` ties deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockId {
    Int(i64),
    Text(String),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Int(id) => write!(f, "{id}"),
            BlockId::Text(id) => f.write_str(id),
        }
    }
}

impl BlockId {
    /// Path segments that parse as integers are integer ids.
    pub fn from_segment(segment: &str) -> Self {
        segment
            .parse::<i64>()
            .map(BlockId::Int)
            .unwrap_or_else(|_| BlockId::Text(segment.to_string()))
    }
}

impl FromStr for BlockId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BlockId::from_segment(s))
    }
}

impl From<i64> for BlockId {
    fn from(id: i64) -> Self {
        BlockId::Int(id)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        BlockId::Text(id.to_string())
    }
}

/// A single renderable unit of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub id: BlockId,
    #[serde(default)]
    pub order_index: i64,
    /// 1–5. A rating of 5 marks a hero block that always gets a row to itself.
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(flatten)]
    pub kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "blockType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    Image(ImageBlock),
    Text(TextBlock),
    Code(CodeBlock),
    Gif(GifBlock),
    Parallax(ParallaxBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    pub image_url: String,
    #[serde(default)]
    pub image_width: Option<f64>,
    #[serde(default)]
    pub image_height: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    #[default]
    Plain,
    Markdown,
    Html,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub content: String,
    #[serde(default)]
    pub format: TextFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GifBlock {
    pub gif_url: String,
    #[serde(default)]
    pub image_width: Option<f64>,
    #[serde(default)]
    pub image_height: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallaxBlock {
    pub image_url: String,
    #[serde(default)]
    pub image_width: Option<f64>,
    #[serde(default)]
    pub image_height: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ContentBlock {
    /// Intrinsic `(width, height)` for image-like blocks that carry both.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        let (width, height) = match &self.kind {
            BlockKind::Image(image) => (image.image_width, image.image_height),
            BlockKind::Gif(gif) => (gif.image_width, gif.image_height),
            BlockKind::Parallax(parallax) => (parallax.image_width, parallax.image_height),
            BlockKind::Text(_) | BlockKind::Code(_) => (None, None),
        };
        width.zip(height)
    }

    pub fn block_type(&self) -> &'static str {
        match &self.kind {
            BlockKind::Image(_) => "IMAGE",
            BlockKind::Text(_) => "TEXT",
            BlockKind::Code(_) => "CODE",
            BlockKind::Gif(_) => "GIF",
            BlockKind::Parallax(_) => "PARALLAX",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_id_accepts_numbers_and_strings() {
        let ids: Vec<BlockId> = serde_json::from_value(json!([42, "draft-7"])).unwrap();
        assert_eq!(ids, vec![BlockId::Int(42), BlockId::Text("draft-7".into())]);
    }

    #[test]
    fn test_block_id_orders_integers_first() {
        let mut ids = vec![
            BlockId::from("b"),
            BlockId::from(10),
            BlockId::from("a"),
            BlockId::from(2),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                BlockId::from(2),
                BlockId::from(10),
                BlockId::from("a"),
                BlockId::from("b")
            ]
        );
    }

    #[test]
    fn test_block_id_from_path_segment() {
        assert_eq!(BlockId::from_segment("17"), BlockId::Int(17));
        assert_eq!(BlockId::from_segment("tmp-1"), BlockId::Text("tmp-1".into()));
        assert_eq!("-3".parse::<BlockId>().unwrap(), BlockId::Int(-3));
    }

    #[test]
    fn test_deserialize_image_block_from_backend_json() {
        let block: ContentBlock = serde_json::from_value(json!({
            "id": 3,
            "blockType": "IMAGE",
            "orderIndex": 2,
            "rating": 5,
            "imageUrl": "https://cdn.example.com/a.jpg",
            "imageWidth": 6000,
            "imageHeight": 4000,
            "title": "Dunes"
        }))
        .unwrap();

        assert_eq!(block.id, BlockId::Int(3));
        assert_eq!(block.order_index, 2);
        assert_eq!(block.rating, Some(5));
        assert_eq!(block.dimensions(), Some((6000.0, 4000.0)));
        assert_eq!(block.block_type(), "IMAGE");
    }

    #[test]
    fn test_text_block_has_no_dimensions_and_default_format() {
        let block: ContentBlock = serde_json::from_value(json!({
            "id": "intro",
            "blockType": "TEXT",
            "content": "Notes from the road"
        }))
        .unwrap();

        assert_eq!(block.order_index, 0);
        assert_eq!(block.dimensions(), None);
        match block.kind {
            BlockKind::Text(text) => assert_eq!(text.format, TextFormat::Plain),
            other => panic!("expected text block, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_dimensions_are_ignored() {
        let block: ContentBlock = serde_json::from_value(json!({
            "id": 1,
            "blockType": "GIF",
            "gifUrl": "https://cdn.example.com/loop.gif",
            "imageWidth": 480
        }))
        .unwrap();
        assert_eq!(block.dimensions(), None);
    }

    #[test]
    fn test_unknown_block_type_is_rejected() {
        let result = serde_json::from_value::<ContentBlock>(json!({
            "id": 1,
            "blockType": "VIDEO"
        }));
        assert!(result.is_err());
    }
}
