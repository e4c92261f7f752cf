//! Widget configuration read from the canvas `data-*` attributes.

use std::str::FromStr;

use crate::error::OverlayError;

pub const CANVAS_ID: &str = "overlay";
pub const SOURCE_IMAGE_ID: &str = "sourceimage";
pub const TARGET_IMAGE_ID: &str = "targetimage";
pub const SOURCE_LINK_ID: &str = "sourcelink";
pub const TARGET_LINK_ID: &str = "targetlink";
pub const RADIO_GROUP: &str = "match";

/// Which overlay the page hosts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    /// Both images share one frame; radio buttons swap the target.
    #[default]
    Aligned,
    /// Target is warped by a homography fetched per page pair.
    Projective,
}

impl FromStr for Variant {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aligned" | "a" => Ok(Self::Aligned),
            "projective" | "homography" | "b" => Ok(Self::Projective),
            other => Err(OverlayError::UnknownVariant(other.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayConfig {
    pub variant: Variant,
    /// Page id for aligned match paths.
    pub page_id: Option<String>,
    pub match_root: String,
    pub pagepair_url: String,
    pub image_root: String,
    pub book_url: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Aligned,
            page_id: None,
            match_root: "../match".to_owned(),
            pagepair_url: "/pagepair".to_owned(),
            image_root: "/static/pages".to_owned(),
            book_url: "../book".to_owned(),
        }
    }
}

impl OverlayConfig {
    /// Build from an attribute lookup; `attr("variant")` reads
    /// `data-variant` in the browser. Missing or empty entries keep their
    /// defaults.
    pub fn from_attributes<F>(attr: F) -> Result<Self, OverlayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| attr(name).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();
        if let Some(v) = get("variant") {
            cfg.variant = v.parse()?;
        }
        cfg.page_id = get("page-id");
        if let Some(v) = get("match-root") {
            cfg.match_root = v;
        }
        if let Some(v) = get("pagepair-url") {
            cfg.pagepair_url = v;
        }
        if let Some(v) = get("image-root") {
            cfg.image_root = v;
        }
        if let Some(v) = get("book-url") {
            cfg.book_url = v;
        }
        Ok(cfg)
    }
}
