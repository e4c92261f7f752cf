//! Page-pair metadata served by `GET /pagepair/{id}`.

use serde::{Deserialize, Serialize};

use crate::error::OverlayError;
use crate::homography::Homography;

/// Two scans of the same page and the homography relating them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PagePair {
    // Book and page ids are integer primary keys on the server; a body that
    // quotes them is rejected as `PairFormat`.
    pub firstbook: u64,
    pub firstpage: u32,
    pub secondbook: u64,
    pub secondpage: u32,
    /// Source image filename.
    pub first: String,
    /// Target image filename.
    pub second: String,
    pub homography: Homography,
}

/// Text and URL for one of the citation links next to the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Citation {
    pub text: String,
    pub href: String,
}

impl PagePair {
    pub fn from_json(body: &str) -> Result<Self, OverlayError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn source_url(&self, image_root: &str) -> String {
        image_url(image_root, &self.first)
    }

    pub fn target_url(&self, image_root: &str) -> String {
        image_url(image_root, &self.second)
    }

    pub fn source_citation(&self, book_url: &str) -> Citation {
        citation(book_url, self.firstbook, self.firstpage)
    }

    pub fn target_citation(&self, book_url: &str) -> Citation {
        citation(book_url, self.secondbook, self.secondpage)
    }
}

/// `GET` URL for one pair.
pub fn pair_url(endpoint: &str, id: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), id)
}

/// Leading segment of an image filename, up to the first `_`.
pub fn filename_prefix(filename: &str) -> &str {
    let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
    stem.split_once('_').map_or(stem, |(prefix, _)| prefix)
}

/// Static path of a page image: `{root}/{prefix}/{filename}`.
pub fn image_url(root: &str, filename: &str) -> String {
    format!(
        "{}/{}/{}",
        root.trim_end_matches('/'),
        filename_prefix(filename),
        filename
    )
}

/// Relative path of a match image for the aligned overlay.
pub fn match_url(match_root: &str, page_id: &str, value: &str) -> String {
    format!("{}/{}/{}", match_root.trim_end_matches('/'), page_id, value)
}

fn citation(book_url: &str, book: u64, page: u32) -> Citation {
    Citation {
        text: format!("{book} p. {page}"),
        href: format!("{}/{}", book_url.trim_end_matches('/'), book),
    }
}
