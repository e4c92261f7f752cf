//! Crate-level error types.

use std::fmt;

/// Errors produced while setting up or driving the overlay.
#[derive(Debug)]
pub enum OverlayError {
    /// Required DOM element is absent or of the wrong type.
    MissingElement(&'static str),
    /// Canvas could not provide a WebGL2 context.
    NoWebGl,
    /// `create*` call on the context returned nothing.
    Resource(&'static str),
    /// Shader stage failed to compile.
    ShaderCompile { stage: &'static str, log: String },
    /// Program failed to link.
    ProgramLink(String),
    /// An image element fired `error`.
    ImageLoad(String),
    /// Non-success HTTP status.
    Http { url: String, status: u16 },
    /// Page-pair body did not match the expected JSON shape.
    PairFormat(serde_json::Error),
    /// Homography did not have nine entries.
    HomographyLength(usize),
    /// Aligned overlay without a page id.
    MissingPageId,
    /// `data-variant` value not recognised.
    UnknownVariant(String),
    /// Any other exception thrown by a browser API.
    Js(String),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(id) => write!(f, "element `{id}` not found"),
            Self::NoWebGl => write!(f, "WebGL2 not supported"),
            Self::Resource(what) => write!(f, "failed to create {what}"),
            Self::ShaderCompile { stage, log } => {
                write!(f, "{stage} shader failed to compile: {log}")
            }
            Self::ProgramLink(log) => write!(f, "program failed to link: {log}"),
            Self::ImageLoad(url) => write!(f, "failed to load image {url}"),
            Self::Http { url, status } => write!(f, "GET {url} returned {status}"),
            Self::PairFormat(e) => write!(f, "malformed page pair: {e}"),
            Self::HomographyLength(n) => {
                write!(f, "homography needs 9 entries, got {n}")
            }
            Self::MissingPageId => write!(f, "no page id configured"),
            Self::UnknownVariant(v) => write!(f, "unknown overlay variant `{v}`"),
            Self::Js(msg) => write!(f, "javascript error: {msg}"),
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PairFormat(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OverlayError {
    fn from(e: serde_json::Error) -> Self {
        Self::PairFormat(e)
    }
}

#[cfg(target_arch = "wasm32")]
mod js {
    use wasm_bindgen::JsValue;

    use super::OverlayError;

    impl From<JsValue> for OverlayError {
        fn from(value: JsValue) -> Self {
            let msg = value
                .as_string()
                .or_else(|| {
                    js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                        .ok()
                        .and_then(|m| m.as_string())
                })
                .unwrap_or_else(|| format!("{value:?}"));
            Self::Js(msg)
        }
    }

    impl From<OverlayError> for JsValue {
        fn from(e: OverlayError) -> Self {
            js_sys::Error::new(&e.to_string()).into()
        }
    }
}
