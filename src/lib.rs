//! Blend overlay for comparing two scans of a document page in a WebGL2
//! canvas. Horizontal pointer position fades from the source scan to the
//! target; the projective variant warps the target through a homography
//! first.
//!
//! Everything outside [`wasm`] is plain Rust and builds on the host.

pub mod blend;
pub mod cancel;
pub mod config;
pub mod error;
pub mod homography;
pub mod pair;
pub mod shader;
pub mod tracking;

pub use error::OverlayError;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    pub mod loader;
    pub mod overlay;
    pub mod page;
    pub mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // A second init (e.g. a test harness already installed a logger) is harmless.
        let _ = console_log::init_with_level(log::Level::Info);

        page::bootstrap()?;
        Ok(())
    }
}
