//! CPU mirror of the fragment-stage blend.
//!
//! The shader is the source of truth on screen; this module evaluates the
//! same curves on the host so the response can be checked without a GPU.

/// Neutral colour used wherever the warped target lookup leaves `[0, 1]`.
pub const NEUTRAL_GREY: Rgba = Rgba::new(0.5, 0.5, 0.5, 1.0);

/// Linear RGBA colour with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

/// Logistic curve `1 / (1 + e^(-k (x - x0)))`.
pub fn logistic(x: f32, steepness: f32, center: f32) -> f32 {
    1.0 / (1.0 + (-steepness * (x - center)).exp())
}

/// Mid-centred curve driving the green channel.
pub fn logistic_half(x: f32) -> f32 {
    logistic(x, 6.0, 0.5)
}

/// Quarter-centred curve driving the red and blue channels.
pub fn logistic_quarter(x: f32) -> f32 {
    logistic(x, 12.0, 0.25)
}

/// Weights applied to the target per output channel for a given ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendWeights {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl BlendWeights {
    pub fn at(ratio: f32) -> Self {
        Self {
            red: 1.0 - logistic_quarter(1.0 - ratio),
            green: logistic_half(ratio),
            blue: logistic_quarter(ratio),
        }
    }
}

/// Blend `src` and `dst` for `ratio`.
///
/// Output red is mixed from the inputs' blue channels and output blue from
/// their red channels; green stays in place. Alpha is always opaque.
pub fn blend(src: Rgba, dst: Rgba, ratio: f32) -> Rgba {
    let w = BlendWeights::at(ratio);
    Rgba::opaque(
        w.red * dst.b + (1.0 - w.red) * src.b,
        w.green * dst.g + (1.0 - w.green) * src.g,
        w.blue * dst.r + (1.0 - w.blue) * src.r,
    )
}

/// Full fragment output: the source alone when no target is bound.
pub fn shade(src: Rgba, dst: Option<Rgba>, ratio: f32) -> Rgba {
    match dst {
        Some(dst) => blend(src, dst, ratio),
        None => src,
    }
}
