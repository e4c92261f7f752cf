//! GLSL ES 3.00 sources for the overlay program.
//!
//! Attribute and uniform names here are looked up by name in
//! `wasm::render` and `wasm::overlay`.

pub const ATTR_VERTEX: &str = "aVertex";
pub const ATTR_UV: &str = "aUV";

pub const U_SRC_SAMPLER: &str = "srcSampler";
pub const U_DST_SAMPLER: &str = "dstSampler";
pub const U_DST_EXISTS: &str = "uDstExists";
pub const U_RATIO: &str = "uRatio";
pub const U_HOMOGRAPHY: &str = "uHomography";

/// Passes the unit quad straight to clip space.
pub const VERTEX: &str = r#"#version 300 es
in vec2 aVertex;
in vec2 aUV;
out vec2 vTex;
void main(void) {
    gl_Position = vec4(aVertex, 0.0, 1.0);
    vTex = aUV;
}
"#;

// Shared by both fragment stages; must stay in step with `crate::blend`.
macro_rules! fragment_prelude {
    () => {
        r#"#version 300 es
precision mediump float;
in vec2 vTex;
uniform sampler2D srcSampler;
uniform sampler2D dstSampler;
uniform bool uDstExists;
uniform float uRatio;
out vec4 fragColor;
const vec4 NEUTRAL_GREY = vec4(0.5, 0.5, 0.5, 1.0);
float logistic_half(float x) {
    return 1.0 / (1.0 + exp(-6.0 * (x - 0.5)));
}
float logistic_quarter(float x) {
    return 1.0 / (1.0 + exp(-12.0 * (x - 0.25)));
}
vec4 blend(vec4 src, vec4 dst, float ratio) {
    float ratio_h = logistic_half(ratio);
    float ratio_q = logistic_quarter(ratio);
    float nratio_q = logistic_quarter(1.0 - ratio);
    return vec4(
        ((1.0 - nratio_q) * dst.z) + (nratio_q * src.z),
        (ratio_h * dst.y) + ((1.0 - ratio_h) * src.y),
        (ratio_q * dst.x) + ((1.0 - ratio_q) * src.x),
        1.0);
}
"#
    };
}

/// Target read at the same UV as the source.
pub const FRAGMENT_ALIGNED: &str = concat!(
    fragment_prelude!(),
    r#"
void main(void) {
    vec2 texPos = vec2(vTex.x, vTex.y * -1.0 + 1.0);
    vec4 src = texture(srcSampler, texPos);
    if (uDstExists) {
        vec4 dst = texture(dstSampler, texPos);
        fragColor = blend(src, dst, uRatio);
    } else {
        fragColor = src;
    }
}
"#
);

/// Target resampled through `uHomography` before blending.
pub const FRAGMENT_PROJECTIVE: &str = concat!(
    fragment_prelude!(),
    r#"
uniform mat3 uHomography;
vec4 warpedTarget(vec2 texPos) {
    vec3 p = uHomography * vec3(texPos, 1.0);
    if (abs(p.z) < 1e-6) {
        return NEUTRAL_GREY;
    }
    vec2 dstPos = p.xy / p.z;
    if (any(lessThan(dstPos, vec2(0.0))) || any(greaterThan(dstPos, vec2(1.0)))) {
        return NEUTRAL_GREY;
    }
    return texture(dstSampler, dstPos);
}
void main(void) {
    vec2 texPos = vec2(vTex.x, vTex.y * -1.0 + 1.0);
    vec4 src = texture(srcSampler, texPos);
    if (uDstExists) {
        fragColor = blend(src, warpedTarget(texPos), uRatio);
    } else {
        fragColor = src;
    }
}
"#
);
