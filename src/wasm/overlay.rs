use web_sys::{
    HtmlCanvasElement, HtmlImageElement, MouseEvent, WebGl2RenderingContext as GL, WebGlProgram,
    WebGlTexture, WebGlUniformLocation,
};

use crate::error::OverlayError;
use crate::homography::Homography;
use crate::shader;
use crate::tracking::{pointer_ratio, TrackingState};

use super::render::{self, Quad, SOURCE_UNIT, TARGET_UNIT};

/// Ratio every (re)initialisation starts from.
pub const INITIAL_RATIO: f32 = 0.5;

/// Owns the GPU program and the interaction state of one overlay canvas.
///
/// Dropping the controller releases its program, geometry and textures.
pub struct OverlayController {
    gl: GL,
    canvas: HtmlCanvasElement,
    program: WebGlProgram,
    quad: Quad,
    source: WebGlTexture,
    target: Option<WebGlTexture>,
    u_ratio: Option<WebGlUniformLocation>,
    u_dst_exists: Option<WebGlUniformLocation>,
    ratio: f32,
    state: TrackingState,
}

impl OverlayController {
    /// One-time setup for a canvas. `homography` selects the projective
    /// program; `None` builds the aligned one.
    ///
    /// The target is bound only if its element already has a loaded image.
    pub fn init(
        gl: GL,
        canvas: HtmlCanvasElement,
        source: &HtmlImageElement,
        target: &HtmlImageElement,
        homography: Option<Homography>,
    ) -> Result<Self, OverlayError> {
        let fragment = if homography.is_some() {
            shader::FRAGMENT_PROJECTIVE
        } else {
            shader::FRAGMENT_ALIGNED
        };
        let program = render::link_program(&gl, shader::VERTEX, fragment)?;
        gl.use_program(Some(&program));
        gl.viewport(0, 0, canvas.width() as i32, canvas.height() as i32);

        let quad = Quad::new(&gl, &program, shader::ATTR_VERTEX, shader::ATTR_UV)?;

        let src_sampler = render::uniform(&gl, &program, shader::U_SRC_SAMPLER);
        gl.uniform1i(src_sampler.as_ref(), SOURCE_UNIT as i32);
        let source_tex = render::upload_texture(&gl, SOURCE_UNIT, source)?;

        let dst_sampler = render::uniform(&gl, &program, shader::U_DST_SAMPLER);
        gl.uniform1i(dst_sampler.as_ref(), TARGET_UNIT as i32);
        let u_dst_exists = render::uniform(&gl, &program, shader::U_DST_EXISTS);
        let target_tex = if has_loaded_source(target) {
            Some(render::upload_texture(&gl, TARGET_UNIT, target)?)
        } else {
            None
        };
        gl.uniform1i(u_dst_exists.as_ref(), i32::from(target_tex.is_some()));

        if let Some(h) = homography {
            let h = h.scaled_to_canvas(canvas.width(), canvas.height());
            let u_h = render::uniform(&gl, &program, shader::U_HOMOGRAPHY);
            gl.uniform_matrix3fv_with_f32_array(u_h.as_ref(), true, h.as_array());
            log::debug!("homography {h}");
        }

        let u_ratio = render::uniform(&gl, &program, shader::U_RATIO);

        let mut controller = Self {
            gl,
            canvas,
            program,
            quad,
            source: source_tex,
            target: target_tex,
            u_ratio,
            u_dst_exists,
            ratio: INITIAL_RATIO,
            state: TrackingState::default(),
        };
        controller.apply_border()?;
        controller.set_ratio(INITIAL_RATIO);
        log::info!(
            "overlay ready ({}x{}, {}, target {})",
            controller.canvas.width(),
            controller.canvas.height(),
            if homography.is_some() { "projective" } else { "aligned" },
            if controller.target.is_some() { "bound" } else { "absent" },
        );
        Ok(controller)
    }

    /// Swap the target texture for a freshly loaded image and reset the
    /// ratio. Program and geometry are kept.
    pub fn update_overlay(&mut self, image: &HtmlImageElement) -> Result<(), OverlayError> {
        self.gl.use_program(Some(&self.program));
        let texture = render::upload_texture(&self.gl, TARGET_UNIT, image)?;
        if let Some(old) = self.target.replace(texture) {
            self.gl.delete_texture(Some(&old));
        }
        self.gl.uniform1i(self.u_dst_exists.as_ref(), 1);
        self.set_ratio(INITIAL_RATIO);
        Ok(())
    }

    pub fn handle_pointer_move(&mut self, event: &MouseEvent) {
        if !self.state.accepts_pointer() {
            return;
        }
        // Re-read every event; the canvas may have scrolled or resized.
        let rect = self.canvas.get_bounding_client_rect();
        let ratio = pointer_ratio(f64::from(event.client_x()), rect.left(), self.canvas.width());
        self.set_ratio(ratio);
    }

    pub fn handle_click(&mut self) -> Result<(), OverlayError> {
        self.state = self.state.toggled();
        log::debug!("overlay {:?}", self.state);
        self.apply_border()
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
        self.gl.uniform1f(self.u_ratio.as_ref(), ratio);
        self.draw();
    }

    fn draw(&self) {
        self.quad.draw(&self.gl);
    }

    fn apply_border(&self) -> Result<(), OverlayError> {
        let border = self.state.border();
        let style = self.canvas.style();
        style.set_property("border-style", border.style)?;
        style.set_property("border-color", border.color)?;
        Ok(())
    }
}

impl Drop for OverlayController {
    fn drop(&mut self) {
        self.quad.delete(&self.gl);
        self.gl.delete_texture(Some(&self.source));
        if let Some(target) = &self.target {
            self.gl.delete_texture(Some(target));
        }
        self.gl.delete_program(Some(&self.program));
    }
}

/// `true` once the element has finished loading a real image.
pub fn has_loaded_source(image: &HtmlImageElement) -> bool {
    !image.current_src().is_empty() && image.complete() && image.natural_width() > 0
}
