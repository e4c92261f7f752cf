use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, HtmlImageElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::OverlayError;

/// Texture unit holding the source scan.
pub const SOURCE_UNIT: u32 = 0;
/// Texture unit holding the target scan.
pub const TARGET_UNIT: u32 = 1;

/// Unit quad drawn as a triangle fan.
pub const QUAD_VERTICES: [f32; 8] = [-1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0];
pub const QUAD_UVS: [f32; 8] = [0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0];

pub fn context(canvas: &HtmlCanvasElement) -> Result<GL, OverlayError> {
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or(OverlayError::NoWebGl)?
        .dyn_into()
        .map_err(|_| OverlayError::NoWebGl)?;
    Ok(gl)
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, OverlayError> {
    let shader = gl
        .create_shader(kind)
        .ok_or(OverlayError::Resource("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        let stage = if kind == GL::VERTEX_SHADER { "vertex" } else { "fragment" };
        Err(OverlayError::ShaderCompile { stage, log })
    }
}

/// Compile both stages and link them; failures are reported with the
/// driver's info log.
pub fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, OverlayError> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = match compile_shader(gl, GL::FRAGMENT_SHADER, fragment) {
        Ok(fs) => fs,
        Err(e) => {
            gl.delete_shader(Some(&vs));
            return Err(e);
        }
    };
    let program = gl
        .create_program()
        .ok_or(OverlayError::Resource("program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);

    // Shaders are owned by the program once linked.
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(OverlayError::ProgramLink(log))
    }
}

/// Upload `data` once into a new `STATIC_DRAW` array buffer.
pub fn create_static_buffer(gl: &GL, data: &[f32]) -> Result<WebGlBuffer, OverlayError> {
    let buffer = gl
        .create_buffer()
        .ok_or(OverlayError::Resource("buffer"))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let view = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    Ok(buffer)
}

fn bind_buffer_to_attrib(gl: &GL, program: &WebGlProgram, buffer: &WebGlBuffer, name: &str) {
    let location = gl.get_attrib_location(program, name);
    if location < 0 {
        // Optimised out by the compiler; nothing to feed.
        log::warn!("attribute {name} not active");
        return;
    }
    let location = location as u32;
    gl.enable_vertex_attrib_array(location);
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    gl.vertex_attrib_pointer_with_i32(location, 2, GL::FLOAT, false, 0, 0);
}

/// Static quad geometry bound to the program's two vec2 attributes.
pub struct Quad {
    vao: WebGlVertexArrayObject,
    vertices: WebGlBuffer,
    uvs: WebGlBuffer,
}

impl Quad {
    pub fn new(
        gl: &GL,
        program: &WebGlProgram,
        vertex_attrib: &str,
        uv_attrib: &str,
    ) -> Result<Self, OverlayError> {
        let vao = gl
            .create_vertex_array()
            .ok_or(OverlayError::Resource("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let vertices = create_static_buffer(gl, &QUAD_VERTICES)?;
        let uvs = create_static_buffer(gl, &QUAD_UVS)?;
        bind_buffer_to_attrib(gl, program, &vertices, vertex_attrib);
        bind_buffer_to_attrib(gl, program, &uvs, uv_attrib);
        Ok(Self { vao, vertices, uvs })
    }

    pub fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLE_FAN, 0, 4);
    }

    pub fn delete(&self, gl: &GL) {
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.vertices));
        gl.delete_buffer(Some(&self.uvs));
    }
}

/// Copy `image` into a fresh texture bound to `unit`.
///
/// Nearest filtering and clamp-to-edge keep scan pixels crisp and stop the
/// border from bleeding into the opposite edge.
pub fn upload_texture(
    gl: &GL,
    unit: u32,
    image: &HtmlImageElement,
) -> Result<WebGlTexture, OverlayError> {
    let texture = gl
        .create_texture()
        .ok_or(OverlayError::Resource("texture"))?;
    gl.active_texture(GL::TEXTURE0 + unit);
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::NEAREST as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::NEAREST as i32);
    gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
        GL::TEXTURE_2D,
        0,
        GL::RGB as i32,
        GL::RGB,
        GL::UNSIGNED_BYTE,
        image,
    )?;
    Ok(texture)
}

pub fn uniform(gl: &GL, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
    let location = gl.get_uniform_location(program, name);
    if location.is_none() {
        log::debug!("uniform {name} not active");
    }
    location
}
