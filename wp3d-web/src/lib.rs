//! WP3D Web - WebGL2 renderer for the built-in mesh.
//!
//! Thin glue between `wp3d-core` and the browser: context/shader/buffer
//! bootstrap, DOM form-input reading, per-frame uniform upload and draw.
//! The page drives `WebRenderer::render` from `requestAnimationFrame`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlCanvasElement, HtmlInputElement, WebGl2RenderingContext, WebGlBuffer,
    WebGlProgram, WebGlShader, WebGlUniformLocation, Window,
};
use wp3d_core::scene::to_vec4;
use wp3d_core::{FrameMatrices, Mesh, SceneParams};
use wp3d_core::{CameraParams, LightParams, MaterialParams, ModelParams};

/// Phong vertex shader. Matrix multiplications take the vertex as a row
/// vector on the left, matching the column-major storage `Matrix::get()`
/// uploads.
const VERTEX_SHADER_CODE: &str = r"#version 300 es
layout (location = 0) in vec4 inPosition;
layout (location = 1) in vec4 inNormal;
uniform mat4 uniWorld;
uniform mat4 uniView;
uniform mat4 uniProj;
uniform mat4 uniWorldIT;
uniform vec4 uniCameraPosition;
uniform vec4 uniLightPosition;
uniform vec4 uniLightAmbient;
uniform vec4 uniLightDiffuse;
uniform vec4 uniLightSpecular;
uniform vec4 uniModelAmbient;
uniform vec4 uniModelDiffuse;
uniform vec4 uniModelSpecular;
uniform float uniModelShininess;
out vec4 bridgeColor;
void main() {
  vec4 position = inPosition * uniWorld;
  vec4 normal = inNormal * uniWorldIT;
  gl_Position = position * uniView * uniProj;
  vec3 vecNormal = vec3(normal.xyz);
  vec3 vecToLight = normalize(uniLightPosition.xyz - position.xyz);
  vec3 vecToCamera = normalize(uniCameraPosition.xyz - position.xyz);
  vec3 vecReflect = normalize(-vecToLight + 2.0 * (dot(vecToLight, vecNormal) * vecNormal));
  float cosDiffuseAngle = dot(vecNormal, vecToLight);
  float cosDiffuseAngleClamp = clamp(cosDiffuseAngle, 0.0, 1.0);
  float cosReflectAngle = dot(vecToCamera, vecReflect);
  float cosReflectAngleClamp = clamp(cosReflectAngle, 0.0, 1.0);
  vec3 color =
    uniModelAmbient.xyz * uniLightAmbient.xyz
    + uniModelDiffuse.xyz * cosDiffuseAngleClamp * uniLightDiffuse.xyz
    + uniModelSpecular.xyz * pow(cosReflectAngleClamp, uniModelShininess) * uniLightSpecular.xyz;
  bridgeColor = vec4(color, 1.0);
}";

const FRAGMENT_SHADER_CODE: &str = r"#version 300 es
precision highp float;
in vec4 bridgeColor;
out vec4 outColor;
void main() {
  outColor = bridgeColor;
}";

const IN_POSITION_LOCATION: u32 = 0;
const IN_NORMAL_LOCATION: u32 = 1;
const FLOATS_PER_VERTEX: i32 = 8;

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn compile_shader(
    gl: &WebGl2RenderingContext,
    kind: u32,
    code: &str,
) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| js_error(format!("failed to create a shader: {kind}")))?;
    gl.shader_source(&shader, code);
    gl.compile_shader(&shader);
    let compiled = gl
        .get_shader_parameter(&shader, WebGl2RenderingContext::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !compiled {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(js_error(format!("failed to compile a shader: {log}")));
    }
    Ok(shader)
}

fn link_program(
    gl: &WebGl2RenderingContext,
    vertex_shader: &WebGlShader,
    fragment_shader: &WebGlShader,
) -> Result<WebGlProgram, JsValue> {
    let program = gl
        .create_program()
        .ok_or_else(|| js_error("failed to create a program".to_string()))?;
    gl.attach_shader(&program, vertex_shader);
    gl.attach_shader(&program, fragment_shader);
    gl.link_program(&program);
    let linked = gl
        .get_program_parameter(&program, WebGl2RenderingContext::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !linked {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(js_error(format!("failed to link a program: {log}")));
    }
    Ok(program)
}

fn create_vertex_buffer(
    gl: &WebGl2RenderingContext,
    data: &[f32],
) -> Result<WebGlBuffer, JsValue> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| js_error("failed to create a buffer".to_string()))?;
    gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&buffer));
    let view = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(
        WebGl2RenderingContext::ARRAY_BUFFER,
        &view,
        WebGl2RenderingContext::STATIC_DRAW,
    );
    Ok(buffer)
}

fn create_index_buffer(gl: &WebGl2RenderingContext, data: &[u16]) -> Result<WebGlBuffer, JsValue> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| js_error("failed to create a buffer".to_string()))?;
    gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, Some(&buffer));
    let view = js_sys::Uint16Array::from(data);
    gl.buffer_data_with_array_buffer_view(
        WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER,
        &view,
        WebGl2RenderingContext::STATIC_DRAW,
    );
    Ok(buffer)
}

/// Numeric reading of an input's text. Empty reads as 0; unparsable text
/// reads as NaN and flows through the math core's pass-through numeric
/// policy rather than being masked.
fn parse_input_value(text: &str) -> f32 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse::<f32>().unwrap_or(f32::NAN)
}

/// Numeric value of the `<input>` element with the given id.
fn input_value(document: &Document, id: &str) -> Result<f32, JsValue> {
    let input = document
        .get_element_by_id(id)
        .ok_or_else(|| js_error(format!("missing input element: {id}")))?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| js_error(format!("element is not an input: {id}")))?;
    Ok(parse_input_value(&input.value()))
}

/// Reads the `id-x`, `id-y`, `id-z` input triple.
fn input_triple(document: &Document, id: &str) -> Result<[f32; 3], JsValue> {
    Ok([
        input_value(document, &format!("{id}-x"))?,
        input_value(document, &format!("{id}-y"))?,
        input_value(document, &format!("{id}-z"))?,
    ])
}

/// Reads the whole parameter form into a `SceneParams`.
fn read_scene_params(document: &Document) -> Result<SceneParams, JsValue> {
    Ok(SceneParams {
        model: ModelParams {
            position: input_triple(document, "model-position")?,
            rotated: input_triple(document, "model-rotated")?,
            rotating: input_triple(document, "model-rotating")?,
        },
        camera: CameraParams {
            position: input_triple(document, "camera-position")?,
            look_at: input_triple(document, "camera-look-at")?,
            up: input_triple(document, "camera-up-vec")?,
        },
        light: LightParams {
            position: input_triple(document, "light-position")?,
            ambient: input_triple(document, "light-ambient")?,
            diffuse: input_triple(document, "light-diffuse")?,
            specular: input_triple(document, "light-specular")?,
        },
        material: MaterialParams {
            ambient: input_triple(document, "material-ambient")?,
            diffuse: input_triple(document, "material-diffuse")?,
            specular: input_triple(document, "material-specular")?,
            shininess: input_value(document, "material-shininess")?,
        },
    })
}

struct UniformLocations {
    world: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    proj: Option<WebGlUniformLocation>,
    world_it: Option<WebGlUniformLocation>,
    camera_position: Option<WebGlUniformLocation>,
    light_position: Option<WebGlUniformLocation>,
    light_ambient: Option<WebGlUniformLocation>,
    light_diffuse: Option<WebGlUniformLocation>,
    light_specular: Option<WebGlUniformLocation>,
    model_ambient: Option<WebGlUniformLocation>,
    model_diffuse: Option<WebGlUniformLocation>,
    model_specular: Option<WebGlUniformLocation>,
    model_shininess: Option<WebGlUniformLocation>,
}

impl UniformLocations {
    fn lookup(gl: &WebGl2RenderingContext, program: &WebGlProgram) -> Self {
        Self {
            world: gl.get_uniform_location(program, "uniWorld"),
            view: gl.get_uniform_location(program, "uniView"),
            proj: gl.get_uniform_location(program, "uniProj"),
            world_it: gl.get_uniform_location(program, "uniWorldIT"),
            camera_position: gl.get_uniform_location(program, "uniCameraPosition"),
            light_position: gl.get_uniform_location(program, "uniLightPosition"),
            light_ambient: gl.get_uniform_location(program, "uniLightAmbient"),
            light_diffuse: gl.get_uniform_location(program, "uniLightDiffuse"),
            light_specular: gl.get_uniform_location(program, "uniLightSpecular"),
            model_ambient: gl.get_uniform_location(program, "uniModelAmbient"),
            model_diffuse: gl.get_uniform_location(program, "uniModelDiffuse"),
            model_specular: gl.get_uniform_location(program, "uniModelSpecular"),
            model_shininess: gl.get_uniform_location(program, "uniModelShininess"),
        }
    }
}

/// WebGL2 renderer bound to a canvas and the parameter form.
#[wasm_bindgen]
pub struct WebRenderer {
    window: Window,
    document: Document,
    canvas: HtmlCanvasElement,
    gl: WebGl2RenderingContext,
    locations: UniformLocations,
    _vertex_buffer: WebGlBuffer,
    _index_buffer: WebGlBuffer,
    index_count: i32,
    frame: f32,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Sets up the WebGL2 pipeline on the canvas with the given id and
    /// uploads the built-in mesh.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        let window =
            web_sys::window().ok_or_else(|| js_error("no window available".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| js_error("no document available".to_string()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| js_error(format!("missing canvas element: {canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error(format!("element is not a canvas: {canvas_id}")))?;
        let gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| js_error("failed to get context: webgl2".to_string()))?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| js_error("context is not webgl2".to_string()))?;

        // shader program
        let vertex_shader = compile_shader(
            &gl,
            WebGl2RenderingContext::VERTEX_SHADER,
            VERTEX_SHADER_CODE,
        )?;
        let fragment_shader = compile_shader(
            &gl,
            WebGl2RenderingContext::FRAGMENT_SHADER,
            FRAGMENT_SHADER_CODE,
        )?;
        let program = link_program(&gl, &vertex_shader, &fragment_shader)?;
        gl.use_program(Some(&program));
        let locations = UniformLocations::lookup(&gl, &program);

        // rendering settings
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.enable(WebGl2RenderingContext::DEPTH_TEST);
        gl.front_face(WebGl2RenderingContext::CCW);
        gl.enable(WebGl2RenderingContext::BLEND);
        gl.blend_func(
            WebGl2RenderingContext::SRC_ALPHA,
            WebGl2RenderingContext::ONE_MINUS_SRC_ALPHA,
        );

        // the static model: buffers stay bound for the renderer's lifetime
        let mesh = Mesh::cube(2.0);
        let vertex_buffer = create_vertex_buffer(&gl, &mesh.vertex_data())?;
        let index_buffer = create_index_buffer(&gl, mesh.index_data())?;
        let stride = FLOATS_PER_VERTEX * std::mem::size_of::<f32>() as i32;
        gl.enable_vertex_attrib_array(IN_POSITION_LOCATION);
        gl.enable_vertex_attrib_array(IN_NORMAL_LOCATION);
        gl.vertex_attrib_pointer_with_i32(
            IN_POSITION_LOCATION,
            4,
            WebGl2RenderingContext::FLOAT,
            false,
            stride,
            0,
        );
        gl.vertex_attrib_pointer_with_i32(
            IN_NORMAL_LOCATION,
            4,
            WebGl2RenderingContext::FLOAT,
            false,
            stride,
            4 * std::mem::size_of::<f32>() as i32,
        );

        Ok(WebRenderer {
            window,
            document,
            canvas,
            gl,
            locations,
            _vertex_buffer: vertex_buffer,
            _index_buffer: index_buffer,
            index_count: mesh.index_data().len() as i32,
            frame: 0.0,
        })
    }

    /// Renders one frame: reads the form, resizes the canvas to the window,
    /// derives the uniform matrices, and draws.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let scene = read_scene_params(&self.document)?;
        let (width, height) = self.adjust_scene_size()?;
        let aspect = width / height;
        let matrices = FrameMatrices::derive(&scene, aspect, self.frame);

        let gl = &self.gl;
        let loc = &self.locations;
        gl.clear(WebGl2RenderingContext::COLOR_BUFFER_BIT);
        gl.uniform_matrix4fv_with_f32_array(loc.world.as_ref(), false, &matrices.world.get());
        gl.uniform_matrix4fv_with_f32_array(loc.view.as_ref(), false, &matrices.view.get());
        gl.uniform_matrix4fv_with_f32_array(loc.proj.as_ref(), false, &matrices.proj.get());
        gl.uniform_matrix4fv_with_f32_array(loc.world_it.as_ref(), false, &matrices.world_it.get());
        gl.uniform4fv_with_f32_array(loc.camera_position.as_ref(), &to_vec4(scene.camera.position));
        gl.uniform4fv_with_f32_array(loc.light_position.as_ref(), &to_vec4(scene.light.position));
        gl.uniform4fv_with_f32_array(loc.light_ambient.as_ref(), &to_vec4(scene.light.ambient));
        gl.uniform4fv_with_f32_array(loc.light_diffuse.as_ref(), &to_vec4(scene.light.diffuse));
        gl.uniform4fv_with_f32_array(loc.light_specular.as_ref(), &to_vec4(scene.light.specular));
        gl.uniform4fv_with_f32_array(loc.model_ambient.as_ref(), &to_vec4(scene.material.ambient));
        gl.uniform4fv_with_f32_array(loc.model_diffuse.as_ref(), &to_vec4(scene.material.diffuse));
        gl.uniform4fv_with_f32_array(
            loc.model_specular.as_ref(),
            &to_vec4(scene.material.specular),
        );
        gl.uniform1f(loc.model_shininess.as_ref(), scene.material.shininess);
        gl.draw_elements_with_i32(
            WebGl2RenderingContext::TRIANGLES,
            self.index_count,
            WebGl2RenderingContext::UNSIGNED_SHORT,
            0,
        );
        gl.flush();

        self.frame += 1.0;
        Ok(())
    }

    /// Matches the canvas and viewport to the window size; returns the size.
    fn adjust_scene_size(&self) -> Result<(f32, f32), JsValue> {
        let width = self
            .window
            .inner_width()?
            .as_f64()
            .unwrap_or(f64::from(self.canvas.width()));
        let height = self
            .window
            .inner_height()?
            .as_f64()
            .unwrap_or(f64::from(self.canvas.height()));
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.gl.viewport(0, 0, width as i32, height as i32);
        Ok((width as f32, height as f32))
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Readable panic messages in the browser console
    console_error_panic_hook::set_once();
    Ok(())
}
