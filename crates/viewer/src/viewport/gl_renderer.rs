use std::collections::HashMap;
use std::sync::Arc;

use glow::HasContext;
use shared::AnnotationId;
use tracing::{debug, error};

use super::camera::ArcBallCamera;
use super::mesh::{self, LineMeshData, MeshData, LINE_STRIDE, MESH_STRIDE};

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Show axes
    pub axes_visible: bool,
    /// Background color RGB
    pub bg_color: [u8; 3],
}

/// CPU-side geometry of one annotation group, as handed to the paint callback
pub struct AnnotationGeometry {
    pub id: AnnotationId,
    pub marker: MeshData,
    pub leader: LineMeshData,
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    _vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    _vbo: glow::Buffer,
    vertex_count: i32,
}

/// Marker and leader buffers for one annotation
struct GpuAnnotation {
    marker: GpuMesh,
    leader: GpuLines,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    line_program: glow::Program,
    axes: Option<GpuLines>,
    cached_axes_length: Option<f32>,
    /// One mesh per drawable model part
    model_meshes: Vec<GpuMesh>,
    last_model_version: u64,
    /// Annotation groups keyed by id
    annotations: HashMap<AnnotationId, GpuAnnotation>,
    last_annotation_version: u64,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context, axes_length: f32) -> Self {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG);
        let line_program = compile_program(gl, LINE_VERT, LINE_FRAG);

        let axes = Some(upload_lines(gl, &mesh::axes(axes_length)));

        Self {
            mesh_program,
            line_program,
            axes,
            cached_axes_length: Some(axes_length),
            model_meshes: Vec::new(),
            last_model_version: 0,
            annotations: HashMap::new(),
            last_annotation_version: 0,
        }
    }

    /// Rebuild the axes if their length changed
    pub fn update_axes(&mut self, gl: &glow::Context, length: f32) {
        if self.cached_axes_length == Some(length) {
            return;
        }
        if let Some(old) = self.axes.take() {
            delete_lines(gl, &old);
        }
        self.axes = Some(upload_lines(gl, &mesh::axes(length)));
        self.cached_axes_length = Some(length);
    }

    /// Replace the model part meshes when the mounted model changes
    pub fn sync_model(&mut self, gl: &glow::Context, parts: &[MeshData], version: u64) {
        if version == self.last_model_version {
            return;
        }
        self.last_model_version = version;

        for mesh in self.model_meshes.drain(..) {
            delete_mesh(gl, &mesh);
        }
        check_disposal(gl, "model meshes");

        self.model_meshes = parts.iter().map(|part| upload_mesh(gl, part)).collect();
    }

    /// Bring annotation buffers in line with the renderer's groups.
    ///
    /// Groups no longer present are deleted; new ones are uploaded. Marker and
    /// leader geometry never changes after creation, so surviving ids are kept.
    pub fn sync_annotations(
        &mut self,
        gl: &glow::Context,
        groups: &[AnnotationGeometry],
        version: u64,
    ) {
        if version == self.last_annotation_version {
            return;
        }
        self.last_annotation_version = version;

        let live: std::collections::HashSet<AnnotationId> = groups.iter().map(|g| g.id).collect();
        let stale: Vec<AnnotationId> = self
            .annotations
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(gpu) = self.annotations.remove(&id) {
                delete_mesh(gl, &gpu.marker);
                delete_lines(gl, &gpu.leader);
                debug!("GPU buffers released for {id}");
            }
        }
        check_disposal(gl, "annotation buffers");

        for group in groups {
            self.annotations.entry(group.id).or_insert_with(|| GpuAnnotation {
                marker: upload_mesh(gl, &group.marker),
                leader: upload_lines(gl, &group.leader),
            });
        }
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Render the scene
    pub fn paint(&self, gl: &glow::Context, camera: &ArcBallCamera, params: &RenderParams) {
        let aspect = params.viewport[2] / params.viewport[3];
        let vp = camera.view_projection(aspect);

        unsafe {
            gl.viewport(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.scissor(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);

            gl.use_program(Some(self.line_program));
            set_uniform_mat4(gl, self.line_program, "u_mvp", &vp);

            if params.axes_visible {
                if let Some(ref axes) = self.axes {
                    draw_lines(gl, axes);
                }
            }

            for gpu in self.annotations.values() {
                draw_lines(gl, &gpu.leader);
            }

            gl.use_program(Some(self.mesh_program));
            set_uniform_mat4(gl, self.mesh_program, "u_mvp", &vp);

            // Light direction in world space
            let light_dir = glam::Vec3::new(0.3, 0.8, 0.5).normalize();
            set_uniform_vec3(gl, self.mesh_program, "u_light_dir", &light_dir);

            for mesh in &self.model_meshes {
                draw_mesh(gl, mesh);
            }
            for gpu in self.annotations.values() {
                draw_mesh(gl, &gpu.marker);
            }

            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    /// Release every GPU object. Called once, after the session has been torn down.
    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.line_program);
        }
        if let Some(axes) = self.axes.take() {
            delete_lines(gl, &axes);
        }
        for mesh in self.model_meshes.drain(..) {
            delete_mesh(gl, &mesh);
        }
        for (_, gpu) in self.annotations.drain() {
            delete_mesh(gl, &gpu.marker);
            delete_lines(gl, &gpu.leader);
        }
        check_disposal(gl, "renderer");
        debug!("GL renderer destroyed");
    }
}

/// Snapshot of the annotation geometry for the paint callback
pub fn annotation_geometry(
    renderer: &crate::annotation::AnnotationRenderer,
) -> Arc<Vec<AnnotationGeometry>> {
    Arc::new(
        renderer
            .groups()
            .map(|(id, group)| AnnotationGeometry {
                id: *id,
                marker: group.marker.clone(),
                leader: group.leader.clone(),
            })
            .collect(),
    )
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> GpuMesh {
    unsafe {
        let vao = gl.create_vertex_array().unwrap();
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer().unwrap();
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (MESH_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer().unwrap();
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        GpuMesh {
            vao,
            _vbo: vbo,
            ibo,
            index_count: data.indices.len() as i32,
        }
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> GpuLines {
    unsafe {
        let vao = gl.create_vertex_array().unwrap();
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer().unwrap();
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (LINE_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        GpuLines {
            vao,
            _vbo: vbo,
            vertex_count: data.vertex_count() as i32,
        }
    }
}

// ── Disposal ─────────────────────────────────────────────────

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh._vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_lines(gl: &glow::Context, lines: &GpuLines) {
    unsafe {
        gl.delete_vertex_array(lines.vao);
        gl.delete_buffer(lines._vbo);
    }
}

/// Disposal failures are logged and otherwise ignored.
fn check_disposal(gl: &glow::Context, what: &str) {
    let code = unsafe { gl.get_error() };
    if code != glow::NO_ERROR {
        error!("Failed to release {what}: GL error 0x{code:04x}");
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> glow::Program {
    unsafe {
        let program = gl.create_program().unwrap();

        let vert = gl.create_shader(glow::VERTEX_SHADER).unwrap();
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            error!("Vertex shader error: {log}");
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER).unwrap();
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            error!("Program link error: {log}");
        }

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        program
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice)) }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_normal = a_normal;
    v_color = a_color;
}
"#;

// Two-sided lighting: scanned bone meshes are often not consistently wound
const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;

in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    float diffuse = abs(dot(n, u_light_dir));
    float ambient = 0.3;
    float light = ambient + diffuse * 0.7;
    frag_color = vec4(v_color * light, 1.0);
}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;
