//! Point sprite shader.
//!
//! Each particle is one instance of a six-vertex quad. The quad is sized in
//! screen pixels (`point_size` over the viewport, scaled by `clip.w` so it
//! survives the perspective divide) and the fragment stage cuts it to a soft
//! disc. `amplitude` sways particles around their position over `time`, by at
//! most `SWAY_DISTANCE` outline units per axis at amplitude 1.
//!
//! The uniform block must stay in sync with [`PointUniforms`](crate::buffer::PointUniforms)
//! and the instance attributes with [`PointVertex`](crate::buffer::PointVertex).

pub const POINT_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    viewport: vec2<f32>,
    point_size: f32,
    time: f32,
    amplitude: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

const SWAY_DISTANCE: f32 = 8.0;

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let quad = quad_vertices[vertex_index];

    var swayed = position;
    let phase = uniforms.time + position.x * 0.05 + position.y * 0.03;
    swayed.x += sin(phase) * uniforms.amplitude * SWAY_DISTANCE;
    swayed.y += cos(phase * 1.3) * uniforms.amplitude * SWAY_DISTANCE;
    swayed.z += sin(phase * 0.7) * uniforms.amplitude * SWAY_DISTANCE;

    let world = uniforms.model * vec4<f32>(swayed, 1.0);
    var clip = uniforms.view_proj * world;

    // Clip space spans 2 units per viewport, so this quad is point_size pixels wide
    let extent = uniforms.point_size / max(uniforms.viewport, vec2<f32>(1.0, 1.0));
    clip = vec4<f32>(clip.xy + quad * extent * clip.w, clip.z, clip.w);

    var out: VertexOutput;
    out.clip_position = clip;
    out.color = color;
    out.uv = quad;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.6, 1.0, dist);
    return vec4<f32>(in.color, alpha);
}
"#;
