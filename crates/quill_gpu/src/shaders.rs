//! WGSL shaders
//!
//! Both shaders take window pixel positions and convert them to clip space
//! with the screen size uniform in group 0.

/// Textured, tinted quads
///
/// `fs_alpha` samples a single channel coverage texture, `fs_rgba` a
/// premultiplied color texture. The tint is premultiplied as well.
pub const QUAD_SHADER: &str = r#"
struct Screen {
    size: vec2<f32>,
    _padding: vec2<f32>,
}

@group(0) @binding(0) var<uniform> screen: Screen;
@group(1) @binding(0) var tex: texture_2d<f32>;
@group(1) @binding(1) var tex_sampler: sampler;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let ndc = vec2<f32>(-1.0, 1.0) + in.position / screen.size * vec2<f32>(2.0, -2.0);
    out.position = vec4<f32>(ndc, 0.0, 1.0);
    out.uv = in.uv;
    out.color = in.color;
    return out;
}

@fragment
fn fs_alpha(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color * textureSample(tex, tex_sampler, in.uv).r;
}

@fragment
fn fs_rgba(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color * textureSample(tex, tex_sampler, in.uv);
}
"#;

/// Blurred box shadows
///
/// Coverage is the product of two one dimensional Gaussian integrals over
/// the casting rectangle, using a polynomial approximation of erf.
pub const SHADOW_SHADER: &str = r#"
struct Screen {
    size: vec2<f32>,
    _padding: vec2<f32>,
}

@group(0) @binding(0) var<uniform> screen: Screen;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) sigma: f32,
    @location(2) color: vec4<f32>,
    @location(3) rect: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) point: vec2<f32>,
    @location(1) sigma: f32,
    @location(2) color: vec4<f32>,
    @location(3) rect: vec4<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let ndc = vec2<f32>(-1.0, 1.0) + in.position / screen.size * vec2<f32>(2.0, -2.0);
    out.position = vec4<f32>(ndc, 0.0, 1.0);
    out.point = in.position;
    out.sigma = in.sigma;
    out.color = in.color;
    out.rect = in.rect;
    return out;
}

fn erf(x: vec4<f32>) -> vec4<f32> {
    let s = sign(x);
    let a = abs(x);
    var y = 1.0 + (0.278393 + (0.230389 + 0.078108 * (a * a)) * a) * a;
    y = y * y;
    return s - s / (y * y);
}

fn box_shadow(lower: vec2<f32>, upper: vec2<f32>, point: vec2<f32>, sigma: f32) -> f32 {
    let query = vec4<f32>(point - lower, point - upper);
    let integral = 0.5 + 0.5 * erf(query * (sqrt(0.5) / sigma));
    return (integral.z - integral.x) * (integral.w - integral.y);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color * box_shadow(in.rect.xy, in.rect.zw, in.point, in.sigma);
}
"#;
