/// WGSL shader for every scene mesh: lit or unlit, optionally sampling the
/// video texture.
pub const MESH_SHADER: &str = r#"
const MAX_LIGHTS: u32 = 8u;

const KIND_AMBIENT: u32 = 0u;
const KIND_DIRECTIONAL: u32 = 1u;
const KIND_POINT: u32 = 2u;
const KIND_RECT_AREA: u32 = 3u;

struct Light {
    // xyz position, w kind
    position: vec4<f32>,
    // rgb color * intensity, w cutoff distance
    color: vec4<f32>,
    // xyz unit direction the light travels, w decay
    direction: vec4<f32>,
    // x width, y height
    size: vec4<f32>,
};

struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    counts: vec4<u32>,
    lights: array<Light, MAX_LIGHTS>,
};

struct Object {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    color: vec4<f32>,
    // x roughness, y metalness, z lit, w textured
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var<uniform> object: Object;

@group(2) @binding(0)
var map_texture: texture_2d<f32>;
@group(2) @binding(1)
var map_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = object.model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (object.normal_matrix * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = world_normal;
    // Texture rows run top to bottom, geometry v runs bottom to top.
    out.uv = vec2<f32>(vertex.uv.x, 1.0 - vertex.uv.y);
    return out;
}

fn distance_attenuation(d: f32, cutoff: f32, decay: f32) -> f32 {
    var falloff = 1.0 / max(pow(d, decay), 0.01);
    if (cutoff > 0.0) {
        let r = d / cutoff;
        let window = clamp(1.0 - r * r * r * r, 0.0, 1.0);
        falloff = falloff * window * window;
    }
    return falloff;
}

fn shade(light: Light, pos: vec3<f32>, n: vec3<f32>, v: vec3<f32>, shininess: f32) -> vec3<f32> {
    let kind = u32(light.position.w);
    if (kind == KIND_AMBIENT) {
        return light.color.rgb;
    }

    var l: vec3<f32>;
    var attenuation = 1.0;
    if (kind == KIND_DIRECTIONAL) {
        l = -light.direction.xyz;
    } else {
        let to_light = light.position.xyz - pos;
        let d = length(to_light);
        l = to_light / max(d, 1e-4);
        if (kind == KIND_POINT) {
            attenuation = distance_attenuation(d, light.color.w, light.direction.w);
        } else if (kind == KIND_RECT_AREA) {
            // One-sided emitter approximated from its centre.
            let facing = max(dot(-l, light.direction.xyz), 0.0);
            attenuation = facing * light.size.x * light.size.y / max(d * d, 0.01);
        }
    }

    let diffuse = max(dot(n, l), 0.0);
    let h = normalize(l + v);
    let specular = pow(max(dot(n, h), 0.0), shininess) * diffuse;
    return light.color.rgb * attenuation * (diffuse + 0.25 * specular);
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var albedo = object.color.rgb;
    if (object.params.w > 0.5) {
        albedo = albedo * textureSample(map_texture, map_sampler, in.uv).rgb;
    }
    if (object.params.z < 0.5) {
        return vec4<f32>(albedo, 1.0);
    }

    var n = normalize(in.world_normal);
    if (!front) {
        n = -n;
    }
    let v = normalize(globals.camera_pos.xyz - in.world_pos);
    let roughness = clamp(object.params.x, 0.04, 1.0);
    let shininess = mix(256.0, 2.0, roughness);

    var light_sum = vec3<f32>(0.0);
    let count = min(globals.counts.x, MAX_LIGHTS);
    for (var i = 0u; i < count; i = i + 1u) {
        light_sum = light_sum + shade(globals.lights[i], in.world_pos, n, v, shininess);
    }
    return vec4<f32>(albedo * light_sum, 1.0);
}
"#;

/// Stretches the scene target over the whole surface with one triangle.
pub const BLIT_SHADER: &str = r#"
@group(0) @binding(0)
var scene_texture: texture_2d<f32>;
@group(0) @binding(1)
var scene_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: VertexOutput;
    out.clip_position = vec4<f32>(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0, 0.0, 1.0);
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(textureSample(scene_texture, scene_sampler, in.uv).rgb, 1.0);
}
"#;
