/// Maximum point lights uploaded per frame. Must match `MAX_LIGHTS` below.
pub const MAX_POINT_LIGHTS: usize = 8;

/// WGSL shader for the room: instanced boxes lit by one overhead light,
/// any active point lights, and their own emissive glow.
pub const ROOM_SHADER: &str = r#"
const MAX_LIGHTS: u32 = 8u;

struct PointLight {
    position: vec4<f32>,
    // rgb = color, a = intensity
    color: vec4<f32>,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_pos: vec4<f32>,
    light_color: vec4<f32>,
    light_count: vec4<u32>,
    lights: array<PointLight, 8>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    // rgb = emissive color, a = emissive strength
    @location(7) emissive: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    // Boxes are never rotated, so scaling the normal by the inverse scale
    // is the full normal matrix.
    let scale = vec3<f32>(
        length(instance.model_0.xyz),
        length(instance.model_1.xyz),
        length(instance.model_2.xyz),
    );

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize(vertex.normal / scale);
    out.color = instance.color;
    out.emissive = instance.emissive;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.world_normal);
    let view_dir = normalize(uniforms.camera_pos.xyz - in.world_pos);

    let ambient = 0.2 * uniforms.light_color.rgb;

    let light_dir = normalize(uniforms.light_pos.xyz - in.world_pos);
    let diffuse = max(dot(normal, light_dir), 0.0) * uniforms.light_color.rgb;

    let reflect_dir = reflect(-light_dir, normal);
    let specular = 0.3 * pow(max(dot(view_dir, reflect_dir), 0.0), 32.0) * uniforms.light_color.rgb;

    var point_light = vec3<f32>(0.0);
    let count = min(uniforms.light_count.x, MAX_LIGHTS);
    for (var i = 0u; i < count; i = i + 1u) {
        let light = uniforms.lights[i];
        let to_light = light.position.xyz - in.world_pos;
        let dist = length(to_light);
        let attenuation = 1.0 / (1.0 + 0.09 * dist + 0.032 * dist * dist);
        let lambert = max(dot(normal, to_light / max(dist, 0.0001)), 0.0);
        point_light += light.color.rgb * light.color.a * lambert * attenuation;
    }

    let lit = (ambient + diffuse + specular + point_light) * in.color.rgb;
    let glow = in.emissive.rgb * in.emissive.a;
    return vec4<f32>(lit + glow, in.color.a);
}
"#;
