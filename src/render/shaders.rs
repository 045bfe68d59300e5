/// Vertex shader shared by every instanced group.
///
/// Mirrors the host-side assembly math: the random offset is applied in the
/// instance's local space, before its matrix, so the dispersal scales and
/// rotates with the instance.
pub const INSTANCED_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in mat4 a_instance;
layout(location = 6) in vec3 a_offset;
layout(location = 7) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_progress;
uniform float u_displacement;

out vec3 v_normal;
out vec3 v_world_position;
out vec3 v_color;

void main() {
    float eased = smoothstep(0.0, 1.0, u_progress);
    float explode = 1.0 - sqrt(eased);
    vec3 local = a_position + a_offset * explode * u_displacement;

    mat4 model = u_model * a_instance;
    vec4 world_pos = model * vec4(local, 1.0);

    v_world_position = world_pos.xyz;
    v_normal = mat3(model) * a_normal;
    v_color = a_color;

    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Fragment shader for instanced meshes: diffuse, rim and an emissive lift
pub const INSTANCED_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in vec3 v_world_position;
in vec3 v_color;

uniform vec3 u_camera_pos;
uniform float u_emissive;

out vec4 fragColor;

void main() {
    vec3 normal = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_position);

    vec3 light_dir = normalize(vec3(0.4, 1.0, 0.6));
    float ndotl = max(dot(normal, light_dir), 0.0);

    vec3 ambient = v_color * 0.25;
    vec3 diffuse = v_color * ndotl * 0.8;

    vec3 half_dir = normalize(light_dir + view_dir);
    float spec = pow(max(dot(normal, half_dir), 0.0), 32.0);
    vec3 specular = vec3(1.0) * spec * 0.35;

    float rim = pow(1.0 - max(dot(normal, view_dir), 0.0), 3.0);
    vec3 rim_light = v_color * rim * 0.4;

    vec3 color = ambient + diffuse + specular + rim_light + v_color * u_emissive;
    fragColor = vec4(color, 1.0);
}
"#;

/// Vertex shader for firework and snow point sprites
pub const PARTICLE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;
layout(location = 2) in float a_alpha;
layout(location = 3) in vec3 a_color;

uniform mat4 u_view;
uniform mat4 u_projection;

out float v_alpha;
out vec3 v_color;

void main() {
    v_alpha = a_alpha;
    v_color = a_color;

    vec4 view_pos = u_view * vec4(a_position, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = a_size * (100.0 / max(-view_pos.z, 1.0));
}
"#;

pub const PARTICLE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in float v_alpha;
in vec3 v_color;

out vec4 fragColor;

void main() {
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);

    if (dist > 0.5) {
        discard;
    }

    float alpha = v_alpha * (1.0 - dist * 2.0);
    alpha = alpha * alpha;

    fragColor = vec4(v_color * (1.0 + alpha), alpha);
}
"#;

/// Fullscreen triangle for post-processing
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

out vec2 v_uv;

void main() {
    float x = float((gl_VertexID & 1) << 2);
    float y = float((gl_VertexID & 2) << 1);
    v_uv = vec2(x * 0.5, y * 0.5);
    gl_Position = vec4(x - 1.0, y - 1.0, 0.0, 1.0);
}
"#;

pub const BLOOM_EXTRACT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform float u_threshold;

out vec4 fragColor;

void main() {
    vec3 color = texture(u_texture, v_uv).rgb;
    float brightness = dot(color, vec3(0.2126, 0.7152, 0.0722));
    float knee = smoothstep(u_threshold, u_threshold + 0.1, brightness);
    fragColor = vec4(color * knee, 1.0);
}
"#;

/// Separable 9-tap Gaussian blur
pub const BLUR_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform vec2 u_direction;

out vec4 fragColor;

void main() {
    vec2 texel = 1.0 / vec2(textureSize(u_texture, 0));
    float weights[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);

    vec3 result = texture(u_texture, v_uv).rgb * weights[0];
    for (int i = 1; i < 5; i++) {
        vec2 offset = u_direction * texel * float(i) * 2.0;
        result += texture(u_texture, v_uv + offset).rgb * weights[i];
        result += texture(u_texture, v_uv - offset).rgb * weights[i];
    }

    fragColor = vec4(result, 1.0);
}
"#;

/// Scene plus bloom, then vignette, tone mapping and gamma
pub const COMPOSITE_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_scene;
uniform sampler2D u_bloom;
uniform float u_bloom_strength;
uniform float u_vignette_strength;

out vec4 fragColor;

void main() {
    vec3 scene = texture(u_scene, v_uv).rgb;
    vec3 bloom = texture(u_bloom, v_uv).rgb;

    vec3 color = scene + bloom * u_bloom_strength;

    vec2 uv = v_uv - 0.5;
    color *= 1.0 - dot(uv, uv) * u_vignette_strength;

    color = color / (color + vec3(1.0));
    color = pow(color, vec3(1.0 / 2.2));

    fragColor = vec4(color, 1.0);
}
"#;
