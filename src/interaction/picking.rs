use crate::instances::InstanceGroup;
use crate::math::{Mat4, Vec3};

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Information about a ray-instance intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub index: usize,
    pub distance: f32,
    pub hit_point: Vec3,
}

/// Ray-based picking against the bounding spheres of an instance group
pub struct RayPicker {
    /// Radius of the instanced mesh at scale 1
    mesh_radius: f32,
}

impl RayPicker {
    pub fn new(mesh_radius: f32) -> Self {
        Self { mesh_radius }
    }

    /// World ray through a screen pixel
    pub fn screen_ray(
        screen_x: f32,
        screen_y: f32,
        screen_width: f32,
        screen_height: f32,
        view: &Mat4,
        projection: &Mat4,
        camera_pos: Vec3,
    ) -> Ray {
        let ndc_x = (2.0 * screen_x / screen_width) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_y / screen_height);

        // Undo the perspective scale to get a view-space direction at z = -1
        let view_dir = Vec3::new(ndc_x / projection.data[0], ndc_y / projection.data[5], -1.0);

        // The view matrix is orthonormal, so its inverse rotation is the transpose
        let d = &view.data;
        let world_dir = Vec3::new(
            d[0] * view_dir.x + d[1] * view_dir.y + d[2] * view_dir.z,
            d[4] * view_dir.x + d[5] * view_dir.y + d[6] * view_dir.z,
            d[8] * view_dir.x + d[9] * view_dir.y + d[10] * view_dir.z,
        );

        Ray {
            origin: camera_pos,
            direction: world_dir.normalize(),
        }
    }

    /// Closest instance hit by `ray`. Instances are tested where they are
    /// currently drawn, i.e. displaced by the assembly explode factor.
    pub fn pick(
        &self,
        ray: &Ray,
        group: &InstanceGroup,
        explode_factor: f32,
        displacement: f32,
    ) -> Option<HitInfo> {
        let mut closest: Option<HitInfo> = None;

        for index in 0..group.len() {
            let center = group.displaced_position(index, explode_factor, displacement);
            let radius = group.transform(index).scale * self.mesh_radius;

            if let Some(dist) = ray_sphere_intersect(ray, center, radius) {
                if closest.map_or(true, |c| dist < c.distance) {
                    closest = Some(HitInfo {
                        index,
                        distance: dist,
                        hit_point: ray.origin + ray.direction.scale(dist),
                    });
                }
            }
        }

        closest
    }
}

/// Distance along the ray to the first intersection in front of the origin
fn ray_sphere_intersect(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;

    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = (-b - sqrt_d) / (2.0 * a);
    if near > 0.0 {
        return Some(near);
    }
    let far = (-b + sqrt_d) / (2.0 * a);
    (far > 0.0).then_some(far)
}
