//! Procedural meshes for the board manifest's primitive shapes.
//!
//! Everything is flat shaded: each face gets its own vertices so normals
//! stay hard at the edges.

use std::f32::consts::PI;

use gns_render::{MeshData, MeshVertex};

/// Axis-aligned box centered on the origin.
pub fn box_mesh(size: [f32; 3]) -> MeshData {
    let hx = size[0] / 2.0;
    let hy = size[1] / 2.0;
    let hz = size[2] / 2.0;
    let mut data = MeshData::default();

    // Front (+Z)
    push_quad(
        &mut data,
        [
            [-hx, -hy, hz],
            [hx, -hy, hz],
            [hx, hy, hz],
            [-hx, hy, hz],
        ],
        [0.0, 0.0, 1.0],
    );
    // Back (-Z)
    push_quad(
        &mut data,
        [
            [hx, -hy, -hz],
            [-hx, -hy, -hz],
            [-hx, hy, -hz],
            [hx, hy, -hz],
        ],
        [0.0, 0.0, -1.0],
    );
    // Top (+Y)
    push_quad(
        &mut data,
        [
            [-hx, hy, hz],
            [hx, hy, hz],
            [hx, hy, -hz],
            [-hx, hy, -hz],
        ],
        [0.0, 1.0, 0.0],
    );
    // Bottom (-Y)
    push_quad(
        &mut data,
        [
            [-hx, -hy, -hz],
            [hx, -hy, -hz],
            [hx, -hy, hz],
            [-hx, -hy, hz],
        ],
        [0.0, -1.0, 0.0],
    );
    // Right (+X)
    push_quad(
        &mut data,
        [
            [hx, -hy, hz],
            [hx, -hy, -hz],
            [hx, hy, -hz],
            [hx, hy, hz],
        ],
        [1.0, 0.0, 0.0],
    );
    // Left (-X)
    push_quad(
        &mut data,
        [
            [-hx, -hy, -hz],
            [-hx, -hy, hz],
            [-hx, hy, hz],
            [-hx, hy, -hz],
        ],
        [-1.0, 0.0, 0.0],
    );

    data
}

/// Upright cylinder centered on the origin, caps at +/- height/2.
pub fn cylinder_mesh(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let hy = height / 2.0;
    let mut data = MeshData::default();

    // Caps as triangle fans around duplicated center vertices.
    for (y, normal_y) in [(hy, 1.0f32), (-hy, -1.0f32)] {
        let center = data.vertices.len() as u32;
        data.vertices.push(MeshVertex {
            position: [0.0, y, 0.0],
            tex_coords: [0.5, 0.5],
            normal: [0.0, normal_y, 0.0],
        });
        for i in 0..segments {
            let theta = i as f32 / segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            data.vertices.push(MeshVertex {
                position: [radius * cos, y, radius * sin],
                tex_coords: [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
                normal: [0.0, normal_y, 0.0],
            });
        }
        for i in 0..segments {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % segments;
            if normal_y > 0.0 {
                data.indices.extend_from_slice(&[center, b, a]);
            } else {
                data.indices.extend_from_slice(&[center, a, b]);
            }
        }
    }

    // Side wall, seam duplicated so u can wrap 0..1.
    let wall_base = data.vertices.len() as u32;
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * 2.0 * PI;
        let (sin, cos) = theta.sin_cos();
        let u = i as f32 / segments as f32;
        for (y, v) in [(hy, 0.0f32), (-hy, 1.0f32)] {
            data.vertices.push(MeshVertex {
                position: [radius * cos, y, radius * sin],
                tex_coords: [u, v],
                normal: [cos, 0.0, sin],
            });
        }
    }
    for i in 0..segments {
        let top_a = wall_base + i * 2;
        let bottom_a = top_a + 1;
        let top_b = top_a + 2;
        let bottom_b = top_a + 3;
        data.indices
            .extend_from_slice(&[top_a, bottom_a, bottom_b, top_a, bottom_b, top_b]);
    }

    data
}

/// Arc-shaped slab between two radii, the shape of one colored button.
///
/// Angles are degrees counter-clockwise around +Y, measured from +X. The
/// slab is centered vertically like the other primitives.
pub fn ring_segment_mesh(
    inner_radius: f32,
    outer_radius: f32,
    height: f32,
    start_deg: f32,
    sweep_deg: f32,
    segments: u32,
) -> MeshData {
    let segments = segments.max(1);
    let hy = height / 2.0;
    let start = start_deg.to_radians();
    let step = sweep_deg.to_radians() / segments as f32;
    let mut data = MeshData::default();

    let ring_point = |i: u32, radius: f32, y: f32| -> [f32; 3] {
        let (sin, cos) = (start + step * i as f32).sin_cos();
        [radius * cos, y, radius * sin]
    };

    // Top and bottom faces, one quad per angular step.
    for i in 0..segments {
        let u0 = i as f32 / segments as f32;
        let u1 = (i + 1) as f32 / segments as f32;
        push_quad_uv(
            &mut data,
            [
                ring_point(i, inner_radius, hy),
                ring_point(i, outer_radius, hy),
                ring_point(i + 1, outer_radius, hy),
                ring_point(i + 1, inner_radius, hy),
            ],
            [0.0, 1.0, 0.0],
            [[u0, 1.0], [u0, 0.0], [u1, 0.0], [u1, 1.0]],
        );
        push_quad_uv(
            &mut data,
            [
                ring_point(i, outer_radius, -hy),
                ring_point(i, inner_radius, -hy),
                ring_point(i + 1, inner_radius, -hy),
                ring_point(i + 1, outer_radius, -hy),
            ],
            [0.0, -1.0, 0.0],
            [[u0, 0.0], [u0, 1.0], [u1, 1.0], [u1, 0.0]],
        );
    }

    // Curved walls. Quads are small enough that one normal per step is fine.
    for i in 0..segments {
        let mid = start + step * (i as f32 + 0.5);
        let (sin, cos) = mid.sin_cos();
        let u0 = i as f32 / segments as f32;
        let u1 = (i + 1) as f32 / segments as f32;
        push_quad_uv(
            &mut data,
            [
                ring_point(i, outer_radius, -hy),
                ring_point(i + 1, outer_radius, -hy),
                ring_point(i + 1, outer_radius, hy),
                ring_point(i, outer_radius, hy),
            ],
            [cos, 0.0, sin],
            [[u0, 1.0], [u1, 1.0], [u1, 0.0], [u0, 0.0]],
        );
        push_quad_uv(
            &mut data,
            [
                ring_point(i + 1, inner_radius, -hy),
                ring_point(i, inner_radius, -hy),
                ring_point(i, inner_radius, hy),
                ring_point(i + 1, inner_radius, hy),
            ],
            [-cos, 0.0, -sin],
            [[u1, 1.0], [u0, 1.0], [u0, 0.0], [u1, 0.0]],
        );
    }

    // End caps facing away from the sweep.
    let (start_sin, start_cos) = start.sin_cos();
    push_quad(
        &mut data,
        [
            ring_point(0, inner_radius, -hy),
            ring_point(0, outer_radius, -hy),
            ring_point(0, outer_radius, hy),
            ring_point(0, inner_radius, hy),
        ],
        [start_sin, 0.0, -start_cos],
    );
    let (end_sin, end_cos) = (start + step * segments as f32).sin_cos();
    push_quad(
        &mut data,
        [
            ring_point(segments, outer_radius, -hy),
            ring_point(segments, inner_radius, -hy),
            ring_point(segments, inner_radius, hy),
            ring_point(segments, outer_radius, hy),
        ],
        [-end_sin, 0.0, end_cos],
    );

    data
}

fn push_quad(data: &mut MeshData, corners: [[f32; 3]; 4], normal: [f32; 3]) {
    push_quad_uv(
        data,
        corners,
        normal,
        [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
    );
}

fn push_quad_uv(
    data: &mut MeshData,
    corners: [[f32; 3]; 4],
    normal: [f32; 3],
    uvs: [[f32; 2]; 4],
) {
    let base = data.vertices.len() as u32;
    for (position, tex_coords) in corners.into_iter().zip(uvs) {
        data.vertices.push(MeshVertex {
            position,
            tex_coords,
            normal,
        });
    }
    data.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_valid(data: &MeshData) {
        assert_eq!(data.indices.len() % 3, 0, "index count must form triangles");
        let max = data.vertices.len() as u32;
        assert!(data.indices.iter().all(|&i| i < max), "index out of range");
    }

    fn assert_normals_unit(data: &MeshData) {
        for vertex in &data.vertices {
            let [x, y, z] = vertex.normal;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - 1.0).abs() < 1e-4, "normal length {len} not unit");
        }
    }

    #[test]
    fn box_mesh_has_six_hard_faces() {
        let data = box_mesh([2.0, 1.0, 3.0]);
        assert_eq!(data.vertices.len(), 24);
        assert_eq!(data.indices.len(), 36);
        assert_indices_valid(&data);
        assert_normals_unit(&data);
    }

    #[test]
    fn box_mesh_spans_requested_extents() {
        let data = box_mesh([2.0, 4.0, 6.0]);
        for vertex in &data.vertices {
            assert!(vertex.position[0].abs() <= 1.0 + 1e-6);
            assert!(vertex.position[1].abs() <= 2.0 + 1e-6);
            assert!(vertex.position[2].abs() <= 3.0 + 1e-6);
        }
        let max_x = data
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert!((max_x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cylinder_mesh_stays_on_radius() {
        let data = cylinder_mesh(3.0, 1.0, 16);
        assert_indices_valid(&data);
        assert_normals_unit(&data);
        for vertex in &data.vertices {
            let r = (vertex.position[0].powi(2) + vertex.position[2].powi(2)).sqrt();
            assert!(r <= 3.0 + 1e-4, "vertex outside radius: {r}");
            assert!(vertex.position[1].abs() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn cylinder_mesh_clamps_degenerate_segment_counts() {
        let data = cylinder_mesh(1.0, 1.0, 0);
        assert_indices_valid(&data);
        assert!(!data.indices.is_empty());
    }

    #[test]
    fn ring_segment_respects_radial_bounds() {
        let data = ring_segment_mesh(2.0, 5.0, 0.5, 0.0, 90.0, 12);
        assert_indices_valid(&data);
        assert_normals_unit(&data);
        for vertex in &data.vertices {
            let r = (vertex.position[0].powi(2) + vertex.position[2].powi(2)).sqrt();
            assert!(r >= 2.0 - 1e-4 && r <= 5.0 + 1e-4, "radius {r} out of band");
        }
    }

    #[test]
    fn ring_segment_respects_angular_bounds() {
        let data = ring_segment_mesh(2.0, 5.0, 0.5, 0.0, 90.0, 12);
        for vertex in &data.vertices {
            let theta = vertex.position[2].atan2(vertex.position[0]).to_degrees();
            assert!(
                (-1e-3..=90.0 + 1e-3).contains(&theta),
                "vertex at {theta} degrees escapes the sweep"
            );
        }
    }
}
