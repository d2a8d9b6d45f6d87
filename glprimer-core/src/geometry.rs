//! Vertex data generators.
//!
//! Every function returns flat `f32` sequences, ready to be uploaded as an
//! attribute buffer. Parallel buffers (colors, uvs, normals) are generated
//! index-aligned with the matching position buffer.

use glam::Vec3;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

/// A single triangle: top center, bottom right, bottom left.
pub const TRIANGLE_POSITIONS: [f32; 9] = [
    0.0, 1.0, 0.0, //
    1.0, -1.0, 0.0, //
    -1.0, -1.0, 0.0,
];

/// Pure red, green and blue for the three triangle corners.
pub const TRIANGLE_COLORS: [f32; 9] = [
    1.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, //
    0.0, 0.0, 1.0,
];

/// Number of vertices in [`CUBE_POSITIONS`].
pub const CUBE_VERTEX_COUNT: usize = 36;

/// A unit cube centered on the origin as 12 triangles.
/// Face order is front, left, back, right, top, bottom.
pub const CUBE_POSITIONS: [f32; CUBE_VERTEX_COUNT * 3] = [
    // Front
    0.5, 0.5, 0.5, 0.5, -0.5, 0.5, -0.5, 0.5, 0.5, //
    -0.5, 0.5, 0.5, 0.5, -0.5, 0.5, -0.5, -0.5, 0.5, //
    // Left
    -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, -0.5, 0.5, -0.5, //
    -0.5, 0.5, -0.5, -0.5, -0.5, 0.5, -0.5, -0.5, -0.5, //
    // Back
    -0.5, 0.5, -0.5, -0.5, -0.5, -0.5, 0.5, 0.5, -0.5, //
    0.5, 0.5, -0.5, -0.5, -0.5, -0.5, 0.5, -0.5, -0.5, //
    // Right
    0.5, 0.5, -0.5, 0.5, -0.5, -0.5, 0.5, 0.5, 0.5, //
    0.5, 0.5, 0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, //
    // Top
    0.5, 0.5, 0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, //
    -0.5, 0.5, 0.5, 0.5, 0.5, -0.5, -0.5, 0.5, -0.5, //
    // Bottom
    0.5, -0.5, 0.5, 0.5, -0.5, -0.5, -0.5, -0.5, 0.5, //
    -0.5, -0.5, 0.5, 0.5, -0.5, -0.5, -0.5, -0.5, -0.5,
];

/// Outward normal of each cube face, in [`CUBE_POSITIONS`] face order.
const CUBE_FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
];

/// Texture coordinates of one face, two triangles in the same winding as
/// the cube positions.
const FACE_UVS: [f32; 12] = [
    1.0, 1.0, // top right
    1.0, 0.0, // bottom right
    0.0, 1.0, // top left
    0.0, 1.0, // top left
    1.0, 0.0, // bottom right
    0.0, 0.0, // bottom left
];

/// Concatenates `pattern` with itself `n` times.
pub fn repeat(pattern: &[f32], n: usize) -> Vec<f32> {
    pattern.repeat(n)
}

/// One random RGB color per cube face, repeated for the face's six vertices.
pub fn cube_face_colors<R: Rng>(rng: &mut R) -> Vec<f32> {
    let mut colors = Vec::with_capacity(CUBE_VERTEX_COUNT * 3);
    for _ in 0..6 {
        let color: [f32; 3] = [rng.random(), rng.random(), rng.random()];
        colors.extend(repeat(&color, 6));
    }
    colors
}

pub fn cube_uvs() -> Vec<f32> {
    repeat(&FACE_UVS, 6)
}

pub fn cube_normals() -> Vec<f32> {
    CUBE_FACE_NORMALS
        .iter()
        .flat_map(|normal| repeat(normal, 6))
        .collect()
}

const POINTS_PER_CHUNK: usize = 4096;

/// Scatters `count` points over the unit sphere.
///
/// Points are drawn uniformly from the cube `[-0.5, 0.5]^3` and pushed out
/// to unit length. The work is split into fixed chunks with one RNG seeded
/// per chunk, so the output only depends on `count` and `seed`.
pub fn sphere_point_cloud(count: usize, seed: u64) -> Vec<f32> {
    let chunks = count.div_ceil(POINTS_PER_CHUNK);
    let points: Vec<Vec3> = (0..chunks)
        .into_par_iter()
        .flat_map_iter(|chunk| {
            let mut rng = StdRng::seed_from_u64(
                seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(chunk as u64),
            );
            let len = POINTS_PER_CHUNK.min(count - chunk * POINTS_PER_CHUNK);
            (0..len).map(move |_| loop {
                let candidate = Vec3::new(
                    rng.random::<f32>() - 0.5,
                    rng.random::<f32>() - 0.5,
                    rng.random::<f32>() - 0.5,
                );
                if let Some(point) = candidate.try_normalize() {
                    break point;
                }
            })
        })
        .collect();

    points.iter().flat_map(|p| p.to_array()).collect()
}

/// A flat `width` x `height` plane in the XY plane, centered on the origin,
/// split into `segments_x` x `segments_y` quads of two triangles each.
pub fn plane_grid(width: f32, height: f32, segments_x: usize, segments_y: usize) -> Vec<f32> {
    let step_x = width / segments_x as f32;
    let step_y = height / segments_y as f32;
    let origin_x = -width / 2.0;
    let origin_y = -height / 2.0;

    let mut positions = Vec::with_capacity(segments_x * segments_y * 18);
    for j in 0..segments_y {
        for i in 0..segments_x {
            let x0 = origin_x + i as f32 * step_x;
            let y0 = origin_y + j as f32 * step_y;
            let x1 = x0 + step_x;
            let y1 = y0 + step_y;
            positions.extend_from_slice(&[
                x0, y0, 0.0, x1, y0, 0.0, x0, y1, 0.0, //
                x0, y1, 0.0, x1, y0, 0.0, x1, y1, 0.0,
            ]);
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_buffers_are_index_aligned() {
        assert_eq!(CUBE_POSITIONS.len() / 3, CUBE_VERTEX_COUNT);
        assert_eq!(cube_uvs().len() / 2, CUBE_VERTEX_COUNT);
        assert_eq!(cube_normals().len() / 3, CUBE_VERTEX_COUNT);

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(cube_face_colors(&mut rng).len() / 3, CUBE_VERTEX_COUNT);
    }

    #[test]
    fn test_face_colors_are_uniform_per_face() {
        let mut rng = StdRng::seed_from_u64(42);
        let colors = cube_face_colors(&mut rng);
        for face in colors.chunks(18) {
            let first = &face[..3];
            assert!(face.chunks(3).all(|c| c == first));
            assert!(first.iter().all(|v| (0.0..1.0).contains(v)));
        }
    }

    #[test]
    fn test_cube_normals_point_out_of_their_face() {
        let normals = cube_normals();
        for (vertex, normal) in CUBE_POSITIONS.chunks(3).zip(normals.chunks(3)) {
            let p = Vec3::from_slice(vertex);
            let n = Vec3::from_slice(normal);
            assert_eq!(n.length(), 1.0);
            // each vertex sits on the face plane its normal points out of
            assert_eq!(p.dot(n), 0.5);
        }
    }

    #[test]
    fn test_repeat() {
        assert_eq!(repeat(&[1.0, 2.0], 3), vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        assert!(repeat(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_sphere_points_have_unit_length() {
        let cloud = sphere_point_cloud(10_000, 3);
        assert_eq!(cloud.len(), 30_000);
        for point in cloud.chunks(3) {
            assert!((Vec3::from_slice(point).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_points_are_deterministic() {
        assert_eq!(sphere_point_cloud(5000, 11), sphere_point_cloud(5000, 11));
        assert_ne!(sphere_point_cloud(5000, 11), sphere_point_cloud(5000, 12));
        assert!(sphere_point_cloud(0, 1).is_empty());
    }

    #[test]
    fn test_plane_grid_spans_the_plane() {
        let plane = plane_grid(10.0, 10.0, 100, 100);
        assert_eq!(plane.len() / 3, 100 * 100 * 6);

        let xs = plane.chunks(3).map(|v| v[0]);
        let (min, max) = xs.fold((f32::MAX, f32::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
        assert!((min + 5.0).abs() < 1e-4);
        assert!((max - 5.0).abs() < 1e-4);
        assert!(plane.chunks(3).all(|v| v[2] == 0.0));
    }
}
