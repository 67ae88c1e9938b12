//! Integration tests for meshlod-simplification
//!
//! These tests check the properties every decimation result must satisfy
//! and a few concrete scenarios on small reference meshes.

use meshlod_core::{Drawable, TriangleMesh};
use meshlod_simplification::*;
use nalgebra::Point3;

/// Unit cube with 8 shared corners and 12 outward-facing triangles
fn create_unit_cube() -> TriangleMesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let faces = vec![
        [0, 2, 1], [0, 3, 2], // bottom
        [4, 5, 6], [4, 6, 7], // top
        [0, 1, 5], [0, 5, 4], // front
        [1, 2, 6], [1, 6, 5], // right
        [2, 3, 7], [2, 7, 6], // back
        [3, 0, 4], [3, 4, 7], // left
    ];
    TriangleMesh::from_vertices_and_faces(vertices, faces)
}

/// Flat grid of `size` x `size` vertices in the z = 0 plane, with UVs
fn create_plane_grid(size: usize) -> TriangleMesh {
    let mut vertices = Vec::new();
    let mut uvs = Vec::new();
    for y in 0..size {
        for x in 0..size {
            vertices.push(Point3::new(x as f32, y as f32, 0.0));
            uvs.push([x as f32 / (size - 1) as f32, y as f32 / (size - 1) as f32]);
        }
    }
    let mut faces = Vec::new();
    for y in 0..(size - 1) {
        for x in 0..(size - 1) {
            let tl = y * size + x;
            let tr = tl + 1;
            let bl = (y + 1) * size + x;
            let br = bl + 1;
            faces.push([tl, bl, tr]);
            faces.push([tr, bl, br]);
        }
    }
    let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
    mesh.set_uvs(uvs);
    mesh
}

/// Height field bump over a grid
fn create_curved_surface(size: usize) -> TriangleMesh {
    let mut mesh = create_plane_grid(size);
    for v in &mut mesh.vertices {
        let fx = v.x / (size - 1) as f32 * std::f32::consts::PI;
        let fy = v.y / (size - 1) as f32 * std::f32::consts::PI;
        v.z = (fx.sin() * fy.sin()) * 2.0;
    }
    mesh
}

fn assert_well_formed(input: &TriangleMesh, output: &TriangleMesh) {
    assert!(output.face_count() <= input.face_count());
    assert!(output.vertex_count() <= input.vertex_count());

    let flat = output.flat_indices();
    assert_eq!(flat.len() % 3, 0);
    assert!(flat.iter().all(|&i| (i as usize) < output.vertex_count()));
    for face in &output.faces {
        assert!(face[0] != face[1] && face[1] != face[2] && face[0] != face[2]);
    }
    assert!(output.validate().is_ok());
}

#[test]
fn test_properties_hold_across_ratios() {
    let params = DecimationParams::default();
    let meshes = [create_unit_cube(), create_plane_grid(7), create_curved_surface(8)];

    for mesh in &meshes {
        for ratio in [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
            let (output, report) = decimate(mesh, ratio, &params);
            assert_well_formed(mesh, &output);
            assert_eq!(report.final_triangles, output.face_count());
            assert_eq!(report.original_triangles, mesh.face_count());
        }
    }
}

#[test]
fn test_small_mesh_passthrough() {
    let mut mesh = create_unit_cube();
    mesh.faces.truncate(3);

    let simplifier = QuadricErrorSimplifier::new();
    let output = simplifier.simplify(&mesh, 0.9).unwrap();
    assert_eq!(output.face_count(), 3);
    assert_eq!(output, mesh);
}

#[test]
fn test_cube_half_reduction() {
    let cube = create_unit_cube();
    let simplifier = QuadricErrorSimplifier::new();
    let (output, report) = simplifier.simplify_with_report(&cube, 0.5).unwrap();

    assert_eq!(report.target_triangles, 6);
    assert!(output.face_count() <= 12);
    assert!(output.face_count() >= 4);
    assert!(report.reached_target());

    // Collapse targets stay within the cube
    let (min, max) = report.bounds;
    assert_eq!(report.bounds, output.bounding_box());
    for c in 0..3 {
        assert!(min[c] >= -1e-5);
        assert!(max[c] <= 1.0 + 1e-5);
    }
}

#[test]
fn test_planar_grid_converges_quickly() {
    let mesh = create_plane_grid(10);
    let (output, report) = decimate(&mesh, 0.9, &DecimationParams::default());

    assert_eq!(report.target_triangles, 16);
    assert!(report.reached_target());
    assert!(output.face_count() <= 16);
    // Coplanar collapses cost nothing, so the earliest thresholds suffice
    assert!(report.iterations <= 3, "took {} iterations", report.iterations);

    for v in &output.vertices {
        assert_eq!(v.z, 0.0);
    }
}

#[test]
fn test_zero_ratio_keeps_everything() {
    let mesh = create_curved_surface(8);
    let (output, report) = decimate(&mesh, 0.0, &DecimationParams::default());

    assert_eq!(output.face_count(), mesh.face_count());
    assert_eq!(output.vertices, mesh.vertices);
    assert_eq!(output.faces, mesh.faces);
    assert_eq!(report.collapses, 0);
}

#[test]
fn test_near_full_ratio_reaches_floor() {
    let params = DecimationParams::default();

    let (cube_out, _) = decimate(&create_unit_cube(), 0.99, &params);
    assert_eq!(cube_out.face_count(), 4);

    let (grid_out, report) = decimate(&create_plane_grid(11), 0.99, &params);
    assert_eq!(report.target_triangles, 4);
    assert_eq!(grid_out.face_count(), 4);
}

#[test]
fn test_curved_surface_reduces() {
    let mesh = create_curved_surface(8);
    let simplifier = QuadricErrorSimplifier::new();
    let output = simplifier.simplify(&mesh, 0.5).unwrap();

    assert!(output.face_count() < mesh.face_count());
    assert!(output.face_count() > 0);
}

#[test]
fn test_uvs_carried_by_original_index() {
    let mesh = create_plane_grid(8);
    let input_uvs = mesh.uvs.clone().unwrap();
    let (output, _) = decimate(&mesh, 0.6, &DecimationParams::default());

    let uvs = output.uvs.as_ref().expect("uvs should survive decimation");
    assert_eq!(uvs.len(), output.vertex_count());
    for uv in uvs {
        assert!(input_uvs.contains(uv));
    }
}

#[test]
fn test_uvs_absent_stay_absent() {
    let (output, _) = decimate(&create_unit_cube(), 0.5, &DecimationParams::default());
    assert!(output.uvs.is_none());
}

#[test]
fn test_normals_recomputed() {
    let mesh = create_plane_grid(6);
    let (output, _) = decimate(&mesh, 0.0, &DecimationParams::default());

    let normals = output.normals.as_ref().unwrap();
    assert_eq!(normals.len(), output.vertex_count());
    // Grid winding faces -z
    for n in normals {
        assert!((n.z + 1.0).abs() < 1e-6);
    }
}

#[test]
fn test_flat_buffer_interface() {
    let cube = create_unit_cube();
    let indices = cube.flat_indices();
    assert_eq!(indices.len(), 36);

    let mesh = TriangleMesh::from_flat_indices(cube.vertices.clone(), &indices).unwrap();
    let (output, _) = decimate(&mesh, 0.5, &DecimationParams::default());
    assert_eq!(output.flat_indices().len(), output.face_count() * 3);

    assert!(TriangleMesh::from_flat_indices(cube.vertices, &indices[..35]).is_err());
}

#[test]
fn test_lod_chain_on_cube() {
    let cube = create_unit_cube();
    let levels = generate_lod_chain(&cube, &LodSettings::with_ratios(vec![0.25, 0.5])).unwrap();

    assert_eq!(levels.len(), 2);
    assert!(levels.iter().all(|l| l.mesh.face_count() >= 4));
    assert!(levels[1].mesh.face_count() <= levels[0].mesh.face_count());
    assert_eq!(levels[0].mesh.vertices.len(), levels[0].report.final_vertices);
    assert!(levels[1].to_string().starts_with("LOD2 (ratio 0.50): 12 -> 6 triangles"));
}
