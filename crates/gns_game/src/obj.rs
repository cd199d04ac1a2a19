//! OBJ mesh loading for board objects that need more than a primitive.

use std::path::Path;

use gns_render::{MeshData, MeshVertex};

/// Load an OBJ file and merge all objects/groups into one mesh.
pub fn load_obj_from_path(path: &Path) -> Result<MeshData, String> {
    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &load_options)
        .map_err(|e| format!("Failed to load OBJ {}: {e}", path.display()))?;

    if models.is_empty() {
        return Err(format!(
            "OBJ validation failed: no geometry in {}",
            path.display()
        ));
    }
    if models.len() > 1 {
        log::warn!(
            "OBJ {} contains {} objects/groups, merging all geometry",
            path.display(),
            models.len()
        );
    }

    let data = merge_models(&models);
    if data.vertices.is_empty() || data.indices.is_empty() {
        return Err(format!(
            "OBJ validation failed: no vertices or faces in {}",
            path.display()
        ));
    }
    Ok(data)
}

fn merge_models(models: &[tobj::Model]) -> MeshData {
    let mut data = MeshData::default();
    let mut vertex_offset: u32 = 0;

    for model in models {
        let mesh = &model.mesh;
        if mesh.positions.is_empty() {
            continue;
        }

        let vert_count = mesh.positions.len() / 3;
        let has_uvs = !mesh.texcoords.is_empty();
        let has_normals = !mesh.normals.is_empty();

        if !has_uvs {
            log::warn!("Mesh '{}' has no UV coordinates, using (0, 0)", model.name);
        }
        if !has_normals {
            log::warn!("Mesh '{}' has no normals, using +Y", model.name);
        }

        for i in 0..vert_count {
            let position = [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ];
            // OBJ puts the uv origin at the bottom left, wgpu samples from
            // the top left, so v flips here.
            let tex_coords = if has_uvs && i * 2 + 1 < mesh.texcoords.len() {
                [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            let normal = if has_normals && i * 3 + 2 < mesh.normals.len() {
                [
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                ]
            } else {
                [0.0, 1.0, 0.0]
            };

            data.vertices.push(MeshVertex {
                position,
                tex_coords,
                normal,
            });
        }

        for &index in &mesh.indices {
            data.indices.push(index + vertex_offset);
        }
        vertex_offset += vert_count as u32;
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_obj_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "gns_obj_test_{}_{}_{}.obj",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    const QUAD_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_face_is_triangulated() {
        let path = temp_obj_path("quad");
        fs::write(&path, QUAD_OBJ).expect("failed to write temp obj");

        let data = load_obj_from_path(&path).expect("quad should load");
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.indices.len(), 6);
        assert!(data.indices.iter().all(|&i| i < 4));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn uv_v_axis_is_flipped_for_wgpu() {
        let path = temp_obj_path("uv_flip");
        fs::write(&path, QUAD_OBJ).expect("failed to write temp obj");

        let data = load_obj_from_path(&path).expect("quad should load");
        let first = &data.vertices[0];
        assert_eq!(first.position, [0.0, 0.0, 0.0]);
        assert_eq!(first.tex_coords, [0.0, 1.0]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn bare_positions_fall_back_to_default_uv_and_normal() {
        let path = temp_obj_path("bare");
        fs::write(
            &path,
            "v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nv 0.0 1.0 0.0\nf 1 2 3\n",
        )
        .expect("failed to write temp obj");

        let data = load_obj_from_path(&path).expect("bare triangle should load");
        assert_eq!(data.indices.len(), 3);
        assert!(data.vertices.iter().all(|v| v.tex_coords == [0.0, 0.0]));
        assert!(data.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_obj_path("missing");
        let err = load_obj_from_path(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to load OBJ"));
        assert!(err.contains("missing"));
    }

    #[test]
    fn obj_without_faces_is_rejected() {
        let path = temp_obj_path("no_faces");
        fs::write(&path, "# just a comment\nv 0.0 0.0 0.0\n").expect("failed to write temp obj");

        let err = load_obj_from_path(&path).expect_err("faceless obj should fail");
        assert!(err.contains("no"), "unexpected error: {err}");

        let _ = fs::remove_file(path);
    }
}
