//! Anatomical model hierarchy and the OBJ asset loader.

pub mod loader;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glam::Vec3;
use obj::ObjData;
use thiserror::Error;
use tracing::info;

use crate::viewport::mesh::{self, MeshData};
use crate::viewport::picking::Aabb;

/// Largest bounding-box dimension of every loaded model
pub const NORMALIZED_SIZE: f32 = 12.0;

/// Base color of bone surfaces
pub const BONE_COLOR: [f32; 3] = [0.89, 0.85, 0.76];

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {name}: {message}")]
    Parse { name: String, message: String },
    #[error("{name} contains no triangles")]
    Empty { name: String },
}

/// A single drawable part: one OBJ group
#[derive(Clone, Debug)]
pub struct ModelPart {
    pub name: String,
    pub mesh: MeshData,
    pub bounds: Aabb,
}

impl ModelPart {
    pub fn new(name: impl Into<String>, mesh: MeshData) -> Self {
        let bounds = Aabb::from_mesh(&mesh);
        Self {
            name: name.into(),
            mesh,
            bounds,
        }
    }
}

/// Node of the model hierarchy
#[derive(Clone, Debug, Default)]
pub struct ModelNode {
    pub name: String,
    pub parts: Vec<ModelPart>,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    fn collect_parts<'a>(&'a self, out: &mut Vec<&'a ModelPart>) {
        out.extend(self.parts.iter());
        for child in &self.children {
            child.collect_parts(out);
        }
    }

    fn for_each_part_mut(&mut self, f: &mut impl FnMut(&mut ModelPart)) {
        for part in &mut self.parts {
            f(part);
        }
        for child in &mut self.children {
            child.for_each_part_mut(f);
        }
    }
}

/// Fully loaded model: hierarchy plus its bounding box
#[derive(Clone, Debug)]
pub struct LoadedModel {
    pub name: String,
    pub root: ModelNode,
    pub bounds: Aabb,
}

impl LoadedModel {
    pub fn from_root(name: impl Into<String>, root: ModelNode) -> Self {
        let mut model = Self {
            name: name.into(),
            root,
            bounds: Aabb::EMPTY,
        };
        model.recompute_bounds();
        model
    }

    /// Every drawable part in the hierarchy, depth first
    pub fn parts(&self) -> Vec<&ModelPart> {
        let mut out = Vec::new();
        self.root.collect_parts(&mut out);
        out
    }

    pub fn triangle_count(&self) -> usize {
        self.parts().iter().map(|p| p.mesh.triangle_count()).sum()
    }

    fn recompute_bounds(&mut self) {
        self.bounds = self
            .parts()
            .iter()
            .fold(Aabb::EMPTY, |acc, p| acc.union(&p.bounds));
    }

    /// Center at the origin and scale uniformly so the largest dimension is `size`.
    pub fn normalize(&mut self, size: f32) {
        let extent = self.bounds.max_extent();
        if extent <= f32::EPSILON {
            return;
        }
        let scale = size / extent;
        let offset = -self.bounds.center() * scale;
        self.root.for_each_part_mut(&mut |part| {
            part.mesh.scale_translate(scale, offset);
            part.bounds = Aabb::from_mesh(&part.mesh);
        });
        self.recompute_bounds();
    }
}

/// Load and normalize an OBJ model from disk.
pub fn load(path: &Path) -> Result<LoadedModel, ModelLoadError> {
    let file = File::open(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let model = parse_obj(&name, BufReader::new(file))?;
    info!(
        "Loaded model {} ({} parts, {} triangles)",
        model.name,
        model.parts().len(),
        model.triangle_count()
    );
    Ok(model)
}

/// Parse OBJ text from any buffered reader.
pub fn parse_obj(name: &str, reader: impl BufRead) -> Result<LoadedModel, ModelLoadError> {
    let data = ObjData::load_buf(reader).map_err(|e| ModelLoadError::Parse {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    let mut model = from_obj_data(name, &data);
    if model.triangle_count() == 0 {
        return Err(ModelLoadError::Empty {
            name: name.to_string(),
        });
    }
    model.normalize(NORMALIZED_SIZE);
    Ok(model)
}

/// Root → one node per OBJ object → one part per group. Polygons are fan-triangulated.
pub fn from_obj_data(name: &str, data: &ObjData) -> LoadedModel {
    let position = |i: usize| data.position.get(i).map(|p| Vec3::from(*p));

    let children = data
        .objects
        .iter()
        .map(|object| {
            let parts = object
                .groups
                .iter()
                .filter_map(|group| {
                    let mut triangles = Vec::new();
                    for poly in &group.polys {
                        let corners: Option<Vec<Vec3>> =
                            poly.0.iter().map(|t| position(t.0)).collect();
                        let Some(corners) = corners else {
                            continue;
                        };
                        for k in 1..corners.len().saturating_sub(1) {
                            triangles.push([corners[0], corners[k], corners[k + 1]]);
                        }
                    }
                    let mesh = MeshData::flat_shaded(&triangles, BONE_COLOR);
                    (!mesh.is_empty()).then(|| ModelPart::new(group.name.clone(), mesh))
                })
                .collect();
            ModelNode {
                name: object.name.clone(),
                parts,
                children: Vec::new(),
            }
        })
        .collect();

    LoadedModel::from_root(
        name,
        ModelNode {
            name: name.to_string(),
            parts: Vec::new(),
            children,
        },
    )
}

/// Procedural long-bone specimen used when no model file is given.
pub fn demo_specimen() -> LoadedModel {
    let shaft = mesh::cylinder(0.35, 6.0, 32, BONE_COLOR);
    let head = mesh::sphere(0.8, 24, 24, BONE_COLOR).translated(Vec3::new(0.0, 3.4, 0.0));
    let condyle_l = mesh::sphere(0.6, 20, 20, BONE_COLOR).translated(Vec3::new(-0.45, -3.3, 0.0));
    let condyle_r = mesh::sphere(0.6, 20, 20, BONE_COLOR).translated(Vec3::new(0.45, -3.3, 0.0));
    let trochanter = mesh::cone(0.4, 0.9, 24, BONE_COLOR).translated(Vec3::new(0.55, 2.8, 0.0));

    let root = ModelNode {
        name: "specimen".into(),
        parts: vec![ModelPart::new("diaphysis", shaft)],
        children: vec![
            ModelNode {
                name: "proximal".into(),
                parts: vec![
                    ModelPart::new("head", head),
                    ModelPart::new("trochanter", trochanter),
                ],
                children: Vec::new(),
            },
            ModelNode {
                name: "distal".into(),
                parts: vec![
                    ModelPart::new("medial condyle", condyle_l),
                    ModelPart::new("lateral condyle", condyle_r),
                ],
                children: Vec::new(),
            },
        ],
    };

    let mut model = LoadedModel::from_root("specimen", root);
    model.normalize(NORMALIZED_SIZE);
    model
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA_QUAD: &str = "\
o Bone
g cortex
v 0 0 0
v 2 0 0
v 2 4 0
v 0 4 0
v 1 2 2
f 1 2 3 4
g tip
f 1 2 5
";

    #[test]
    fn test_parse_obj_hierarchy() {
        let model = parse_obj("bone", TETRA_QUAD.as_bytes()).unwrap();
        assert_eq!(model.root.children.len(), 1);
        assert_eq!(model.root.children[0].name, "Bone");
        let names: Vec<_> = model.parts().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["cortex", "tip"]);
        // quad fan-triangulated into two triangles + one triangle
        assert_eq!(model.triangle_count(), 3);
    }

    #[test]
    fn test_parse_obj_normalizes() {
        let model = parse_obj("bone", TETRA_QUAD.as_bytes()).unwrap();
        assert!((model.bounds.max_extent() - NORMALIZED_SIZE).abs() < 1e-4);
        assert!(model.bounds.center().length() < 1e-4);
    }

    #[test]
    fn test_parse_obj_sub_millimetre_units() {
        let tooth = "v 0 0 0\nv 1e-4 0 0\nv 0 1e-4 0\nv 0 0 1e-4\nf 1 2 3\nf 1 2 4\nf 1 3 4\nf 2 3 4\n";
        let model = parse_obj("tooth", tooth.as_bytes()).unwrap();
        assert_eq!(model.triangle_count(), 4);
        assert!((model.bounds.max_extent() - NORMALIZED_SIZE).abs() < 1e-3);
    }

    #[test]
    fn test_parse_obj_without_faces_is_empty() {
        let err = parse_obj("points", "v 0 0 0\nv 1 0 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ModelLoadError::Empty { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/skull.obj")).unwrap_err();
        assert!(matches!(err, ModelLoadError::Io { .. }));
        assert!(err.to_string().contains("skull.obj"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("femur.obj");
        std::fs::write(&path, TETRA_QUAD).unwrap();

        let model = load(&path).unwrap();
        assert_eq!(model.name, "femur");
        assert_eq!(model.parts().len(), 2);
    }

    #[test]
    fn test_demo_specimen_normalized() {
        let model = demo_specimen();
        assert_eq!(model.parts().len(), 5);
        assert!((model.bounds.max_extent() - NORMALIZED_SIZE).abs() < 1e-3);
        assert!(model.bounds.center().length() < 1e-3);
        for part in model.parts() {
            assert!(!part.bounds.is_empty());
        }
    }
}
