use glam::Vec3;

/// Floats per vertex in [`MeshData`]: position(3) + normal(3) + color(3)
pub const MESH_STRIDE: usize = 9;

/// Floats per vertex in [`LineMeshData`]: position(3) + color(4)
pub const LINE_STRIDE: usize = 7;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / MESH_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of vertex `i`
    pub fn position(&self, i: usize) -> Vec3 {
        let base = i * MESH_STRIDE;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    /// Stored normal of vertex `i`
    pub fn normal(&self, i: usize) -> Vec3 {
        let base = i * MESH_STRIDE;
        Vec3::new(
            self.vertices[base + 3],
            self.vertices[base + 4],
            self.vertices[base + 5],
        )
    }

    /// Corner positions of triangle `tri`, or None if an index is out of range.
    pub fn triangle(&self, tri: usize) -> Option<[Vec3; 3]> {
        let count = self.vertex_count();
        let idx = self.indices.get(tri * 3..tri * 3 + 3)?;
        if idx.iter().any(|&i| i as usize >= count) {
            return None;
        }
        Some([
            self.position(idx[0] as usize),
            self.position(idx[1] as usize),
            self.position(idx[2] as usize),
        ])
    }

    /// Build a flat-shaded mesh from triangle corners (3 unique vertices per triangle).
    /// Degenerate triangles are skipped.
    pub fn flat_shaded(triangles: &[[Vec3; 3]], color: [f32; 3]) -> Self {
        let mut vertices = Vec::with_capacity(triangles.len() * 3 * MESH_STRIDE);
        let mut indices = Vec::with_capacity(triangles.len() * 3);

        for [a, b, c] in triangles {
            // Only zero-area faces are skipped; tiny ones survive until the model is rescaled
            let n = (*b - *a).cross(*c - *a).normalize_or_zero();
            if n == Vec3::ZERO {
                continue;
            }
            let base = (vertices.len() / MESH_STRIDE) as u32;
            for v in [a, b, c] {
                push_vert(&mut vertices, v.x, v.y, v.z, n, color);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2]);
        }

        MeshData { vertices, indices }
    }

    /// Scale every position about the origin, then translate. Normals are kept
    /// (only uniform scale is applied).
    pub fn scale_translate(&mut self, scale: f32, offset: Vec3) {
        for v in self.vertices.chunks_exact_mut(MESH_STRIDE) {
            v[0] = v[0] * scale + offset.x;
            v[1] = v[1] * scale + offset.y;
            v[2] = v[2] * scale + offset.z;
        }
    }

    /// Copy of this mesh moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        let mut out = self.clone();
        out.scale_translate(1.0, offset);
        out
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone, Debug, Default)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / LINE_STRIDE
    }

    /// Segment endpoints, in order
    pub fn segments(&self) -> Vec<(Vec3, Vec3)> {
        self.vertices
            .chunks_exact(LINE_STRIDE * 2)
            .map(|s| {
                (
                    Vec3::new(s[0], s[1], s[2]),
                    Vec3::new(s[LINE_STRIDE], s[LINE_STRIDE + 1], s[LINE_STRIDE + 2]),
                )
            })
            .collect()
    }
}

// ── Primitive generation ─────────────────────────────────────

pub fn cube(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        ([Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)], Vec3::Z),
        // Back (-Z)
        ([Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)], Vec3::NEG_Z),
        // Right (+X)
        ([Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)], Vec3::X),
        // Left (-X)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)], Vec3::NEG_X),
        // Top (+Y)
        ([Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)], Vec3::Y),
        // Bottom (-Y)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)], Vec3::NEG_Y),
    ];

    let mut vertices = Vec::with_capacity(24 * MESH_STRIDE);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in &faces {
        let base = (vertices.len() / MESH_STRIDE) as u32;
        for v in quad {
            push_vert(&mut vertices, v.x, v.y, v.z, *normal, color);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

pub fn cylinder(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();

        let n0 = Vec3::new(c0, 0.0, s0);
        let n1 = Vec3::new(c1, 0.0, s1);

        let base = (vertices.len() / MESH_STRIDE) as u32;

        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0, color);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1, color);
        push_vert(&mut vertices, radius * c1, hh, radius * s1, n1, color);
        push_vert(&mut vertices, radius * c0, hh, radius * s0, n0, color);

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    add_cap(&mut vertices, &mut indices, radius, hh, segments, Vec3::Y, color, false);
    add_cap(&mut vertices, &mut indices, radius, -hh, segments, Vec3::NEG_Y, color, true);

    MeshData { vertices, indices }
}

/// UV sphere centered at the origin. Also used for annotation markers.
pub fn sphere(radius: f32, rings: u32, sectors: u32, color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let (sp, cp) = phi.sin_cos();

        for s in 0..=sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            let (st, ct) = theta.sin_cos();

            let n = Vec3::new(sp * ct, cp, sp * st);
            push_vert(&mut vertices, radius * n.x, radius * n.y, radius * n.z, n, color);
        }
    }

    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * (sectors + 1) + s;
            let i1 = i0 + 1;
            let i2 = i0 + sectors + 1;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    MeshData { vertices, indices }
}

pub fn cone(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let slope = radius / height;
    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();

        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();
        let n_top = (n0 + n1).normalize();

        let base = (vertices.len() / MESH_STRIDE) as u32;

        push_vert(&mut vertices, 0.0, hh, 0.0, n_top, color);
        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0, color);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1, color);

        indices.extend_from_slice(&[base, base + 2, base + 1]);
    }

    add_cap(&mut vertices, &mut indices, radius, -hh, segments, Vec3::NEG_Y, color, true);

    MeshData { vertices, indices }
}

// ── Annotation geometry ──────────────────────────────────────

/// Two connected segments: anchor → bend (diagonal), bend → end (horizontal).
pub fn leader_lines(anchor: Vec3, bend: Vec3, end: Vec3, color: [f32; 4]) -> LineMeshData {
    let mut vertices = Vec::with_capacity(4 * LINE_STRIDE);
    push_line_vert(&mut vertices, anchor.x, anchor.y, anchor.z, color);
    push_line_vert(&mut vertices, bend.x, bend.y, bend.z, color);
    push_line_vert(&mut vertices, bend.x, bend.y, bend.z, color);
    push_line_vert(&mut vertices, end.x, end.y, end.z, color);
    LineMeshData { vertices }
}

pub fn axes(length: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let r = [0.9_f32, 0.2, 0.2, 1.0];
    let g = [0.2_f32, 0.8, 0.2, 1.0];
    let b = [0.2_f32, 0.3, 0.9, 1.0];

    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, r);
    push_line_vert(&mut vertices, length, 0.0, 0.0, r);
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, g);
    push_line_vert(&mut vertices, 0.0, length, 0.0, g);
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, b);
    push_line_vert(&mut vertices, 0.0, 0.0, length, b);

    LineMeshData { vertices }
}

// ── Helpers ──────────────────────────────────────────────────

fn push_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[px, py, pz, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}

#[allow(clippy::too_many_arguments)]
fn add_cap(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    color: [f32; 3],
    reversed: bool,
) {
    let center_idx = (vertices.len() / MESH_STRIDE) as u32;
    push_vert(vertices, 0.0, y, 0.0, normal, color);

    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(vertices, radius * angle.cos(), y, radius * angle.sin(), normal, color);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        if reversed {
            indices.extend_from_slice(&[center_idx, center_idx + 1 + next, center_idx + 1 + i]);
        } else {
            indices.extend_from_slice(&[center_idx, center_idx + 1 + i, center_idx + 1 + next]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let m = cube(1.0, 1.0, 1.0, [1.0; 3]);
        assert_eq!(m.vertex_count(), 24);
        assert_eq!(m.triangle_count(), 12);
    }

    #[test]
    fn test_sphere_positions_on_radius() {
        let m = sphere(0.05, 16, 16, [1.0, 0.0, 0.0]);
        for i in 0..m.vertex_count() {
            assert!((m.position(i).length() - 0.05).abs() < 1e-5);
        }
    }

    #[test]
    fn test_flat_shaded_skips_degenerate() {
        let tris = [
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            [Vec3::ZERO, Vec3::X, Vec3::X * 2.0],
        ];
        let m = MeshData::flat_shaded(&tris, [1.0; 3]);
        assert_eq!(m.triangle_count(), 1);
        assert!((m.normal(0) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_flat_shaded_keeps_tiny_triangles() {
        let tris = [[Vec3::ZERO, Vec3::X * 1e-4, Vec3::Y * 1e-4]];
        let m = MeshData::flat_shaded(&tris, [1.0; 3]);
        assert_eq!(m.triangle_count(), 1);
        assert!((m.normal(0) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_translated_moves_positions() {
        let m = sphere(1.0, 4, 4, [1.0; 3]).translated(Vec3::new(2.0, 0.0, 0.0));
        let center = (0..m.vertex_count()).map(|i| m.position(i)).sum::<Vec3>() / m.vertex_count() as f32;
        assert!((center.x - 2.0).abs() < 0.2);
    }

    #[test]
    fn test_leader_lines_two_connected_segments() {
        let anchor = Vec3::ZERO;
        let bend = Vec3::new(1.0, 1.0, 0.0);
        let end = Vec3::new(1.5, 1.0, 0.0);
        let lines = leader_lines(anchor, bend, end, [1.0; 4]);
        let segs = lines.segments();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0], (anchor, bend));
        assert_eq!(segs[1], (bend, end));
        // second segment is horizontal
        assert_eq!(segs[1].0.y, segs[1].1.y);
    }

    #[test]
    fn test_triangle_out_of_range() {
        let m = MeshData {
            vertices: vec![0.0; MESH_STRIDE * 2],
            indices: vec![0, 1, 5],
        };
        assert!(m.triangle(0).is_none());
        assert!(m.triangle(1).is_none());
    }
}
