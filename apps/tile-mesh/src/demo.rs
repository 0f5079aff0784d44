// This file is part of Nitrogen.
//
// Nitrogen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Nitrogen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Nitrogen.  If not, see <http://www.gnu.org/licenses/>.

//! Synthetic demo meshes. Format-specific mesh ingestion (OBJ/glTF/PLY
//! parsing, MTL/texture loading) is a Non-goal of the tiling core (spec.md
//! §1) and belongs to a collaborator this repository doesn't implement, so
//! this CLI exercises the pipeline against meshes it builds itself instead
//! of reading a file from disk.

use image::{Rgba, RgbaImage};
use mesh::{AlphaMode, Material, MaterialLibrary, SamplerSettings, TextureImage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Cube,
    Sphere,
}

impl std::str::FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cube" => Ok(Shape::Cube),
            "sphere" => Ok(Shape::Sphere),
            other => Err(format!("unknown shape '{other}', expected 'cube' or 'sphere'")),
        }
    }
}

/// Builds one of the synthetic demo meshes plus a matching material library
/// with a single base-color texture.
pub fn build(shape: Shape, subdivisions: u32, checker_size: u32) -> (mesh::IndexedMesh, MaterialLibrary) {
    let mesh = match shape {
        Shape::Cube => unit_cube(),
        Shape::Sphere => subdivided_icosphere(subdivisions),
    };
    let library = checker_material_library(checker_size);
    (mesh, library)
}

/// The unit-cube mesh from spec.md scenario 2: 12 triangles (2 per face),
/// each face carrying its own 0..1 UV square so a single checker texture
/// tiles identically across every face.
fn unit_cube() -> mesh::IndexedMesh {
    // 6 faces * 4 corners, duplicated per-face so each face gets its own
    // UVs and a consistent outward normal (shared corners would average
    // normals across faces, which isn't what a hard-edged cube wants).
    let faces: [([f32; 3], [f32; 3], [f32; 3], [f32; 3], [f32; 3]); 6] = [
        // +X
        ([1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 0.0, 0.0]),
        // -X
        ([-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 0.0, 0.0]),
        // +Y
        ([-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [0.0, 1.0, 0.0]),
        // -Y
        ([-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [0.0, -1.0, 0.0]),
        // +Z
        ([-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [0.0, 0.0, 1.0]),
        // -Z
        ([1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [0.0, 0.0, -1.0]),
    ];

    let mut positions = Vec::with_capacity(6 * 4 * 3);
    let mut normals = Vec::with_capacity(6 * 4 * 3);
    let mut uvs = Vec::with_capacity(6 * 4 * 2);
    let mut indices = Vec::with_capacity(6 * 6);

    for (face_index, (a, b, c, d, n)) in faces.iter().enumerate() {
        let base = (face_index * 4) as u32;
        for corner in [a, b, c, d] {
            positions.extend_from_slice(corner);
            normals.extend_from_slice(n);
        }
        uvs.extend_from_slice(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh::IndexedMesh {
        positions,
        normals: Some(normals),
        uvs: Some(uvs),
        colors: None,
        indices,
        material: Some(0),
    }
}

/// A UV sphere built by latitude/longitude subdivision rather than a true
/// icosahedron subdivision (the name is descriptive of scale, not topology):
/// `subdivisions` rings and `2 * subdivisions` segments, giving a mesh whose
/// triangle count scales with the square of the argument for exercising
/// deeper recursion than the 12-triangle cube can.
fn subdivided_icosphere(subdivisions: u32) -> mesh::IndexedMesh {
    let rings = subdivisions.max(2);
    let segments = rings * 2;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let v = ring as f64 / rings as f64;
        let theta = v * std::f64::consts::PI;
        for seg in 0..=segments {
            let u = seg as f64 / segments as f64;
            let phi = u * std::f64::consts::TAU;
            let x = theta.sin() * phi.cos();
            let y = theta.cos();
            let z = theta.sin() * phi.sin();
            positions.extend_from_slice(&[x as f32, y as f32, z as f32]);
            normals.extend_from_slice(&[x as f32, y as f32, z as f32]);
            uvs.extend_from_slice(&[u as f32, v as f32]);
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            let c = a + 1;
            let d = b + 1;
            indices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }

    mesh::IndexedMesh {
        positions,
        normals: Some(normals),
        uvs: Some(uvs),
        colors: None,
        indices,
        material: Some(0),
    }
}

/// A single PBR material referencing a procedurally generated `n x n`
/// checkerboard base-color texture, matching spec.md scenario 2's "4x4
/// checker texture".
fn checker_material_library(checker_size: u32) -> MaterialLibrary {
    let resolution = 256u32;
    let cell = (resolution / checker_size.max(1)).max(1);
    let mut image = RgbaImage::new(resolution, resolution);
    for (x, y, px) in image.enumerate_pixels_mut() {
        let on = ((x / cell) + (y / cell)) % 2 == 0;
        *px = if on {
            Rgba([235, 235, 235, 255])
        } else {
            Rgba([40, 60, 90, 255])
        };
    }

    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .expect("encoding the demo checker texture never fails");

    let texture = TextureImage {
        bytes,
        mime_type: "image/png".to_string(),
        width: resolution,
        height: resolution,
        sampler: SamplerSettings::default(),
    };

    let material = Material {
        base_color_texture: Some(0),
        alpha_mode: AlphaMode::Opaque,
        ..Material::default()
    };

    MaterialLibrary::new(vec![material], vec![texture])
}
