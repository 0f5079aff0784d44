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

//! Assembles one tile's geometry (and, optionally, its atlas texture) into a
//! single binary glTF (GLB) container: a 12-byte header, a JSON chunk
//! describing the scene, and a BIN chunk holding every accessor's raw bytes
//! plus the embedded image.

use crate::document::Material as GltfMaterial;
use crate::document::*;
use crate::error::GlbError;
use mesh::{IndexedMesh, Material, TextureImage};

const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
const GLB_VERSION: u32 = 2;
const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;
const CHUNK_TYPE_BIN: u32 = 0x004E_4942;

/// Binary buffer under construction; every `push_*` call appends bytes and
/// returns the `BufferView` describing the region it just wrote, padded to a
/// 4-byte boundary as GLB's chunk alignment requires.
struct BinWriter {
    bytes: Vec<u8>,
}

impl BinWriter {
    fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    fn push(&mut self, data: &[u8], target: Option<u32>) -> BufferView {
        let byte_offset = self.bytes.len();
        self.bytes.extend_from_slice(data);
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
        BufferView {
            buffer: 0,
            byte_offset,
            byte_length: data.len(),
            byte_stride: None,
            target,
        }
    }
}

fn f32_slice_bytes(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn component_min_max(values: &[f32], components: usize) -> (Vec<f64>, Vec<f64>) {
    let mut min = vec![f64::INFINITY; components];
    let mut max = vec![f64::NEG_INFINITY; components];
    for chunk in values.chunks_exact(components) {
        for (c, &v) in chunk.iter().enumerate() {
            let v = v as f64;
            if v < min[c] {
                min[c] = v;
            }
            if v > max[c] {
                max[c] = v;
            }
        }
    }
    (min, max)
}

fn push_material(doc: &mut Document, writer: &mut BinWriter, material: Option<&Material>, texture: Option<&TextureImage>) -> Option<u32> {
    let material = material?;

    let base_color_texture = if let Some(texture) = texture {
        let view = writer.push(&texture.bytes, None);
        let view_index = doc.buffer_views.len() as u32;
        doc.buffer_views.push(view);
        doc.images.push(Image {
            mime_type: texture.mime_type.clone(),
            buffer_view: view_index,
        });
        let image_index = (doc.images.len() - 1) as u32;

        let basisu_extension = if texture.mime_type == "image/ktx2" {
            doc.extensions_used.push("KHR_texture_basisu".to_string());
            Some(BasisuExtension { source: image_index })
        } else {
            None
        };

        doc.samplers.push(Sampler {
            mag_filter: 9729, // LINEAR
            min_filter: 9729,
            wrap_s: 10497, // REPEAT
            wrap_t: 10497,
        });
        let sampler_index = (doc.samplers.len() - 1) as u32;

        doc.textures.push(Texture {
            source: image_index,
            sampler: Some(sampler_index),
            basisu_extension,
        });
        Some(TextureRef {
            index: (doc.textures.len() - 1) as u32,
        })
    } else {
        None
    };

    doc.materials.push(GltfMaterial {
        pbr_metallic_roughness: PbrMetallicRoughness {
            base_color_factor: material.base_color_factor,
            base_color_texture,
            metallic_factor: material.metallic_factor,
            roughness_factor: material.roughness_factor,
            metallic_roughness_texture: None,
        },
        alpha_mode: match material.alpha_mode {
            mesh::AlphaMode::Opaque => "OPAQUE",
            mesh::AlphaMode::Mask => "MASK",
            mesh::AlphaMode::Blend => "BLEND",
        },
        double_sided: material.double_sided,
    });
    Some((doc.materials.len() - 1) as u32)
}

/// Encodes `mesh` (plus `material`/`texture`, if the tile has any) as a
/// complete `.glb` byte buffer.
pub fn write_glb(mesh: &IndexedMesh, material: Option<&Material>, texture: Option<&TextureImage>) -> Result<Vec<u8>, GlbError> {
    if mesh.is_empty() {
        return Err(GlbError::EmptyMesh);
    }
    let vertex_count = mesh.vertex_count();
    if vertex_count > u32::MAX as usize {
        return Err(GlbError::TooManyVertices(vertex_count));
    }

    let mut writer = BinWriter::new();
    let mut buffer_views = Vec::new();
    let mut accessors = Vec::new();

    let indices_view = if vertex_count <= u16::MAX as usize + 1 {
        let bytes: Vec<u8> = mesh
            .indices
            .iter()
            .flat_map(|&i| (i as u16).to_le_bytes())
            .collect();
        let view = writer.push(&bytes, Some(TARGET_ELEMENT_ARRAY_BUFFER));
        (view, COMPONENT_TYPE_U16)
    } else {
        let bytes: Vec<u8> = mesh.indices.iter().flat_map(|&i| i.to_le_bytes()).collect();
        let view = writer.push(&bytes, Some(TARGET_ELEMENT_ARRAY_BUFFER));
        (view, COMPONENT_TYPE_U32)
    };
    buffer_views.push(indices_view.0);
    let indices_accessor = accessors.len() as u32;
    accessors.push(Accessor {
        buffer_view: (buffer_views.len() - 1) as u32,
        byte_offset: 0,
        component_type: indices_view.1,
        count: mesh.indices.len(),
        kind: "SCALAR",
        min: None,
        max: None,
    });

    let positions_bytes = f32_slice_bytes(&mesh.positions);
    let (pos_min, pos_max) = component_min_max(&mesh.positions, 3);
    buffer_views.push(writer.push(&positions_bytes, Some(TARGET_ARRAY_BUFFER)));
    let position_accessor = accessors.len() as u32;
    accessors.push(Accessor {
        buffer_view: (buffer_views.len() - 1) as u32,
        byte_offset: 0,
        component_type: COMPONENT_TYPE_F32,
        count: vertex_count,
        kind: "VEC3",
        min: Some(pos_min),
        max: Some(pos_max),
    });

    let normal_accessor = if let Some(normals) = &mesh.normals {
        let bytes = f32_slice_bytes(normals);
        buffer_views.push(writer.push(&bytes, Some(TARGET_ARRAY_BUFFER)));
        let idx = accessors.len() as u32;
        accessors.push(Accessor {
            buffer_view: (buffer_views.len() - 1) as u32,
            byte_offset: 0,
            component_type: COMPONENT_TYPE_F32,
            count: vertex_count,
            kind: "VEC3",
            min: None,
            max: None,
        });
        Some(idx)
    } else {
        None
    };

    let uv_accessor = if let Some(uvs) = &mesh.uvs {
        let bytes = f32_slice_bytes(uvs);
        buffer_views.push(writer.push(&bytes, Some(TARGET_ARRAY_BUFFER)));
        let idx = accessors.len() as u32;
        accessors.push(Accessor {
            buffer_view: (buffer_views.len() - 1) as u32,
            byte_offset: 0,
            component_type: COMPONENT_TYPE_F32,
            count: vertex_count,
            kind: "VEC2",
            min: None,
            max: None,
        });
        Some(idx)
    } else {
        None
    };

    let color_accessor = if let Some(colors) = &mesh.colors {
        let bytes = f32_slice_bytes(colors);
        buffer_views.push(writer.push(&bytes, Some(TARGET_ARRAY_BUFFER)));
        let idx = accessors.len() as u32;
        accessors.push(Accessor {
            buffer_view: (buffer_views.len() - 1) as u32,
            byte_offset: 0,
            component_type: COMPONENT_TYPE_F32,
            count: vertex_count,
            kind: "VEC4",
            min: None,
            max: None,
        });
        Some(idx)
    } else {
        None
    };

    let mut doc = Document {
        asset: Asset { version: "2.0" },
        extensions_used: Vec::new(),
        extensions_required: Vec::new(),
        buffers: Vec::new(),
        buffer_views,
        accessors,
        images: Vec::new(),
        samplers: Vec::new(),
        textures: Vec::new(),
        materials: Vec::new(),
        meshes: Vec::new(),
        nodes: Vec::new(),
        scenes: vec![Scene { nodes: vec![0] }],
        scene: 0,
    };

    let material_index = push_material(&mut doc, &mut writer, material, texture);

    doc.meshes.push(Mesh {
        primitives: vec![Primitive {
            attributes: Attributes {
                position: position_accessor,
                normal: normal_accessor,
                texcoord_0: uv_accessor,
                color_0: color_accessor,
            },
            indices: indices_accessor,
            material: material_index,
            mode: PRIMITIVE_TRIANGLES,
        }],
    });
    doc.nodes.push(Node { mesh: 0, matrix: None });
    doc.buffers.push(Buffer {
        byte_length: writer.bytes.len(),
    });

    let json_bytes = serde_json::to_vec(&doc)?;
    Ok(assemble(json_bytes, writer.bytes))
}

/// Pads `json` with trailing spaces and `bin` with trailing zero bytes to
/// 4-byte boundaries, then lays out the GLB header and both chunks exactly
/// as the container format requires.
fn assemble(mut json: Vec<u8>, mut bin: Vec<u8>) -> Vec<u8> {
    while json.len() % 4 != 0 {
        json.push(0x20);
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total_length = 12 + (8 + json.len()) + (8 + bin.len());
    let mut out = Vec::with_capacity(total_length);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&(total_length as u32).to_le_bytes());

    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    out.extend_from_slice(&json);

    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
    out.extend_from_slice(&bin);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh::IndexedMesh;

    fn triangle() -> IndexedMesh {
        let mut mesh = IndexedMesh::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2]);
        mesh.normals = Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        mesh
    }

    #[test]
    fn header_declares_the_correct_total_length() {
        let glb = write_glb(&triangle(), None, None).unwrap();
        assert_eq!(&glb[0..4], b"glTF");
        let version = u32::from_le_bytes(glb[4..8].try_into().unwrap());
        assert_eq!(version, 2);
        let declared_length = u32::from_le_bytes(glb[8..12].try_into().unwrap()) as usize;
        assert_eq!(declared_length, glb.len());
    }

    #[test]
    fn json_chunk_length_is_four_byte_aligned() {
        let glb = write_glb(&triangle(), None, None).unwrap();
        let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap());
        assert_eq!(json_len % 4, 0);
        let chunk_type = u32::from_le_bytes(glb[16..20].try_into().unwrap());
        assert_eq!(chunk_type, CHUNK_TYPE_JSON);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mesh = IndexedMesh::new(Vec::new(), Vec::new());
        assert!(matches!(write_glb(&mesh, None, None), Err(GlbError::EmptyMesh)));
    }

    #[test]
    fn small_mesh_uses_u16_indices() {
        let glb = write_glb(&triangle(), None, None).unwrap();
        // Find the JSON chunk and confirm the index accessor's componentType.
        let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
        let json_bytes = &glb[20..20 + json_len];
        let doc: serde_json::Value = serde_json::from_slice(json_bytes).unwrap();
        let component_type = doc["accessors"][0]["componentType"].as_u64().unwrap();
        assert_eq!(component_type, COMPONENT_TYPE_U16 as u64);
    }
}
