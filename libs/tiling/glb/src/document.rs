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

//! The subset of the glTF 2.0 JSON schema one tile needs: a single node
//! with a single mesh primitive, PBR metallic-roughness materials, and one
//! embedded buffer backed by the GLB's BIN chunk. Hand-written `Serialize`
//! structs rather than a full glTF crate — a tile is always this one shape,
//! so a general-purpose scene graph would be pure overhead.

use serde::Serialize;

pub const COMPONENT_TYPE_U16: u32 = 5123;
pub const COMPONENT_TYPE_U32: u32 = 5125;
pub const COMPONENT_TYPE_F32: u32 = 5126;

pub const TARGET_ARRAY_BUFFER: u32 = 34962;
pub const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

pub const PRIMITIVE_TRIANGLES: u32 = 4;

#[derive(Serialize)]
pub struct Document {
    pub asset: Asset,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions_used: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions_required: Vec<String>,
    pub buffers: Vec<Buffer>,
    #[serde(rename = "bufferViews")]
    pub buffer_views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub samplers: Vec<Sampler>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub textures: Vec<Texture>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    pub meshes: Vec<Mesh>,
    pub nodes: Vec<Node>,
    pub scenes: Vec<Scene>,
    pub scene: u32,
}

#[derive(Serialize)]
pub struct Asset {
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct Buffer {
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
}

#[derive(Serialize)]
pub struct BufferView {
    pub buffer: u32,
    #[serde(rename = "byteOffset")]
    pub byte_offset: usize,
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
    #[serde(rename = "byteStride", skip_serializing_if = "Option::is_none")]
    pub byte_stride: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

#[derive(Serialize)]
pub struct Accessor {
    #[serde(rename = "bufferView")]
    pub buffer_view: u32,
    #[serde(rename = "byteOffset")]
    pub byte_offset: usize,
    #[serde(rename = "componentType")]
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f64>>,
}

#[derive(Serialize, Default)]
pub struct Attributes {
    #[serde(rename = "POSITION")]
    pub position: u32,
    #[serde(rename = "NORMAL", skip_serializing_if = "Option::is_none")]
    pub normal: Option<u32>,
    #[serde(rename = "TEXCOORD_0", skip_serializing_if = "Option::is_none")]
    pub texcoord_0: Option<u32>,
    #[serde(rename = "COLOR_0", skip_serializing_if = "Option::is_none")]
    pub color_0: Option<u32>,
}

#[derive(Serialize)]
pub struct Primitive {
    pub attributes: Attributes,
    pub indices: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<u32>,
    pub mode: u32,
}

#[derive(Serialize)]
pub struct Mesh {
    pub primitives: Vec<Primitive>,
}

#[derive(Serialize)]
pub struct Node {
    pub mesh: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f64; 16]>,
}

#[derive(Serialize)]
pub struct Scene {
    pub nodes: Vec<u32>,
}

#[derive(Serialize)]
pub struct PbrMetallicRoughness {
    #[serde(rename = "baseColorFactor")]
    pub base_color_factor: [f32; 4],
    #[serde(rename = "baseColorTexture", skip_serializing_if = "Option::is_none")]
    pub base_color_texture: Option<TextureRef>,
    #[serde(rename = "metallicFactor")]
    pub metallic_factor: f32,
    #[serde(rename = "roughnessFactor")]
    pub roughness_factor: f32,
    #[serde(
        rename = "metallicRoughnessTexture",
        skip_serializing_if = "Option::is_none"
    )]
    pub metallic_roughness_texture: Option<TextureRef>,
}

#[derive(Serialize)]
pub struct TextureRef {
    pub index: u32,
}

#[derive(Serialize)]
pub struct Material {
    #[serde(rename = "pbrMetallicRoughness")]
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    #[serde(rename = "alphaMode")]
    pub alpha_mode: &'static str,
    #[serde(rename = "doubleSided")]
    pub double_sided: bool,
}

#[derive(Serialize)]
pub struct Texture {
    pub source: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampler: Option<u32>,
    #[serde(
        rename = "KHR_texture_basisu",
        skip_serializing_if = "Option::is_none"
    )]
    pub basisu_extension: Option<BasisuExtension>,
}

#[derive(Serialize)]
pub struct BasisuExtension {
    pub source: u32,
}

#[derive(Serialize)]
pub struct Image {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "bufferView")]
    pub buffer_view: u32,
}

#[derive(Serialize)]
pub struct Sampler {
    #[serde(rename = "magFilter")]
    pub mag_filter: u32,
    #[serde(rename = "minFilter")]
    pub min_filter: u32,
    #[serde(rename = "wrapS")]
    pub wrap_s: u32,
    #[serde(rename = "wrapT")]
    pub wrap_t: u32,
}
