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

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SamplerSettings {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WrapMode {
    #[default]
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FilterMode {
    #[default]
    Linear,
    Nearest,
}

/// A raw encoded texture image plus enough metadata to decode or re-encode
/// it without a second source-format lookup.
#[derive(Clone, Debug)]
pub struct TextureImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub sampler: SamplerSettings,
}

#[derive(Clone, Debug)]
pub struct Material {
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub base_color_texture: Option<usize>,
    pub metallic_roughness_texture: Option<usize>,
    pub normal_texture: Option<usize>,
    pub alpha_mode: AlphaMode,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            base_color_texture: None,
            metallic_roughness_texture: None,
            normal_texture: None,
            alpha_mode: AlphaMode::Opaque,
            double_sided: false,
        }
    }
}

/// Shared, read-only across the whole tile tree for the lifetime of one
/// tiling run: every worker thread that descends into a subtree only ever
/// reads from this, so it needs no locking (see the concurrency model).
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    textures: Vec<TextureImage>,
}

impl MaterialLibrary {
    pub fn new(materials: Vec<Material>, textures: Vec<TextureImage>) -> Self {
        Self {
            materials,
            textures,
        }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn textures(&self) -> &[TextureImage] {
        &self.textures
    }

    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    pub fn texture(&self, index: usize) -> Option<&TextureImage> {
        self.textures.get(index)
    }

    /// Resolve the base-color texture actually backing `material`, if any.
    pub fn base_color_texture_of(&self, material: usize) -> Option<&TextureImage> {
        let material = self.materials.get(material)?;
        let texture_index = material.base_color_texture?;
        self.texture(texture_index)
    }
}
