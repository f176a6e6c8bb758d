// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Descriptions of the resource bindings referenced by a processed shader pair. The
//! transpiler does not create any GPU objects, it only describes what bind group layouts
//! have to look like.

use bitflags::bitflags;
use strum_macros::{AsRefStr, EnumString, VariantNames};

bitflags! {
    /// Set of shader stages a binding is visible from.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ShaderStages: u32 {
        const VERTEX = 0b01;
        const FRAGMENT = 0b10;
    }
}

impl ShaderStages {
    pub fn from_fragment_flag(is_fragment: bool) -> Self {
        if is_fragment {
            Self::FRAGMENT
        } else {
            Self::VERTEX
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, AsRefStr)]
pub enum TextureViewDimension {
    #[strum(serialize = "1d")]
    D1,
    #[strum(serialize = "2d")]
    D2,
    #[strum(serialize = "2d-array")]
    D2Array,
    #[strum(serialize = "3d")]
    D3,
    #[strum(serialize = "cube")]
    Cube,
    #[strum(serialize = "cube-array")]
    CubeArray,
}

/// Texture type keyword of a texture declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, AsRefStr, EnumString, VariantNames)]
pub enum TextureFunction {
    #[strum(serialize = "texture_1d")]
    Texture1d,
    #[strum(serialize = "texture_2d")]
    Texture2d,
    #[strum(serialize = "texture_2d_array")]
    Texture2dArray,
    #[strum(serialize = "texture_3d")]
    Texture3d,
    #[strum(serialize = "texture_cube")]
    TextureCube,
    #[strum(serialize = "texture_cube_array")]
    TextureCubeArray,
    #[strum(serialize = "texture_multisampled_2d")]
    TextureMultisampled2d,
    #[strum(serialize = "texture_depth_2d")]
    TextureDepth2d,
    #[strum(serialize = "texture_depth_2d_array")]
    TextureDepth2dArray,
    #[strum(serialize = "texture_depth_cube")]
    TextureDepthCube,
    #[strum(serialize = "texture_depth_cube_array")]
    TextureDepthCubeArray,
    #[strum(serialize = "texture_depth_multisampled_2d")]
    TextureDepthMultisampled2d,
    #[strum(serialize = "texture_storage_1d")]
    TextureStorage1d,
    #[strum(serialize = "texture_storage_2d")]
    TextureStorage2d,
    #[strum(serialize = "texture_storage_2d_array")]
    TextureStorage2dArray,
    #[strum(serialize = "texture_storage_3d")]
    TextureStorage3d,
    #[strum(serialize = "texture_external")]
    TextureExternal,
}

impl TextureFunction {
    /// View dimension of the texture, external textures have none.
    pub fn view_dimension(self) -> Option<TextureViewDimension> {
        use TextureFunction::*;
        match self {
            Texture1d | TextureStorage1d => Some(TextureViewDimension::D1),
            Texture2d
            | TextureMultisampled2d
            | TextureDepth2d
            | TextureDepthMultisampled2d
            | TextureStorage2d => Some(TextureViewDimension::D2),
            Texture2dArray | TextureDepth2dArray | TextureStorage2dArray => {
                Some(TextureViewDimension::D2Array)
            }
            Texture3d | TextureStorage3d => Some(TextureViewDimension::D3),
            TextureCube | TextureDepthCube => Some(TextureViewDimension::Cube),
            TextureCubeArray | TextureDepthCubeArray => Some(TextureViewDimension::CubeArray),
            TextureExternal => None,
        }
    }

    pub fn is_depth(self) -> bool {
        self.as_ref().contains("depth")
    }

    pub fn is_storage(self) -> bool {
        self.as_ref().contains("storage")
    }

    pub fn is_multisampled(self) -> bool {
        self.as_ref().contains("multisampled")
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, AsRefStr)]
pub enum TextureSampleType {
    #[default]
    #[strum(serialize = "float")]
    Float,
    #[strum(serialize = "depth")]
    Depth,
    #[strum(serialize = "sint")]
    Sint,
    #[strum(serialize = "uint")]
    Uint,
}

impl TextureSampleType {
    /// Picks the sample type from the texture keyword and the component type token (`f32`,
    /// `i32`, `u32`).
    pub fn from_declaration(function: TextureFunction, component_type: Option<&str>) -> Self {
        if function.is_depth() {
            return Self::Depth;
        }
        match component_type.map(str::trim) {
            Some("u32") => Self::Uint,
            Some("i32") => Self::Sint,
            _ => Self::Float,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, AsRefStr, EnumString)]
pub enum StorageTextureAccess {
    #[default]
    #[strum(serialize = "write")]
    WriteOnly,
    #[strum(serialize = "read")]
    ReadOnly,
    #[strum(serialize = "read_write")]
    ReadWrite,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, AsRefStr)]
pub enum SamplerBindingType {
    #[default]
    #[strum(serialize = "filtering")]
    Filtering,
    #[strum(serialize = "comparison")]
    Comparison,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, AsRefStr)]
pub enum BufferBindingType {
    #[default]
    #[strum(serialize = "uniform")]
    Uniform,
    #[strum(serialize = "read-only-storage")]
    ReadOnlyStorage,
    #[strum(serialize = "storage")]
    Storage,
}

impl BufferBindingType {
    /// Maps the address space (`uniform`, `storage`) and the optional access mode
    /// (`read`, `read_write`) of a `var<...>` declaration.
    pub fn from_declaration(address_space: &str, access: Option<&str>) -> Self {
        if access == Some("read_write") {
            Self::Storage
        } else if address_space == "storage" {
            Self::ReadOnlyStorage
        } else {
            Self::Uniform
        }
    }
}

/// Resource bound at a binding slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingResource {
    Texture {
        sample_type: TextureSampleType,
        view_dimension: TextureViewDimension,
        multisampled: bool,
    },
    StorageTexture {
        /// Texel format, as written in the declaration (`rgba8unorm` for instance).
        format: String,
        access: StorageTextureAccess,
        view_dimension: TextureViewDimension,
    },
    ExternalTexture,
    Sampler(SamplerBindingType),
    Buffer(BufferBindingType),
}

/// Description of a single binding slot of a bind group layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindGroupLayoutEntry {
    pub binding: u32,
    /// Name of the resource. Elements of texture arrays are suffixed with their index.
    pub name: String,
    pub visibility: ShaderStages,
    pub resource: BindingResource,
}
