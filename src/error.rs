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

//! Contains all possible errors that may occur while transpiling a shader pair.

/// Kind of a location-based stage interface resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocationKind {
    /// Vertex attribute.
    Attribute,
    /// Varying passed from the vertex stage to the fragment stage.
    Varying,
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationKind::Attribute => write!(f, "attribute"),
            LocationKind::Varying => write!(f, "varying"),
        }
    }
}

/// Set of possible shader processing errors. Any of these aborts the current compile, no
/// partially processed stage is returned.
#[derive(Debug, thiserror::Error)]
pub enum ShaderProcessingError {
    /// A texture declaration uses a texture type that has no known view dimension.
    #[error(
        "Can't get the texture dimension corresponding to the texture function \"{}\" of texture \"{}\"! Declaration: {}",
        function,
        texture,
        declaration
    )]
    UnknownTextureFunction {
        /// Name of the texture variable.
        texture: String,
        /// The unrecognized texture type keyword.
        function: String,
        /// Offending declaration line.
        declaration: String,
    },
    /// Every binding slot of every permitted bind group is taken.
    #[error(
        "Too many textures or buffers have been declared, only {} bind groups are supported",
        max_groups
    )]
    TooManyBindings {
        /// Maximum amount of bind groups.
        max_groups: u32,
    },
    /// Attribute or varying locations are exhausted.
    #[error(
        "Unable to allocate a location for {} \"{}\": only {} locations are available",
        kind,
        name,
        max
    )]
    LocationsExhausted {
        /// Kind of the resource.
        kind: LocationKind,
        /// Name of the attribute or varying.
        name: String,
        /// Maximum amount of locations.
        max: u32,
    },
    /// Processor settings are malformed.
    #[error("Invalid shader processor settings: {0}")]
    InvalidSettings(#[from] ron::error::SpannedError),
}
