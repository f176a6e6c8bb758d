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

//! Processing context holds all allocation state of a single shader pair compile. Both stages
//! are processed against the same context, the vertex stage strictly first: fragment stage
//! varyings are only looked up among the ones the vertex stage has declared.
//!
//! A context must never be shared between compiles that run concurrently, create a new one
//! for every shader pair instead.

use crate::{
    error::{LocationKind, ShaderProcessingError},
    layout::{
        BindGroupLayoutEntry, BindingResource, BufferBindingType, SamplerBindingType,
        ShaderStages, TextureSampleType,
    },
    settings::BindingLimits,
    types::location_slot_count,
};
use fxhash::FxHashMap;
use std::collections::BTreeMap;

/// Uniform buffers provided by the engine itself. Their bindings are shared by every shader
/// that declares them and are keyed by the structure name rather than the variable name.
pub const KNOWN_UNIFORM_BUFFERS: [&str; 8] = [
    "Scene", "Light0", "Light1", "Light2", "Light3", "Material", "Mesh", "Internals",
];

pub fn is_known_uniform_buffer(struct_name: &str) -> bool {
    KNOWN_UNIFORM_BUFFERS.contains(&struct_name)
}

/// Address of a GPU-visible resource slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingPair {
    pub group_index: u32,
    pub binding_index: u32,
}

impl BindingPair {
    /// WGSL attributes for the pair: `@group(G) @binding(B) `.
    pub fn wgsl_attributes(&self) -> String {
        format!(
            "@group({}) @binding({}) ",
            self.group_index, self.binding_index
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureBinding {
    pub is_texture_array: bool,
    pub is_storage_texture: bool,
    /// One binding per array element, a single one for plain textures.
    pub textures: Vec<BindingPair>,
    pub sample_type: TextureSampleType,
    /// Set when a sampler named `<texture>Sampler` is declared, bind group creation then binds
    /// the sampler of the texture automatically.
    pub auto_bind_sampler: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SamplerBinding {
    pub binding: BindingPair,
    pub kind: SamplerBindingType,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BufferBinding {
    pub binding: BindingPair,
    pub kind: BufferBindingType,
}

/// A plain uniform gathered into the leftover uniform buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformEntry {
    pub name: String,
    pub ty: String,
    /// `0` for non-arrays.
    pub length: u32,
}

/// Declarations generated while the stages are scanned. They are turned into the stage
/// input/output structures by the finalizer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageInterface {
    /// Fields of the raw vertex input structure.
    pub attribute_inputs: Vec<String>,
    /// Fields of the converted vertex input structure, used when some attribute has to be
    /// converted from an integer vertex buffer.
    pub attributes: Vec<String>,
    /// Statements copying (and converting) raw inputs to the working inputs.
    pub attribute_conversions: Vec<String>,
    pub has_non_float_attribute: bool,
    /// Fields of the vertex output / fragment input structure.
    pub varyings: Vec<String>,
    pub varying_names: Vec<String>,
    /// Leftover uniform arrays whose elements are padded to a 16 bytes stride.
    pub strided_uniform_arrays: Vec<String>,
}

/// See module docs.
#[derive(Clone, Debug)]
pub struct ProcessingContext {
    /// Attribute name to location.
    pub available_attributes: FxHashMap<String, u32>,
    /// Location to attribute name.
    pub ordered_attributes: BTreeMap<u32, String>,
    /// Varying name to location.
    pub available_varyings: FxHashMap<String, u32>,
    pub available_textures: FxHashMap<String, TextureBinding>,
    pub available_samplers: FxHashMap<String, SamplerBinding>,
    pub available_buffers: FxHashMap<String, BufferBinding>,
    pub left_over_uniforms: Vec<UniformEntry>,
    /// Host provided table of vertex buffers that hold integer data. Key is the attribute
    /// name, value is the amount of components: negative for signed, positive for unsigned
    /// integers.
    pub vertex_buffer_kind_components: FxHashMap<String, i32>,
    pub interface: StageInterface,
    /// Non-fatal problems found during the compile.
    pub diagnostics: Vec<String>,
    bind_group_layouts: Vec<Vec<BindGroupLayoutEntry>>,
    limits: BindingLimits,
    free_group_index: u32,
    free_binding_index: u32,
    attribute_next_location: u32,
    varying_next_location: u32,
}

impl Default for ProcessingContext {
    fn default() -> Self {
        Self::new(BindingLimits::default())
    }
}

impl ProcessingContext {
    pub fn new(limits: BindingLimits) -> Self {
        Self {
            available_attributes: Default::default(),
            ordered_attributes: Default::default(),
            available_varyings: Default::default(),
            available_textures: Default::default(),
            available_samplers: Default::default(),
            available_buffers: Default::default(),
            left_over_uniforms: Default::default(),
            vertex_buffer_kind_components: Default::default(),
            interface: Default::default(),
            diagnostics: Default::default(),
            bind_group_layouts: Default::default(),
            limits,
            free_group_index: 0,
            free_binding_index: 0,
            attribute_next_location: 0,
            varying_next_location: 0,
        }
    }

    /// Registers a vertex buffer that supplies integer components, see
    /// [`Self::vertex_buffer_kind_components`].
    pub fn with_integer_vertex_buffer<S: Into<String>>(mut self, name: S, components: i32) -> Self {
        self.vertex_buffer_kind_components
            .insert(name.into(), components);
        self
    }

    pub fn limits(&self) -> &BindingLimits {
        &self.limits
    }

    /// Returns the next unused binding pair. Pairs are never reused within a compile, when a
    /// group is full the allocation moves on to the next group.
    pub fn next_free_binding(&mut self) -> Result<BindingPair, ShaderProcessingError> {
        if self.free_binding_index >= self.limits.max_bindings_per_group {
            self.free_group_index += 1;
            self.free_binding_index = 0;
        }

        if self.free_group_index >= self.limits.max_groups {
            return Err(ShaderProcessingError::TooManyBindings {
                max_groups: self.limits.max_groups,
            });
        }

        let pair = BindingPair {
            group_index: self.free_group_index,
            binding_index: self.free_binding_index,
        };
        self.free_binding_index += 1;

        Ok(pair)
    }

    fn next_location(
        next: &mut u32,
        max: u32,
        kind: LocationKind,
        name: &str,
        ty: &str,
        array_length: u32,
    ) -> Result<u32, ShaderProcessingError> {
        let slots = location_slot_count(ty) * array_length.max(1);
        let location = *next;
        if location + slots > max {
            return Err(ShaderProcessingError::LocationsExhausted {
                kind,
                name: name.to_string(),
                max,
            });
        }
        *next += slots;
        Ok(location)
    }

    /// Allocates the locations of an attribute and returns the first one.
    pub fn attribute_next_location(
        &mut self,
        name: &str,
        ty: &str,
        array_length: u32,
    ) -> Result<u32, ShaderProcessingError> {
        Self::next_location(
            &mut self.attribute_next_location,
            self.limits.max_attribute_locations,
            LocationKind::Attribute,
            name,
            ty,
            array_length,
        )
    }

    /// Allocates the locations of a varying and returns the first one.
    pub fn varying_next_location(
        &mut self,
        name: &str,
        ty: &str,
        array_length: u32,
    ) -> Result<u32, ShaderProcessingError> {
        Self::next_location(
            &mut self.varying_next_location,
            self.limits.max_varying_locations,
            LocationKind::Varying,
            name,
            ty,
            array_length,
        )
    }

    /// Adds a uniform to the leftover uniform buffer, uniforms with an already registered name
    /// are ignored (both stages usually declare the same uniforms).
    pub fn add_left_over_uniform(&mut self, entry: UniformEntry) {
        if !self.left_over_uniforms.iter().any(|u| u.name == entry.name) {
            self.left_over_uniforms.push(entry);
        }
    }

    /// Describes a binding slot. Describing the same slot again (from the other stage) only
    /// extends its visibility.
    pub fn describe_binding(
        &mut self,
        pair: BindingPair,
        name: &str,
        stage: ShaderStages,
        resource: BindingResource,
    ) {
        let group = pair.group_index as usize;
        if self.bind_group_layouts.len() <= group {
            self.bind_group_layouts.resize_with(group + 1, Vec::new);
        }

        let entries = &mut self.bind_group_layouts[group];
        match entries.iter_mut().find(|e| e.binding == pair.binding_index) {
            Some(entry) => {
                entry.visibility |= stage;
                entry.resource = resource;
            }
            None => entries.push(BindGroupLayoutEntry {
                binding: pair.binding_index,
                name: name.to_string(),
                visibility: stage,
                resource,
            }),
        }
    }

    /// Layout entries of every bind group, indexed by group.
    pub fn bind_group_layouts(&self) -> &[Vec<BindGroupLayoutEntry>] {
        &self.bind_group_layouts
    }

    /// Names of the bound resources, indexed by group and then by binding. Unused slots get an
    /// empty name.
    pub fn binding_names(&self) -> Vec<Vec<String>> {
        self.bind_group_layouts
            .iter()
            .map(|entries| {
                let count = entries.iter().map(|e| e.binding + 1).max().unwrap_or(0);
                let mut names = vec![String::new(); count as usize];
                for entry in entries {
                    names[entry.binding as usize] = entry.name.clone();
                }
                names
            })
            .collect()
    }

    /// Emits a non-fatal warning.
    pub fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.diagnostics.push(message);
    }

    /// Prepares the context for a new shader pair: locations restart from zero, attribute and
    /// varying tables, leftover uniforms, diagnostics and the stage interface are cleared.
    /// Bindings and the host vertex buffer table stay.
    pub fn begin_compile(&mut self) {
        self.available_attributes.clear();
        self.ordered_attributes.clear();
        self.available_varyings.clear();
        self.left_over_uniforms.clear();
        self.diagnostics.clear();
        self.interface = Default::default();
        self.attribute_next_location = 0;
        self.varying_next_location = 0;
    }

    /// Clears the per-compile stage interface bookkeeping and the vertex buffer table, so
    /// stale data never leaks into the next compile. Binding tables and locations stay
    /// intact, bind group and pipeline creation read them afterwards.
    pub fn reset_stage_interface(&mut self) {
        self.interface = Default::default();
        self.vertex_buffer_kind_components.clear();
    }
}
