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

//! Declaration processors. Each one checks whether a piece of source is its kind of
//! declaration; if it is not, `None` is returned and the source must be passed through
//! untouched, otherwise the resource is registered in the processing context and the
//! replacement text is returned (empty when the declaration is fully consumed).

use crate::{
    context::{
        is_known_uniform_buffer, BufferBinding, ProcessingContext, SamplerBinding,
        TextureBinding, UniformEntry,
    },
    defines::DefineSet,
    error::ShaderProcessingError,
    layout::{
        BindingResource, BufferBindingType, SamplerBindingType, ShaderStages,
        StorageTextureAccess, TextureFunction, TextureSampleType,
    },
    types::resolve_array_type,
};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::str::FromStr;
use strum::VariantNames;

/// A sampler named `<texture><suffix>` is the sampler of `<texture>`.
pub const AUTO_SAMPLER_SUFFIX: &str = "Sampler";

lazy_static! {
    static ref ATTRIBUTE_RE: Regex =
        Regex::new(r"^\s*attribute\s+(\w+)\s*:\s*(.+?)\s*;").unwrap();
    static ref VARYING_CHECK_RE: Regex = Regex::new(
        r"^\s*(?:(?:flat|linear|perspective)\s+)?(?:(?:center|centroid|sample)\s+)?varying\b"
    )
    .unwrap();
    static ref VARYING_RE: Regex = Regex::new(
        r"^\s*(?:(flat|linear|perspective)\s+)?(?:(center|centroid|sample)\s+)?varying\s+(?:(?:highp|mediump|lowp)\s+)?(\w+)\s*:\s*(.+?)\s*;"
    )
    .unwrap();
    static ref UNIFORM_RE: Regex = Regex::new(r"^\s*uniform\s+(\w+)\s*:\s*(.+?)\s*;").unwrap();
    static ref TEXTURE_RE: Regex = Regex::new(
        r"^(\s*)var\s+(\w+)\s*:\s*((array<\s*)?(texture_\w+)\s*(?:<\s*(.+?)\s*>)?\s*(?:,\s*\w+\s*>\s*)?);"
    )
    .unwrap();
    static ref SAMPLER_RE: Regex =
        Regex::new(r"\bvar\s+(\w+)\s*:\s*(sampler|sampler_comparison)\s*;").unwrap();
    static ref CUSTOM_BUFFER_RE: Regex = Regex::new(
        r"\bvar<\s*(uniform|storage)\s*(?:,\s*(read|read_write)\s*)?>\s+(\w+)\s*:\s*([^;]+?)\s*;"
    )
    .unwrap();
}

/// `attribute NAME : TYPE;`
pub fn process_attribute(
    line: &str,
    defines: &DefineSet,
    context: &mut ProcessingContext,
) -> Result<Option<String>, ShaderProcessingError> {
    let Some(captures) = ATTRIBUTE_RE.captures(line) else {
        return Ok(None);
    };
    let name = &captures[1];
    let ty = &captures[2];

    let resolved = resolve_array_type(name, ty, defines);
    let location =
        context.attribute_next_location(name, &resolved.element_type, resolved.length)?;
    context
        .available_attributes
        .insert(name.to_string(), location);
    context.ordered_attributes.insert(location, name.to_string());

    let components = context.vertex_buffer_kind_components.get(name).copied();
    let interface = &mut context.interface;
    match components {
        Some(components) => {
            // The vertex buffer holds integers while the shader wants floats: read the raw
            // integers and convert them in the prologue of the entry point.
            let int_type = match components {
                -1 => "i32".to_string(),
                c if c < 0 => format!("vec{}<i32>", -c),
                1 => "u32".to_string(),
                c => format!("vec{c}<u32>"),
            };
            let int_name = format!("_int_{name}_");

            interface
                .attribute_inputs
                .push(format!("  @location({location}) {int_name} : {int_type},"));
            interface.attributes.push(format!("  {name} : {ty},"));
            interface
                .attribute_conversions
                .push(format!("vertexInputs.{name} = {ty}(vertexInputs_.{int_name});"));
            interface.has_non_float_attribute = true;
        }
        None => {
            interface
                .attribute_inputs
                .push(format!("  @location({location}) {name} : {ty},"));
            interface.attributes.push(format!("  {name} : {ty},"));
            interface
                .attribute_conversions
                .push(format!("vertexInputs.{name} = vertexInputs_.{name};"));
        }
    }

    Ok(Some(String::new()))
}

/// Quick check used by the line dispatcher before running [`process_varying`].
pub fn is_varying_declaration(line: &str) -> bool {
    VARYING_CHECK_RE.is_match(line)
}

/// `[flat|linear|perspective] [center|centroid|sample] varying NAME : TYPE;`
///
/// The vertex stage allocates locations, the fragment stage only looks them up. A fragment
/// varying unknown to the vertex stage is dropped with a warning.
pub fn process_varying(
    line: &str,
    is_fragment: bool,
    defines: &DefineSet,
    context: &mut ProcessingContext,
) -> Result<Option<String>, ShaderProcessingError> {
    let Some(captures) = VARYING_RE.captures(line) else {
        return Ok(None);
    };
    let interpolation_type = captures.get(1).map_or("perspective", |m| m.as_str());
    let interpolation_sampling = captures.get(2).map_or("center", |m| m.as_str());
    let name = &captures[3];
    let ty = &captures[4];

    if is_fragment {
        if !context.available_varyings.contains_key(name) {
            context.warn(format!(
                "Invalid fragment shader: The varying named \"{name}\" is not declared in the \
                vertex shader! This declaration will be ignored."
            ));
        }
    } else {
        let interpolation = if interpolation_type == "flat" {
            "@interpolate(flat)".to_string()
        } else {
            format!("@interpolate({interpolation_type}, {interpolation_sampling})")
        };

        let resolved = resolve_array_type(name, ty, defines);
        let location =
            context.varying_next_location(name, &resolved.element_type, resolved.length)?;
        context.available_varyings.insert(name.to_string(), location);
        context
            .interface
            .varyings
            .push(format!("  @location({location}) {interpolation} {name} : {ty},"));
        context.interface.varying_names.push(name.to_string());
    }

    Ok(Some(String::new()))
}

/// `uniform NAME : TYPE;` - the uniform goes to the leftover uniform buffer, the declaration
/// itself is removed.
pub fn process_uniform(
    line: &str,
    defines: &DefineSet,
    context: &mut ProcessingContext,
) -> Option<String> {
    let captures = UNIFORM_RE.captures(line)?;
    let resolved = resolve_array_type(&captures[1], &captures[2], defines);
    context.add_left_over_uniform(UniformEntry {
        name: resolved.name,
        ty: resolved.element_type,
        length: resolved.length,
    });
    Some(String::new())
}

/// `var NAME : texture_KIND<...>;` or `var NAME : array<texture_KIND<...>, N>;`
///
/// Every array element gets its own binding. A texture already registered (by the other
/// stage) keeps its bindings and sample type. The declaration stays in place, annotated with
/// the binding of its first element.
pub fn process_texture(
    line: &str,
    is_fragment: bool,
    defines: &DefineSet,
    context: &mut ProcessingContext,
) -> Result<Option<String>, ShaderProcessingError> {
    let Some(captures) = TEXTURE_RE.captures(line) else {
        return Ok(None);
    };
    let indent = &captures[1];
    let name = &captures[2];
    let ty = &captures[3];
    let is_array_of_textures = captures.get(4).is_some();
    let function_str = &captures[5];
    let component_type = captures.get(6).map(|m| m.as_str());

    let function = TextureFunction::from_str(function_str).map_err(|_| {
        log::error!(
            "Unknown texture type \"{}\", supported types are: {:?}",
            function_str,
            TextureFunction::VARIANTS
        );
        ShaderProcessingError::UnknownTextureFunction {
            texture: name.to_string(),
            function: function_str.to_string(),
            declaration: line.trim().to_string(),
        }
    })?;

    let array_size = if is_array_of_textures {
        resolve_array_type(name, ty, defines).length
    } else {
        0
    };

    if !context.available_textures.contains_key(name) {
        let textures = (0..array_size.max(1))
            .map(|_| context.next_free_binding())
            .collect::<Result<Vec<_>, _>>()?;
        context.available_textures.insert(
            name.to_string(),
            TextureBinding {
                is_texture_array: array_size > 0,
                is_storage_texture: function.is_storage(),
                textures,
                sample_type: TextureSampleType::from_declaration(function, component_type),
                auto_bind_sampler: false,
            },
        );
    }
    let Some(texture) = context.available_textures.get(name).cloned() else {
        return Ok(None);
    };

    let resource = match function.view_dimension() {
        Some(view_dimension) if function.is_storage() => {
            let mut params = component_type.unwrap_or_default().split(',');
            let format = params.next().unwrap_or_default().trim().to_string();
            let access = params
                .next()
                .and_then(|access| StorageTextureAccess::from_str(access.trim()).ok())
                .unwrap_or_default();
            BindingResource::StorageTexture {
                format,
                access,
                view_dimension,
            }
        }
        Some(view_dimension) => BindingResource::Texture {
            sample_type: texture.sample_type,
            view_dimension,
            multisampled: function.is_multisampled(),
        },
        None => BindingResource::ExternalTexture,
    };

    let stage = ShaderStages::from_fragment_flag(is_fragment);
    for (i, pair) in texture.textures.iter().enumerate() {
        let binding_name = if texture.is_texture_array {
            format!("{name}{i}")
        } else {
            name.to_string()
        };
        context.describe_binding(*pair, &binding_name, stage, resource.clone());
    }

    let first = texture.textures[0];
    Ok(Some(format!(
        "{indent}{}{}",
        first.wgsl_attributes(),
        &line[indent.len()..]
    )))
}

/// Whether the line holding the match already carries a binding attribute.
fn is_already_bound(code: &str, position: usize) -> bool {
    let line_start = code[..position].rfind('\n').map_or(0, |i| i + 1);
    code[line_start..position].contains("@binding(")
}

/// Inserts binding attributes in front of every match of the pattern. The callback registers
/// the resource and returns its binding attributes.
fn annotate_declarations<F>(
    code: &str,
    pattern: &Regex,
    mut annotate: F,
) -> Result<String, ShaderProcessingError>
where
    F: FnMut(&Captures) -> Result<String, ShaderProcessingError>,
{
    let mut result = String::with_capacity(code.len());
    let mut last = 0;
    for captures in pattern.captures_iter(code) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if is_already_bound(code, whole.start()) {
            continue;
        }
        let attributes = annotate(&captures)?;
        result += &code[last..whole.start()];
        result += &attributes;
        last = whole.start();
    }
    result += &code[last..];
    Ok(result)
}

/// `var NAME : sampler;` and `var NAME : sampler_comparison;` anywhere in the code.
pub fn process_samplers(
    code: &str,
    is_fragment: bool,
    context: &mut ProcessingContext,
) -> Result<String, ShaderProcessingError> {
    let stage = ShaderStages::from_fragment_flag(is_fragment);
    annotate_declarations(code, &SAMPLER_RE, |captures| {
        let name = &captures[1];
        let kind = if &captures[2] == "sampler_comparison" {
            SamplerBindingType::Comparison
        } else {
            SamplerBindingType::Filtering
        };

        if let Some(texture_name) = name
            .strip_suffix(AUTO_SAMPLER_SUFFIX)
            .filter(|texture_name| !texture_name.is_empty())
        {
            if let Some(texture) = context.available_textures.get_mut(texture_name) {
                texture.auto_bind_sampler = true;
            }
        }

        let binding = match context.available_samplers.get(name) {
            Some(sampler) => sampler.binding,
            None => {
                let binding = context.next_free_binding()?;
                context
                    .available_samplers
                    .insert(name.to_string(), SamplerBinding { binding, kind });
                binding
            }
        };

        context.describe_binding(binding, name, stage, BindingResource::Sampler(kind));

        Ok(binding.wgsl_attributes())
    })
}

/// `var<uniform> NAME : STRUCT;` and `var<storage[, read|read_write]> NAME : STRUCT;`
/// anywhere in the code. Engine-known uniform buffers are registered under their structure
/// name so every shader shares the same binding for them.
pub fn process_custom_buffers(
    code: &str,
    is_fragment: bool,
    context: &mut ProcessingContext,
) -> Result<String, ShaderProcessingError> {
    let stage = ShaderStages::from_fragment_flag(is_fragment);
    annotate_declarations(code, &CUSTOM_BUFFER_RE, |captures| {
        let address_space = &captures[1];
        let kind = BufferBindingType::from_declaration(
            address_space,
            captures.get(2).map(|m| m.as_str()),
        );
        let mut name = &captures[3];
        let struct_name = &captures[4];

        let binding = match context.available_buffers.get(name) {
            Some(buffer) => buffer.binding,
            None => {
                if address_space == "uniform" && is_known_uniform_buffer(struct_name) {
                    name = struct_name;
                }
                match context.available_buffers.get(name) {
                    Some(buffer) => buffer.binding,
                    None => context.next_free_binding()?,
                }
            }
        };
        context
            .available_buffers
            .insert(name.to_string(), BufferBinding { binding, kind });

        context.describe_binding(binding, name, stage, BindingResource::Buffer(kind));

        Ok(binding.wgsl_attributes())
    })
}

#[cfg(test)]
mod test {
    use crate::{
        context::{BindingPair, ProcessingContext, UniformEntry},
        declarations::{
            is_varying_declaration, process_attribute, process_custom_buffers,
            process_samplers, process_texture, process_uniform, process_varying,
        },
        defines::DefineSet,
        error::ShaderProcessingError,
        layout::{
            BindingResource, BufferBindingType, ShaderStages, StorageTextureAccess,
            TextureSampleType, TextureViewDimension,
        },
    };

    fn pair(group_index: u32, binding_index: u32) -> BindingPair {
        BindingPair {
            group_index,
            binding_index,
        }
    }

    #[test]
    fn test_attribute() {
        let mut context = ProcessingContext::default();
        let defines = DefineSet::new();

        assert_eq!(
            process_attribute("attribute position : vec3<f32>;", &defines, &mut context)
                .unwrap(),
            Some(String::new())
        );
        assert_eq!(
            process_attribute("attribute world0 : mat4x4<f32>;", &defines, &mut context)
                .unwrap(),
            Some(String::new())
        );
        assert_eq!(
            process_attribute("let attribute = 1;", &defines, &mut context).unwrap(),
            None
        );

        assert_eq!(context.available_attributes.get("position"), Some(&0));
        assert_eq!(context.available_attributes.get("world0"), Some(&1));
        assert_eq!(context.ordered_attributes.get(&1).map(|s| s.as_str()), Some("world0"));
        assert_eq!(
            context.interface.attribute_inputs,
            vec![
                "  @location(0) position : vec3<f32>,".to_string(),
                "  @location(1) world0 : mat4x4<f32>,".to_string(),
            ]
        );
        assert!(!context.interface.has_non_float_attribute);
    }

    #[test]
    fn test_integer_vertex_buffer_attribute() {
        let mut context =
            ProcessingContext::default().with_integer_vertex_buffer("matricesIndices", 4);

        process_attribute(
            "attribute matricesIndices : vec4<f32>;",
            &DefineSet::new(),
            &mut context,
        )
        .unwrap();

        assert!(context.interface.has_non_float_attribute);
        assert_eq!(
            context.interface.attribute_inputs,
            vec!["  @location(0) _int_matricesIndices_ : vec4<u32>,".to_string()]
        );
        assert_eq!(
            context.interface.attribute_conversions,
            vec![
                "vertexInputs.matricesIndices = vec4<f32>(vertexInputs_._int_matricesIndices_);"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_varyings() {
        let mut context = ProcessingContext::default();
        let defines = DefineSet::new();

        assert!(is_varying_declaration("flat varying vIndex : u32;"));
        assert!(!is_varying_declaration("let varyingCount = 2;"));

        process_varying("varying vUV : vec2<f32>;", false, &defines, &mut context).unwrap();
        process_varying("flat varying vIndex : u32;", false, &defines, &mut context).unwrap();
        process_varying(
            "linear sample varying vDepth : f32;",
            false,
            &defines,
            &mut context,
        )
        .unwrap();

        assert_eq!(
            context.interface.varyings,
            vec![
                "  @location(0) @interpolate(perspective, center) vUV : vec2<f32>,".to_string(),
                "  @location(1) @interpolate(flat) vIndex : u32,".to_string(),
                "  @location(2) @interpolate(linear, sample) vDepth : f32,".to_string(),
            ]
        );

        assert_eq!(
            process_varying("varying vUV : vec2<f32>;", true, &defines, &mut context).unwrap(),
            Some(String::new())
        );
        assert!(context.diagnostics.is_empty());
        assert_eq!(context.interface.varyings.len(), 3);
    }

    #[test]
    fn test_array_locations_use_element_slots() {
        let mut context = ProcessingContext::default();
        let defines = DefineSet::new().with("NUM_MATRICES", "2");

        process_attribute("attribute bones : array<mat4x4<f32>, 2>;", &defines, &mut context)
            .unwrap();
        process_attribute("attribute color : vec4<f32>;", &defines, &mut context).unwrap();
        process_varying(
            "varying m : array<mat4x4<f32>, NUM_MATRICES>;",
            false,
            &defines,
            &mut context,
        )
        .unwrap();
        process_varying("varying n : vec4<f32>;", false, &defines, &mut context).unwrap();

        assert_eq!(context.available_attributes.get("color"), Some(&8));
        assert_eq!(context.available_varyings.get("m"), Some(&0));
        assert_eq!(context.available_varyings.get("n"), Some(&8));
    }

    #[test]
    fn test_unknown_fragment_varying() {
        let mut context = ProcessingContext::default();

        let result =
            process_varying("varying vColor : vec4<f32>;", true, &DefineSet::new(), &mut context)
                .unwrap();

        assert_eq!(result, Some(String::new()));
        assert_eq!(context.diagnostics.len(), 1);
        assert!(context.diagnostics[0].contains("vColor"));
        assert!(context.available_varyings.is_empty());
    }

    #[test]
    fn test_uniform() {
        let mut context = ProcessingContext::default();
        let defines = DefineSet::new().with("NUM_LIGHTS", "4");

        assert_eq!(
            process_uniform("uniform alpha : f32;", &defines, &mut context),
            Some(String::new())
        );
        process_uniform(
            "uniform lights : array<vec4<f32>, NUM_LIGHTS>;",
            &defines,
            &mut context,
        );
        process_uniform("uniform alpha : f32;", &defines, &mut context);
        assert_eq!(process_uniform("var<uniform> a : A;", &defines, &mut context), None);

        assert_eq!(
            context.left_over_uniforms,
            vec![
                UniformEntry {
                    name: "alpha".to_string(),
                    ty: "f32".to_string(),
                    length: 0
                },
                UniformEntry {
                    name: "lights".to_string(),
                    ty: "vec4<f32>".to_string(),
                    length: 4
                },
            ]
        );
    }

    #[test]
    fn test_texture_shared_between_stages() {
        let mut context = ProcessingContext::default();
        let defines = DefineSet::new();
        let line = "var diffuse : texture_2d<u32>;";

        let vertex = process_texture(line, false, &defines, &mut context)
            .unwrap()
            .unwrap();
        let fragment = process_texture(line, true, &defines, &mut context)
            .unwrap()
            .unwrap();

        assert_eq!(vertex, "@group(0) @binding(0) var diffuse : texture_2d<u32>;");
        assert_eq!(vertex, fragment);

        let texture = &context.available_textures["diffuse"];
        assert_eq!(texture.textures, vec![pair(0, 0)]);
        assert_eq!(texture.sample_type, TextureSampleType::Uint);

        let entry = &context.bind_group_layouts()[0][0];
        assert_eq!(entry.visibility, ShaderStages::VERTEX | ShaderStages::FRAGMENT);
        assert_eq!(
            entry.resource,
            BindingResource::Texture {
                sample_type: TextureSampleType::Uint,
                view_dimension: TextureViewDimension::D2,
                multisampled: false
            }
        );
    }

    #[test]
    fn test_texture_array() {
        let mut context = ProcessingContext::default();
        let defines = DefineSet::new().with("NUM_SHADOWS", "3");

        let result = process_texture(
            "  var shadows : array<texture_depth_2d, NUM_SHADOWS>;",
            true,
            &defines,
            &mut context,
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            result,
            "  @group(0) @binding(0) var shadows : array<texture_depth_2d, NUM_SHADOWS>;"
        );
        let texture = &context.available_textures["shadows"];
        assert!(texture.is_texture_array);
        assert_eq!(texture.textures, vec![pair(0, 0), pair(0, 1), pair(0, 2)]);
        assert_eq!(texture.sample_type, TextureSampleType::Depth);
        assert_eq!(
            context.binding_names(),
            vec![vec![
                "shadows0".to_string(),
                "shadows1".to_string(),
                "shadows2".to_string()
            ]]
        );
    }

    #[test]
    fn test_storage_texture() {
        let mut context = ProcessingContext::default();

        process_texture(
            "var output : texture_storage_2d<rgba8unorm, write>;",
            true,
            &DefineSet::new(),
            &mut context,
        )
        .unwrap();

        assert!(context.available_textures["output"].is_storage_texture);
        assert_eq!(
            context.bind_group_layouts()[0][0].resource,
            BindingResource::StorageTexture {
                format: "rgba8unorm".to_string(),
                access: StorageTextureAccess::WriteOnly,
                view_dimension: TextureViewDimension::D2
            }
        );
    }

    #[test]
    fn test_unknown_texture_function() {
        let mut context = ProcessingContext::default();

        let result = process_texture(
            "var diffuse : texture_2D<f32>;",
            true,
            &DefineSet::new(),
            &mut context,
        );

        match result {
            Err(ShaderProcessingError::UnknownTextureFunction {
                texture, function, ..
            }) => {
                assert_eq!(texture, "diffuse");
                assert_eq!(function, "texture_2D");
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(context.available_textures.is_empty());
    }

    #[test]
    fn test_samplers() {
        let mut context = ProcessingContext::default();
        let defines = DefineSet::new();
        process_texture("var diffuse : texture_2d<f32>;", true, &defines, &mut context).unwrap();

        let code = "var diffuseSampler : sampler;\nvar shadowSampler : sampler_comparison;\n";
        let vertex = process_samplers(code, false, &mut context).unwrap();
        let fragment = process_samplers(code, true, &mut context).unwrap();

        assert_eq!(
            vertex,
            "@group(0) @binding(1) var diffuseSampler : sampler;\n\
             @group(0) @binding(2) var shadowSampler : sampler_comparison;\n"
        );
        assert_eq!(vertex, fragment);
        assert!(context.available_textures["diffuse"].auto_bind_sampler);

        // Already annotated declarations are left alone.
        assert_eq!(process_samplers(&vertex, true, &mut context).unwrap(), vertex);
    }

    #[test]
    fn test_custom_buffers() {
        let mut context = ProcessingContext::default();
        let code = "var<uniform> scene : Scene;\nvar<storage, read_write> particles : array<Particle>;\nvar<uniform> params : Params;\n";

        let vertex = process_custom_buffers(code, false, &mut context).unwrap();
        let fragment = process_custom_buffers(
            "var<uniform> sceneData : Scene;\nvar<uniform> params : Params;\n",
            true,
            &mut context,
        )
        .unwrap();

        assert_eq!(
            vertex,
            "@group(0) @binding(0) var<uniform> scene : Scene;\n\
             @group(0) @binding(1) var<storage, read_write> particles : array<Particle>;\n\
             @group(0) @binding(2) var<uniform> params : Params;\n"
        );
        assert_eq!(
            fragment,
            "@group(0) @binding(0) var<uniform> sceneData : Scene;\n\
             @group(0) @binding(2) var<uniform> params : Params;\n"
        );
        assert!(context.available_buffers.contains_key("Scene"));
        assert!(!context.available_buffers.contains_key("scene"));
        assert_eq!(
            context.available_buffers["particles"].kind,
            BufferBindingType::Storage
        );
    }
}
