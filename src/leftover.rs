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

//! Leftover uniform buffer: every plain uniform of both stages is gathered into a single
//! synthesized uniform buffer, prefixed to both stages.

use crate::{
    context::{BufferBinding, ProcessingContext},
    error::ShaderProcessingError,
    layout::{BindingResource, BufferBindingType, ShaderStages},
    types::uniform_component_count,
};

/// Structure name of the leftover uniform buffer.
pub const LEFT_OVER_BUFFER_NAME: &str = "LeftOver";
/// Variable name of the leftover uniform buffer.
pub const LEFT_OVER_VARIABLE_NAME: &str = "uniforms";

/// Array elements of a uniform buffer are aligned to 16 bytes, arrays of scalars and of
/// 2-component vectors must have their elements wrapped into padded structures.
fn needs_strided_elements(ty: &str) -> bool {
    uniform_component_count(ty).map_or(false, |count| count <= 2)
}

/// Builds the declaration of the leftover uniform buffer, or an empty string if there are no
/// leftover uniforms. Strided arrays are registered in the stage interface of the context,
/// accesses to them must be rewritten with [`rewrite_strided_array_accesses`].
pub fn build_left_over_buffer(
    context: &mut ProcessingContext,
) -> Result<String, ShaderProcessingError> {
    if context.left_over_uniforms.is_empty() {
        return Ok(String::new());
    }

    let binding = match context.available_buffers.get(LEFT_OVER_BUFFER_NAME) {
        Some(buffer) => buffer.binding,
        None => {
            let binding = context.next_free_binding()?;
            context.available_buffers.insert(
                LEFT_OVER_BUFFER_NAME.to_string(),
                BufferBinding {
                    binding,
                    kind: BufferBindingType::Uniform,
                },
            );
            context.describe_binding(
                binding,
                LEFT_OVER_BUFFER_NAME,
                ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                BindingResource::Buffer(BufferBindingType::Uniform),
            );
            binding
        }
    };

    let mut strided_arrays = String::new();
    let mut fields = String::new();
    for uniform in context.left_over_uniforms.iter() {
        let name = &uniform.name;
        let ty = &uniform.ty;
        let length = uniform.length;
        if length == 0 {
            fields += &format!("  {name} : {ty},\n");
        } else if needs_strided_elements(ty) {
            let strided = &mut context.interface.strided_uniform_arrays;
            let element = format!("{LEFT_OVER_BUFFER_NAME}_{}_strided_arr", strided.len());
            strided.push(name.clone());

            strided_arrays +=
                &format!("struct {element} {{\n  @size(16)\n  el : {ty},\n}};\n");
            fields += &format!("  @align(16) {name} : array<{element}, {length}>,\n");
        } else {
            fields += &format!("  {name} : array<{ty}, {length}>,\n");
        }
    }

    Ok(format!(
        "{strided_arrays}struct {LEFT_OVER_BUFFER_NAME} {{\n{fields}}};\n{}var<uniform> {LEFT_OVER_VARIABLE_NAME} : {LEFT_OVER_BUFFER_NAME};\n",
        binding.wgsl_attributes()
    ))
}

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn rewrite_accesses(code: &str, name: &str) -> String {
    let bytes = code.as_bytes();
    let mut result = String::with_capacity(code.len());
    let mut last = 0;
    let mut search = 0;

    while let Some(offset) = code[search..].find(name) {
        let start = search + offset;
        let name_end = start + name.len();
        search = name_end;

        if start > 0 && is_identifier_byte(bytes[start - 1]) {
            continue;
        }

        let mut open = name_end;
        while open < bytes.len() && bytes[open].is_ascii_whitespace() {
            open += 1;
        }
        if open >= bytes.len() || bytes[open] != b'[' {
            continue;
        }

        let mut depth = 0;
        let mut close = None;
        for (i, byte) in bytes.iter().enumerate().skip(open) {
            match byte {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => (),
            }
        }
        let Some(close) = close else {
            continue;
        };

        result += &code[last..=close];
        result += ".el";
        last = close + 1;
        search = close + 1;
    }

    result += &code[last..];
    result
}

/// Appends the `.el` accessor to every indexing of a strided array: `name[expr]` becomes
/// `name[expr].el`.
pub fn rewrite_strided_array_accesses(code: &str, strided_arrays: &[String]) -> String {
    strided_arrays
        .iter()
        .fold(code.to_string(), |code, name| rewrite_accesses(&code, name))
}

#[cfg(test)]
mod test {
    use crate::{
        context::{ProcessingContext, UniformEntry},
        leftover::{build_left_over_buffer, rewrite_strided_array_accesses},
    };

    fn uniform(name: &str, ty: &str, length: u32) -> UniformEntry {
        UniformEntry {
            name: name.to_string(),
            ty: ty.to_string(),
            length,
        }
    }

    #[test]
    fn test_no_left_over_uniforms() {
        let mut context = ProcessingContext::default();
        assert_eq!(build_left_over_buffer(&mut context).unwrap(), "");
        assert!(context.available_buffers.is_empty());
    }

    #[test]
    fn test_left_over_buffer_layout() {
        let mut context = ProcessingContext::default();
        context.add_left_over_uniform(uniform("alpha", "f32", 0));
        context.add_left_over_uniform(uniform("offsets", "vec2<f32>", 4));
        context.add_left_over_uniform(uniform("colors", "vec4<f32>", 2));
        context.add_left_over_uniform(uniform("weights", "f32", 8));

        let code = build_left_over_buffer(&mut context).unwrap();

        assert_eq!(
            code,
            "struct LeftOver_0_strided_arr {\n  @size(16)\n  el : vec2<f32>,\n};\n\
             struct LeftOver_1_strided_arr {\n  @size(16)\n  el : f32,\n};\n\
             struct LeftOver {\n\
             \x20 alpha : f32,\n\
             \x20 @align(16) offsets : array<LeftOver_0_strided_arr, 4>,\n\
             \x20 colors : array<vec4<f32>, 2>,\n\
             \x20 @align(16) weights : array<LeftOver_1_strided_arr, 8>,\n\
             };\n\
             @group(0) @binding(0) var<uniform> uniforms : LeftOver;\n"
        );
        assert_eq!(
            context.interface.strided_uniform_arrays,
            vec!["offsets".to_string(), "weights".to_string()]
        );
    }

    #[test]
    fn test_strided_access_rewrite() {
        let strided = vec!["weights".to_string()];

        assert_eq!(
            rewrite_strided_array_accesses(
                "let w = uniforms.weights[i + 1] * uniforms.weights [idx[0]];",
                &strided
            ),
            "let w = uniforms.weights[i + 1].el * uniforms.weights [idx[0]].el;"
        );
        // Other identifiers containing the name and non-indexed uses stay untouched.
        assert_eq!(
            rewrite_strided_array_accesses(
                "let a = uniforms.myweights[0]; let b = weights;",
                &strided
            ),
            "let a = uniforms.myweights[0]; let b = weights;"
        );
    }
}
