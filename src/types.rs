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

//! Type string helpers: array suffix resolution and the size tables used for location
//! allocation and uniform buffer layout.

use crate::defines::DefineSet;

/// Result of [`resolve_array_type`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedType {
    pub name: String,
    /// Element type for arrays, the untouched type otherwise.
    pub element_type: String,
    /// Length of the array, `0` means "not an array".
    pub length: u32,
}

/// JavaScript-like `substring`: bounds are clamped and swapped when reversed.
fn substring(s: &str, start: usize, end: usize) -> &str {
    let start = start.min(s.len());
    let end = end.min(s.len());
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    s.get(start..end).unwrap_or_default()
}

/// Parses a length literal. Returns `None` for anything that is not a number, an empty string
/// counts as zero.
fn parse_length(literal: &str) -> Option<u32> {
    let literal = literal.trim();
    if literal.is_empty() {
        return Some(0);
    }
    if let Ok(length) = literal.parse::<u32>() {
        return Some(length);
    }
    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
            Some(value as u32)
        }
        _ => None,
    }
}

/// Extracts the element type and the length of an array type like `array<vec2<f32>, 4>` or
/// `array<f32, NUM_LIGHTS>`. The scan goes from the last `>` backwards to the separator
/// preceding the length; the length is either a literal or the name of a define.
///
/// A length that is neither a number nor a known numeric define resolves to `0`, which makes
/// the declaration look like a scalar to the rest of the pipeline.
pub fn resolve_array_type(name: &str, type_str: &str, defines: &DefineSet) -> ResolvedType {
    let bytes = type_str.as_bytes();
    let mut length = 0;
    let mut element_type = type_str;

    if let Some(end_array) = type_str.rfind('>').filter(|end| *end > 0) {
        if type_str.contains("array") {
            let is_separator = |i: usize| bytes[i] == b' ' || bytes[i] == b',';

            let mut start_array = end_array;
            while start_array > 0 && !is_separator(start_array) {
                start_array -= 1;
            }

            let length_str = substring(type_str, start_array + 1, end_array);
            length = parse_length(length_str)
                .or_else(|| {
                    defines
                        .get(length_str.trim())
                        .and_then(parse_length)
                })
                .unwrap_or(0);

            while start_array > 0 && is_separator(start_array) {
                start_array -= 1;
            }

            let open = type_str.find('<').map_or(0, |i| i + 1);
            element_type = substring(type_str, open, start_array + 1);
        }
    }

    ResolvedType {
        name: name.to_string(),
        element_type: element_type.to_string(),
        length,
    }
}

/// Strips generic parameters: `vec3<f32>` -> `vec3`.
pub fn base_type(type_str: &str) -> &str {
    let type_str = type_str.trim();
    type_str.find('<').map_or(type_str, |i| &type_str[..i])
}

/// Amount of scalar components of a uniform type, `None` for types that are not known
/// (structures for instance).
pub fn uniform_component_count(type_str: &str) -> Option<u32> {
    let count = match base_type(type_str) {
        "bool" | "int" | "float" | "i32" | "u32" | "f32" | "f16" => 1,
        "vec2" | "ivec2" | "uvec2" | "vec2i" | "vec2u" | "vec2f" | "vec2h" => 2,
        "vec3" | "ivec3" | "uvec3" | "vec3i" | "vec3u" | "vec3f" | "vec3h" => 3,
        "vec4" | "ivec4" | "uvec4" | "vec4i" | "vec4u" | "vec4f" | "vec4h" => 4,
        "mat2" | "mat2x2" | "mat2x2f" | "mat2x2h" => 4,
        "mat3" | "mat3x3" | "mat3x3f" | "mat3x3h" => 12,
        "mat4" | "mat4x4" | "mat4x4f" | "mat4x4h" => 16,
        _ => return None,
    };
    Some(count)
}

/// Amount of stage interface locations a single value of the type occupies: matrices take
/// one location per column, everything else takes one. Arrays must be passed as their
/// element type (see [`resolve_array_type`]), the caller multiplies by the array length.
pub fn location_slot_count(type_str: &str) -> u32 {
    let base = base_type(type_str);
    if let Some(columns) = base.strip_prefix("mat") {
        match columns.as_bytes().first() {
            Some(b'2') => 2,
            Some(b'3') => 3,
            Some(b'4') => 4,
            _ => 1,
        }
    } else {
        1
    }
}

#[cfg(test)]
mod test {
    use crate::{
        defines::DefineSet,
        types::{
            base_type, location_slot_count, resolve_array_type, uniform_component_count,
            ResolvedType,
        },
    };

    fn resolved(name: &str, element_type: &str, length: u32) -> ResolvedType {
        ResolvedType {
            name: name.to_string(),
            element_type: element_type.to_string(),
            length,
        }
    }

    #[test]
    fn test_literal_array_length() {
        let defines = DefineSet::new();
        assert_eq!(
            resolve_array_type("lights", "array<vec4<f32>, 4>", &defines),
            resolved("lights", "vec4<f32>", 4)
        );
        assert_eq!(
            resolve_array_type("weights", "array<f32,16>", &defines),
            resolved("weights", "f32", 16)
        );
    }

    #[test]
    fn test_define_array_length() {
        let defines = DefineSet::new().with("NUM_BONES", "32");
        assert_eq!(
            resolve_array_type("bones", "array<mat4x4<f32>, NUM_BONES>", &defines),
            resolved("bones", "mat4x4<f32>", 32)
        );
    }

    // An unknown length symbol silently degrades to a zero-length (scalar-looking) entry.
    #[test]
    fn test_unknown_array_length_symbol() {
        let defines = DefineSet::new().with("OTHER", "3");
        assert_eq!(
            resolve_array_type("bones", "array<mat4x4<f32>, NUM_BONES>", &defines),
            resolved("bones", "mat4x4<f32>", 0)
        );

        let defines = DefineSet::new().with("NUM_BONES", "many");
        assert_eq!(
            resolve_array_type("bones", "array<mat4x4<f32>, NUM_BONES>", &defines).length,
            0
        );
    }

    #[test]
    fn test_non_array_type() {
        let defines = DefineSet::new();
        assert_eq!(
            resolve_array_type("color", "vec4<f32>", &defines),
            resolved("color", "vec4<f32>", 0)
        );
        assert_eq!(
            resolve_array_type("alpha", "f32", &defines),
            resolved("alpha", "f32", 0)
        );
    }

    #[test]
    fn test_type_tables() {
        assert_eq!(base_type("vec2<f32>"), "vec2");
        assert_eq!(uniform_component_count("vec2<f32>"), Some(2));
        assert_eq!(uniform_component_count("f32"), Some(1));
        assert_eq!(uniform_component_count("mat4x4<f32>"), Some(16));
        assert_eq!(uniform_component_count("LightData"), None);
        assert_eq!(location_slot_count("mat4x4<f32>"), 4);
        assert_eq!(location_slot_count("mat3"), 3);
        assert_eq!(location_slot_count("vec4<f32>"), 1);
    }
}
