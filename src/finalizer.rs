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

//! Stage finalizer. Runs once per shader pair, after both stages went through the
//! declaration processors and the define rewriter: binds samplers and custom buffers, adds
//! the leftover uniform buffer, synthesizes stage input/output structures and wraps the
//! entry points.

use crate::{
    context::ProcessingContext,
    declarations::{process_custom_buffers, process_samplers},
    defines::neutralize_define_directives,
    error::ShaderProcessingError,
    leftover::{build_left_over_buffer, rewrite_strided_array_accesses},
    utils::{contains_uncommented, inject_starting_and_ending_code},
};

/// Presence of this directive turns derivative uniformity analysis off.
pub const DISABLE_UNIFORMITY_ANALYSIS_MARKER: &str = "#define DISABLE_UNIFORMITY_ANALYSIS";
/// Multiple render targets are used together with an extra color output.
pub const MRT_AND_COLOR_MARKER: &str = "MRT_AND_COLOR";
/// Order independent transparency depth peeling.
pub const OIT_MARKER: &str = "oitDepthSampler";
pub const DUAL_SOURCE_BLENDING_MARKER: &str = "DUAL_SOURCE_BLENDING";
pub const FRAG_DEPTH_OUTPUT: &str = "fragmentOutputs.fragDepth";
pub const MAX_RENDER_TARGETS: usize = 8;

const UNREACHABLE_CODE_DIAGNOSTIC: &str = "diagnostic(off, chromium.unreachable_code);\n";
const DERIVATIVE_UNIFORMITY_DIAGNOSTIC: &str = "diagnostic(off, derivative_uniformity);\n";

/// Final code of both stages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessedShaders {
    pub vertex: String,
    pub fragment: String,
}

fn diagnostic_directives(code: &str) -> String {
    let mut directives = String::new();
    if code.contains(DISABLE_UNIFORMITY_ANALYSIS_MARKER) {
        directives += DERIVATIVE_UNIFORMITY_DIAGNOSTIC;
    }
    directives += UNREACHABLE_CODE_DIAGNOSTIC;
    directives
}

fn vertex_interface(context: &ProcessingContext) -> String {
    let interface = &context.interface;
    let non_float = interface.has_non_float_attribute;

    let mut code = "struct VertexInputs {\n  @builtin(vertex_index) vertexIndex : u32,\n  @builtin(instance_index) instanceIndex : u32,\n".to_string();
    for field in interface.attribute_inputs.iter() {
        code += field;
        code.push('\n');
    }
    code += "};\n";
    code += &format!(
        "var<private> vertexInputs{} : VertexInputs;\n",
        if non_float { "_" } else { "" }
    );

    if non_float {
        code += "struct VertexInputs_ {\n  vertexIndex : u32,\n  instanceIndex : u32,\n";
        for field in interface.attributes.iter() {
            code += field;
            code.push('\n');
        }
        code += "};\nvar<private> vertexInputs : VertexInputs_;\n";
    }

    code += "struct FragmentInputs {\n  @builtin(position) position : vec4<f32>,\n";
    for field in interface.varyings.iter() {
        code += field;
        code.push('\n');
    }
    code += "};\nvar<private> vertexOutputs : FragmentInputs;\n";

    code
}

fn finalize_vertex(
    code: &str,
    pure_mode: bool,
    context: &ProcessingContext,
) -> String {
    let interface = &context.interface;

    let code = neutralize_define_directives(code);
    let code = rewrite_strided_array_accesses(&code, &interface.strided_uniform_arrays);
    let code = vertex_interface(context) + &code;

    let mut starting = String::new();
    if interface.has_non_float_attribute {
        starting += "\n  vertexInputs_ = input;\n";
        starting += "  vertexInputs.vertexIndex = vertexInputs_.vertexIndex;\n";
        starting += "  vertexInputs.instanceIndex = vertexInputs_.instanceIndex;\n";
        for conversion in interface.attribute_conversions.iter() {
            starting += "  ";
            starting += conversion;
            starting.push('\n');
        }
    } else {
        starting += "\n  vertexInputs = input;\n";
    }

    let ending = if pure_mode {
        "  return vertexOutputs;"
    } else {
        "  vertexOutputs.position.y = vertexOutputs.position.y * internals.yFactor_;\n  return vertexOutputs;"
    };

    diagnostic_directives(&code) + &inject_starting_and_ending_code(&code, &starting, ending)
}

/// Builds the fragment output structure and returns it together with the `enable` directives
/// it requires.
fn fragment_outputs(code: &str) -> (String, Vec<&'static str>) {
    let mut extensions = Vec::new();
    let mut outputs = "struct FragmentOutputs {\n".to_string();
    let mut location = 0;

    let writes_target = |index: usize| code.contains(&format!("fragmentOutputs.fragData{index}"));

    if writes_target(0) {
        for index in (0..MAX_RENDER_TARGETS).filter(|i| writes_target(*i)) {
            outputs += &format!("  @location({location}) fragData{index} : vec4<f32>,\n");
            location += 1;
        }
        if code.contains(MRT_AND_COLOR_MARKER) {
            outputs += &format!("  @location({location}) color : vec4<f32>,\n");
            location += 1;
        }
    }

    if code.contains(OIT_MARKER) {
        for field in ["depth : vec2<f32>", "frontColor : vec4<f32>", "backColor : vec4<f32>"] {
            outputs += &format!("  @location({location}) {field},\n");
            location += 1;
        }
    }

    if location == 0 {
        if code.contains(DUAL_SOURCE_BLENDING_MARKER) {
            extensions.push("dual_source_blending");
            outputs += "  @location(0) @blend_src(0) color : vec4<f32>,\n";
            outputs += "  @location(0) @blend_src(1) color2 : vec4<f32>,\n";
        } else {
            outputs += "  @location(0) color : vec4<f32>,\n";
        }
    }

    if contains_uncommented(code, FRAG_DEPTH_OUTPUT) {
        outputs += "  @builtin(frag_depth) fragDepth : f32,\n";
    }

    outputs += "};\nvar<private> fragmentOutputs : FragmentOutputs;\n";

    (outputs, extensions)
}

fn finalize_fragment(code: &str, pure_mode: bool, context: &ProcessingContext) -> String {
    let interface = &context.interface;

    let frag_coord_code = if !pure_mode && code.contains("fragmentInputs.position") {
        "  if (internals.yFactor_ == 1.) {\n    fragmentInputs.position.y = internals.textureOutputHeight_ - fragmentInputs.position.y;\n  }\n"
    } else {
        ""
    };

    let code = neutralize_define_directives(code);
    let mut code = rewrite_strided_array_accesses(&code, &interface.strided_uniform_arrays);
    if !pure_mode {
        // Also covers dpdyCoarse and dpdyFine.
        code = code.replace("dpdy", "(-internals.yFactor_)*dpdy");
    }

    let mut inputs = "struct FragmentInputs {\n  @builtin(position) position : vec4<f32>,\n  @builtin(front_facing) frontFacing : bool,\n".to_string();
    for field in interface.varyings.iter() {
        inputs += field;
        inputs.push('\n');
    }
    inputs += "};\nvar<private> fragmentInputs : FragmentInputs;\n";

    let (outputs, extensions) = fragment_outputs(&code);

    let mut code = inputs + &outputs + &code;
    if !extensions.is_empty() {
        let enables = extensions
            .iter()
            .map(|extension| format!("enable {extension};\n"))
            .collect::<String>();
        code = enables + &code;
    }

    let starting = format!("\n  fragmentInputs = input;\n{frag_coord_code}");
    let ending = "  return fragmentOutputs;";

    diagnostic_directives(&code) + &inject_starting_and_ending_code(&code, &starting, ending)
}

/// Finalizes both stages. The stage interface bookkeeping of the context is reset afterwards,
/// binding tables are kept for bind group creation.
pub fn finalize_shaders(
    vertex: &str,
    fragment: &str,
    pure_mode: bool,
    context: &mut ProcessingContext,
) -> Result<ProcessedShaders, ShaderProcessingError> {
    let vertex = process_samplers(vertex, false, context)?;
    let fragment = process_samplers(fragment, true, context)?;

    let vertex = process_custom_buffers(&vertex, false, context)?;
    let fragment = process_custom_buffers(&fragment, true, context)?;

    let left_over = build_left_over_buffer(context)?;
    let vertex = left_over.clone() + &vertex;
    let fragment = left_over + &fragment;

    let shaders = ProcessedShaders {
        vertex: finalize_vertex(&vertex, pure_mode, context),
        fragment: finalize_fragment(&fragment, pure_mode, context),
    };

    context.reset_stage_interface();

    Ok(shaders)
}
