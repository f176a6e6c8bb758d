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

//! Shader pair processor. Drives the whole transpilation of a vertex/fragment pair:
//!
//! 1. [`WgslShaderProcessor::initialize`] prepares the context of the compile.
//! 2. [`WgslShaderProcessor::pre_process`] strips comments and injects engine internals.
//! 3. [`WgslShaderProcessor::process_stage`] runs the declaration processors line by line,
//!    the vertex stage strictly before the fragment stage.
//! 4. [`WgslShaderProcessor::post_process`] rewrites preprocessor defines.
//! 5. [`WgslShaderProcessor::finalize`] produces the final code of both stages.
//!
//! [`WgslShaderProcessor::transpile`] does all of the above in one call.

use crate::{
    context::ProcessingContext,
    declarations::{
        is_varying_declaration, process_attribute, process_texture, process_uniform,
        process_varying,
    },
    defines::{
        collect_source_defines, convert_defines_to_const, substitute_source_defines, DefineSet,
    },
    error::ShaderProcessingError,
    finalizer::{finalize_shaders, ProcessedShaders},
    settings::ProcessorSettings,
    utils::remove_comments,
};

/// Declaration of the uniform buffer with engine internals, injected in front of every stage
/// unless the processor works in pure mode.
pub const INTERNALS_DECLARATION: &str = "struct Internals {\n  yFactor_ : f32,\n  textureOutputHeight_ : f32,\n};\nvar<uniform> internals : Internals;\n";

/// See module docs.
#[derive(Clone, Debug, Default)]
pub struct WgslShaderProcessor {
    settings: ProcessorSettings,
}

impl WgslShaderProcessor {
    pub fn new(settings: ProcessorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Creates a fresh context for a new shader pair, configured with the limits of the
    /// processor.
    pub fn create_context(&self) -> ProcessingContext {
        ProcessingContext::new(self.settings.limits)
    }

    /// Resets the per-compile state of the context before a new shader pair is processed,
    /// see [`ProcessingContext::begin_compile`].
    pub fn initialize(&self, context: &mut ProcessingContext) {
        context.begin_compile();
    }

    /// Removes comments and adds the internals uniform buffer (only once).
    pub fn pre_process(&self, code: &str) -> String {
        if self.settings.pure_mode {
            return remove_comments(code);
        }
        if code.contains(INTERNALS_DECLARATION) {
            code.to_string()
        } else {
            INTERNALS_DECLARATION.to_string() + &remove_comments(code)
        }
    }

    /// Tries every declaration processor on a single line. Returns the line untouched if no
    /// processor recognizes it.
    pub fn process_line(
        &self,
        line: &str,
        is_fragment: bool,
        defines: &DefineSet,
        context: &mut ProcessingContext,
    ) -> Result<String, ShaderProcessingError> {
        let trimmed = line.trim_start();

        let replacement = if !is_fragment && trimmed.starts_with("attribute") {
            process_attribute(line, defines, context)?
        } else if is_varying_declaration(line) {
            process_varying(line, is_fragment, defines, context)?
        } else if trimmed.starts_with("uniform") {
            process_uniform(line, defines, context)
        } else if trimmed.starts_with("var") {
            process_texture(line, is_fragment, defines, context)?
        } else {
            None
        };

        Ok(replacement.unwrap_or_else(|| line.to_string()))
    }

    /// Runs the declaration processors over every line of a stage. Consumed declarations are
    /// removed from the code.
    pub fn process_stage(
        &self,
        code: &str,
        is_fragment: bool,
        defines: &DefineSet,
        context: &mut ProcessingContext,
    ) -> Result<String, ShaderProcessingError> {
        let mut result = String::with_capacity(code.len());
        for line in code.lines() {
            let processed = self.process_line(line, is_fragment, defines, context)?;
            if processed.is_empty() && !line.trim().is_empty() {
                continue;
            }
            result += &processed;
            result.push('\n');
        }
        Ok(result)
    }

    /// Rewrites defines: macros declared in the code are substituted textually, numeric and
    /// boolean material defines are prepended as constants.
    pub fn post_process(
        &self,
        code: &str,
        defines: &DefineSet,
        source_defines: &DefineSet,
        context: &mut ProcessingContext,
    ) -> String {
        let (code, missing) = substitute_source_defines(code, source_defines);
        for name in missing {
            context.warn(format!(
                "The define \"{name}\" has no #define directive in the code, it is not substituted."
            ));
        }
        convert_defines_to_const(defines) + &code
    }

    /// Finalizes both stages, see [`finalize_shaders`].
    pub fn finalize(
        &self,
        vertex: &str,
        fragment: &str,
        context: &mut ProcessingContext,
    ) -> Result<ProcessedShaders, ShaderProcessingError> {
        finalize_shaders(vertex, fragment, self.settings.pure_mode, context)
    }

    /// Transpiles a shader pair. The vertex stage is processed before the fragment stage, so
    /// the fragment stage sees every varying and binding the vertex stage declared.
    pub fn transpile(
        &self,
        vertex: &str,
        fragment: &str,
        defines: &DefineSet,
        context: &mut ProcessingContext,
    ) -> Result<ProcessedShaders, ShaderProcessingError> {
        self.initialize(context);

        let vertex = self.pre_process(vertex);
        let fragment = self.pre_process(fragment);

        let vertex_defines = collect_source_defines(&vertex);
        let fragment_defines = collect_source_defines(&fragment);

        let vertex = self.process_stage(&vertex, false, defines, context)?;
        let fragment = self.process_stage(&fragment, true, defines, context)?;

        let vertex = self.post_process(&vertex, defines, &vertex_defines, context);
        let fragment = self.post_process(&fragment, defines, &fragment_defines, context);

        let shaders = self.finalize(&vertex, &fragment, context)?;

        log::debug!(
            "Shader pair transpiled: {} attributes, {} varyings, {} textures, {} samplers, {} buffers.",
            context.available_attributes.len(),
            context.available_varyings.len(),
            context.available_textures.len(),
            context.available_samplers.len(),
            context.available_buffers.len()
        );

        Ok(shaders)
    }
}
