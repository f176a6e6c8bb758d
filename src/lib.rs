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

//! Shader source processor that turns the engine shading dialect into binding-aware WGSL.
//!
//! The dialect is plain WGSL extended with a few declarations that are collected by the
//! processor: `attribute` (vertex inputs), `varying` (stage interface), `uniform` (members of
//! the synthesized leftover uniform buffer) and texture, sampler and buffer variables without
//! binding attributes. The processor allocates locations and binding slots, synthesizes the
//! stage input/output structures and wraps the entry points, producing a pair of WGSL
//! sources together with the binding tables needed to create bind groups and pipelines.
//!
//! ```no_run
//! use fyrox_wgsl::{DefineSet, ProcessorSettings, WgslShaderProcessor};
//!
//! # fn transpile(vertex: &str, fragment: &str) -> Result<(), fyrox_wgsl::ShaderProcessingError> {
//! let processor = WgslShaderProcessor::new(ProcessorSettings::default());
//! let mut context = processor.create_context();
//! let defines = DefineSet::new().with("NUM_BONES", "4");
//! let shaders = processor.transpile(vertex, fragment, &defines, &mut context)?;
//! println!("{}", shaders.fragment);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod declarations;
pub mod defines;
pub mod error;
pub mod finalizer;
pub mod layout;
pub mod leftover;
pub mod processor;
pub mod settings;
pub mod types;
pub mod utils;

pub use context::{BindingPair, ProcessingContext};
pub use defines::DefineSet;
pub use error::ShaderProcessingError;
pub use finalizer::ProcessedShaders;
pub use processor::WgslShaderProcessor;
pub use settings::{BindingLimits, ProcessorSettings};
