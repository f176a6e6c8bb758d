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

//! Processor settings. They can be created in code or loaded from a RON string, the same way
//! as shader definitions are.

use crate::error::ShaderProcessingError;
use serde::{Deserialize, Serialize};

/// Capacity limits of the binding allocator and of the stage interfaces.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(default)]
pub struct BindingLimits {
    /// Amount of bind groups a pipeline layout may use.
    pub max_groups: u32,
    /// Amount of binding slots in a single bind group. When a group is full, allocation rolls
    /// over to the next group.
    pub max_bindings_per_group: u32,
    /// Amount of vertex attribute locations.
    pub max_attribute_locations: u32,
    /// Amount of inter-stage (varying) locations.
    pub max_varying_locations: u32,
}

impl Default for BindingLimits {
    fn default() -> Self {
        Self {
            max_groups: 4,
            max_bindings_per_group: 1000,
            max_attribute_locations: 16,
            max_varying_locations: 16,
        }
    }
}

/// Settings of [`crate::processor::WgslShaderProcessor`].
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
#[serde(default)]
pub struct ProcessorSettings {
    /// Pure mode skips every engine-specific normalization: no internals uniform block is
    /// injected, the vertical axis is never flipped and derivatives are left untouched.
    pub pure_mode: bool,
    /// See [`BindingLimits`] docs.
    pub limits: BindingLimits,
}

impl ProcessorSettings {
    /// Parses settings from RON. Missing fields get their default values.
    pub fn from_str(str: &str) -> Result<Self, ShaderProcessingError> {
        Ok(ron::de::from_str(str)?)
    }

    /// Creates default settings with pure mode turned on.
    pub fn pure() -> Self {
        Self {
            pure_mode: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use crate::settings::{BindingLimits, ProcessorSettings};

    #[test]
    fn test_settings_load() {
        let settings = ProcessorSettings::from_str(
            r#"
            (
                pure_mode: true,
                limits: (
                    max_bindings_per_group: 8,
                ),
            )
            "#,
        )
        .unwrap();

        assert_eq!(
            settings,
            ProcessorSettings {
                pure_mode: true,
                limits: BindingLimits {
                    max_bindings_per_group: 8,
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn test_malformed_settings() {
        assert!(ProcessorSettings::from_str("(pure_mode: 42)").is_err());
    }
}
