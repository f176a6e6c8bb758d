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

//! Preprocessor define handling: material-level defines become `const` declarations, macros
//! declared by `#define` directives inside the source are substituted textually.

use lazy_static::lazy_static;
use regex::Regex;

/// Names starting with this prefix are engine internals and never become constants.
pub const RESERVED_DEFINE_PREFIX: &str = "__";

const DEFINE_DIRECTIVE: &str = "#define ";

lazy_static! {
    static ref DEFINE_DIRECTIVE_RE: Regex =
        Regex::new(r"(?m)^[ \t]*#define[ \t]+(\w+)[ \t]*([^\r\n]*)").unwrap();
}

/// An ordered set of preprocessor names and their raw textual values. Iteration order is the
/// insertion order, so the generated code is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefineSet {
    entries: Vec<(String, String)>,
}

impl DefineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new define or replaces the value of an existing one, keeping its position.
    pub fn insert<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style version of [`Self::insert`].
    pub fn with<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for DefineSet {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut set = Self::default();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Collects every `#define NAME VALUE` directive of the source. A directive without a value
/// defines a boolean flag and gets `"true"` as its value.
pub fn collect_source_defines(code: &str) -> DefineSet {
    DEFINE_DIRECTIVE_RE
        .captures_iter(code)
        .map(|captures| {
            let value = captures[2].trim();
            let value = if value.is_empty() { "true" } else { value };
            (captures[1].to_string(), value.to_string())
        })
        .collect()
}

/// Mimics the check "the value starts with something parsable as a number": an optional
/// sign followed either by a digit or by a dot and a digit. Trailing garbage such as type
/// suffixes (`3u`, `1.0f`) is allowed.
fn is_numeric_prefix(value: &str) -> bool {
    let value = value.trim_start();
    let value = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().map_or(false, |c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Converts numeric and boolean material-level defines into `const NAME = VALUE;` lines.
/// Defines with an empty value are flags and become `const NAME = true;`.
pub fn convert_defines_to_const(defines: &DefineSet) -> String {
    let mut code = String::new();
    for (name, value) in defines.iter() {
        if name.is_empty() || name.starts_with(RESERVED_DEFINE_PREFIX) {
            continue;
        }
        if is_numeric_prefix(value) || value == "true" || value == "false" {
            code += &format!("const {name} = {value};\n");
        } else if value.is_empty() {
            code += &format!("const {name} = true;\n");
        }
    }
    code
}

/// Replaces every occurrence of the macros declared in the source by their values.
///
/// Boolean flags (value `"true"`) are excluded, they must stay untouched for the checks
/// performed later on the text. Longest names are processed first, so a short name never
/// corrupts a longer one containing it. The value of each macro is re-read from the current
/// text because a previous substitution may have changed it.
///
/// Returns the rewritten code and the names whose directive could not be found in the text.
pub fn substitute_source_defines(code: &str, source_defines: &DefineSet) -> (String, Vec<String>) {
    let mut names = source_defines
        .iter()
        .filter(|(_, value)| *value != "true")
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

    // Stable sort keeps the declaration order for names of equal length.
    names.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut code = code.to_string();
    let mut missing = Vec::new();
    for name in names {
        let directive = format!("{DEFINE_DIRECTIVE}{name}");
        let Some(start) = code.find(&directive) else {
            missing.push(name.to_string());
            continue;
        };

        let end = code[start..]
            .find('\n')
            .map_or(code.len(), |offset| start + offset);
        // Skip the directive, the name and the single separator that follows it.
        let value_start = (start + directive.len() + 1).min(end);
        let value = code[value_start..end].to_string();

        code = code.replace(name, &value);
    }

    (code, missing)
}

/// Comments out every `#define` directive, whether it took part in the substitution or not.
pub fn neutralize_define_directives(code: &str) -> String {
    code.replace(DEFINE_DIRECTIVE, "//#define ")
}

#[cfg(test)]
mod test {
    use crate::defines::{
        collect_source_defines, convert_defines_to_const, neutralize_define_directives,
        substitute_source_defines, DefineSet,
    };

    #[test]
    fn test_collect_source_defines() {
        let defines = collect_source_defines(
            "#define IOR 1.333\n  #define ETA 1.0/IOR\n#define CUSTOM_FRAGMENT_BEGIN\nfn main() {}",
        );

        assert_eq!(
            defines,
            DefineSet::new()
                .with("IOR", "1.333")
                .with("ETA", "1.0/IOR")
                .with("CUSTOM_FRAGMENT_BEGIN", "true")
        );
    }

    #[test]
    fn test_convert_defines_to_const() {
        let defines = DefineSet::new()
            .with("NUM_BONES", "4")
            .with("SCALE", "-0.5")
            .with("COUNT", "3u")
            .with("ALPHATEST", "")
            .with("USE_FOG", "true")
            .with("__INTERNAL", "1")
            .with("UV_SOURCE", "vMainUV");

        assert_eq!(
            convert_defines_to_const(&defines),
            "const NUM_BONES = 4;\nconst SCALE = -0.5;\nconst COUNT = 3u;\n\
             const ALPHATEST = true;\nconst USE_FOG = true;\n"
        );
    }

    #[test]
    fn test_substitution_rereads_live_value() {
        let code = "#define IOR 1.333\n#define ETA 1.0/IOR\nlet x = ETA;\nlet y = IOR;\n";
        let defines = collect_source_defines(code);

        let (code, missing) = substitute_source_defines(code, &defines);

        assert!(missing.is_empty());
        assert!(code.contains("let x = 1.0/1.333;"));
        assert!(code.contains("let y = 1.333;"));
        assert!(!code.contains("1.0/IOR"));
    }

    #[test]
    fn test_substitution_prefers_longest_names() {
        let code = "#define A 1\n#define AB 2\nlet v = AB + A;\n";
        let defines = collect_source_defines(code);

        let (code, _) = substitute_source_defines(code, &defines);

        assert!(code.ends_with("let v = 2 + 1;\n"));
    }

    #[test]
    fn test_flags_are_not_substituted() {
        let code = "#define DISABLE_UNIFORMITY_ANALYSIS\nfn main() {}";
        let defines = collect_source_defines(code);

        let (result, missing) = substitute_source_defines(code, &defines);

        assert_eq!(result, code);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_missing_directive_is_reported() {
        let defines = DefineSet::new().with("vDiffuseUV", "vMainUV");

        let (code, missing) = substitute_source_defines("let uv = vDiffuseUV;", &defines);

        assert_eq!(code, "let uv = vDiffuseUV;");
        assert_eq!(missing, vec!["vDiffuseUV".to_string()]);
    }

    #[test]
    fn test_neutralize_directives() {
        assert_eq!(
            neutralize_define_directives("#define A 1\n#define B\nlet a = 1;"),
            "//#define A 1\n//#define B\nlet a = 1;"
        );
    }
}
