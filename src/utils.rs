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

//! Small text helpers used to rewrite shader sources.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ENTRY_POINT_RE: Regex = Regex::new(r"\bfn\s+main\s*\(").unwrap();
}

/// Removes line comments and (possibly nested) block comments. Line breaks are kept, so line
/// structure of the code stays the same except for multi-line block comments.
pub fn remove_comments(code: &str) -> String {
    let mut result = String::with_capacity(code.len());
    let mut chars = code.chars().peekable();
    let mut block_depth = 0usize;

    while let Some(c) = chars.next() {
        if block_depth > 0 {
            match (c, chars.peek()) {
                ('*', Some('/')) => {
                    chars.next();
                    block_depth -= 1;
                }
                ('/', Some('*')) => {
                    chars.next();
                    block_depth += 1;
                }
                _ => (),
            }
            continue;
        }

        match (c, chars.peek()) {
            ('/', Some('*')) => {
                chars.next();
                block_depth = 1;
            }
            ('/', Some('/')) => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Checks whether the needle occurs somewhere outside of a line comment.
pub fn contains_uncommented(code: &str, needle: &str) -> bool {
    code.match_indices(needle).any(|(position, _)| {
        let line_start = code[..position].rfind('\n').map_or(0, |i| i + 1);
        !code[line_start..position].contains("//")
    })
}

/// Finds the byte range of the body of the entry point (`fn main(...) { ... }`): the position
/// right after its opening brace and the position of its closing brace.
fn entry_point_body(code: &str) -> Option<(usize, usize)> {
    let declaration = ENTRY_POINT_RE.find(code)?;
    let open = declaration.end() + code[declaration.end()..].find('{')?;

    let mut depth = 0usize;
    for (i, byte) in code.bytes().enumerate().skip(open) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open + 1, i));
                }
            }
            _ => (),
        }
    }

    None
}

/// Wraps the body of the entry point with the given prologue and epilogue. The code is
/// returned untouched if there is no entry point.
pub fn inject_starting_and_ending_code(code: &str, starting: &str, ending: &str) -> String {
    let Some((body_start, body_end)) = entry_point_body(code) else {
        log::debug!("No entry point found, prologue and epilogue are not injected.");
        return code.to_string();
    };

    let mut result = String::with_capacity(code.len() + starting.len() + ending.len() + 1);
    result += &code[..body_start];
    result += starting;
    result += &code[body_start..body_end];
    result += ending;
    result.push('\n');
    result += &code[body_end..];
    result
}

#[cfg(test)]
mod test {
    use crate::utils::{contains_uncommented, inject_starting_and_ending_code, remove_comments};

    #[test]
    fn test_remove_comments() {
        assert_eq!(
            remove_comments("let a = 1; // one\n/* block /* nested */ still */let b = 2;"),
            "let a = 1; \nlet b = 2;"
        );
        assert_eq!(remove_comments("let c = a / b * 2;"), "let c = a / b * 2;");
    }

    #[test]
    fn test_contains_uncommented() {
        assert!(!contains_uncommented("  // out.depth = 1.0;\n", "out.depth"));
        assert!(contains_uncommented(
            "// out.depth = 1.0;\nout.depth = 0.5;\n",
            "out.depth"
        ));
    }

    #[test]
    fn test_inject_starting_and_ending_code() {
        let code = "fn helper() -> f32 { return 1.0; }\n@vertex\nfn main(input : VertexInputs) -> FragmentInputs {\n  if (true) { let a = helper(); }\n}\nfn after() {}\n";

        assert_eq!(
            inject_starting_and_ending_code(code, "\n  START", "  END"),
            "fn helper() -> f32 { return 1.0; }\n@vertex\nfn main(input : VertexInputs) -> FragmentInputs {\n  START\n  if (true) { let a = helper(); }\n  END\n}\nfn after() {}\n"
        );

        assert_eq!(
            inject_starting_and_ending_code("fn mainly() {}", "A", "B"),
            "fn mainly() {}"
        );
    }
}
