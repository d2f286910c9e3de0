//! Redis-style glob matching for key scans.
//!
//! Supported syntax:
//!
//! - `*` matches any run of characters (including none)
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[^a]` match one character from (or outside) a class
//! - `\x` matches `x` literally

/// Returns whether `text` matches the glob `pattern`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    match_from(&pattern, &text)
}

/// Escapes glob metacharacters so `text` matches only itself.
///
/// ```
/// use rediso_storage::{escape_pattern, glob_match};
///
/// let escaped = escape_pattern("a*b");
/// assert!(glob_match(&escaped, "a*b"));
/// assert!(!glob_match(&escaped, "aXb"));
/// ```
pub fn escape_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\' | '^') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn match_from(pattern: &[char], text: &[char]) -> bool {
    let mut p = 0;
    let mut t = 0;

    while p < pattern.len() {
        match pattern[p] {
            '*' => {
                while p + 1 < pattern.len() && pattern[p + 1] == '*' {
                    p += 1;
                }
                if p + 1 == pattern.len() {
                    return true;
                }
                return (t..=text.len()).any(|start| match_from(&pattern[p + 1..], &text[start..]));
            }
            '?' => {
                if t >= text.len() {
                    return false;
                }
                t += 1;
                p += 1;
            }
            '[' => {
                if t >= text.len() {
                    return false;
                }
                let (matched, next) = match_class(pattern, p + 1, text[t]);
                if !matched {
                    return false;
                }
                t += 1;
                p = next;
            }
            '\\' if p + 1 < pattern.len() => {
                if t >= text.len() || text[t] != pattern[p + 1] {
                    return false;
                }
                t += 1;
                p += 2;
            }
            c => {
                if t >= text.len() || text[t] != c {
                    return false;
                }
                t += 1;
                p += 1;
            }
        }
    }

    t == text.len()
}

/// Matches `c` against the class starting at `start` (just past `[`).
///
/// Returns whether it matched and the pattern index after the closing `]`.
/// An unterminated class extends to the end of the pattern.
fn match_class(pattern: &[char], start: usize, c: char) -> (bool, usize) {
    let mut p = start;
    let negate = p < pattern.len() && pattern[p] == '^';
    if negate {
        p += 1;
    }

    let mut matched = false;
    while p < pattern.len() && pattern[p] != ']' {
        if pattern[p] == '\\' && p + 1 < pattern.len() {
            p += 1;
            matched |= pattern[p] == c;
            p += 1;
        } else if p + 2 < pattern.len() && pattern[p + 1] == '-' && pattern[p + 2] != ']' {
            let (lo, hi) = if pattern[p] <= pattern[p + 2] {
                (pattern[p], pattern[p + 2])
            } else {
                (pattern[p + 2], pattern[p])
            };
            matched |= lo <= c && c <= hi;
            p += 3;
        } else {
            matched |= pattern[p] == c;
            p += 1;
        }
    }

    // skip the closing bracket
    if p < pattern.len() {
        p += 1;
    }

    (matched != negate, p)
}
