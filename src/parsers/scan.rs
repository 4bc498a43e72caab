//! Lexical primitives shared by the grammar front ends
//!
//! Everything here works on byte offsets into the original text and never
//! changes the length of its input, so offsets found in a masked or
//! flattened copy are valid in the source it came from.

/// Comment and string conventions used when masking a source file
#[derive(Debug, Clone, Copy)]
pub struct MaskStyle {
    /// Line comment introducer (`//` or `#`)
    pub line_comment: &'static str,
    /// Whether `/* ... */` block comments exist
    pub block_comments: bool,
    /// Blank the contents of string literals, not just comments
    pub mask_strings: bool,
    /// Python `"""` / `'''` strings
    pub triple_quotes: bool,
    /// C# `@"..."` strings: no backslash escapes, `""` is a quote, may span lines
    pub verbatim_strings: bool,
    /// JavaScript backtick template literals
    pub template_literals: bool,
}

pub const CSHARP_MASK: MaskStyle = MaskStyle {
    line_comment: "//",
    block_comments: true,
    mask_strings: true,
    triple_quotes: false,
    verbatim_strings: true,
    template_literals: false,
};

pub const PYTHON_MASK: MaskStyle = MaskStyle {
    line_comment: "#",
    block_comments: false,
    mask_strings: true,
    triple_quotes: true,
    verbatim_strings: false,
    template_literals: false,
};

/// Strings are tracked (so `//` inside a string is not a comment) but kept
pub const TYPESCRIPT_MASK: MaskStyle = MaskStyle {
    line_comment: "//",
    block_comments: true,
    mask_strings: false,
    triple_quotes: false,
    verbatim_strings: false,
    template_literals: true,
};

/// Offset of the `}` that closes the first `{` found at or after `start`.
///
/// Depth rises on every `{` and falls on every `}`; a `}` seen before any
/// opener is ignored. Returns `text.len()` when the block never closes.
pub fn find_block_end(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    text.len()
}

/// Offset of the `close` byte balancing an `open` byte at `open_at`,
/// or `None` when unbalanced.
pub fn find_matching(text: &str, open_at: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open_at) != Some(&open) {
        return None;
    }
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open_at) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Copy of `text` with comments (and, per `style`, string contents)
/// replaced by spaces. Newlines survive, so line numbers and offsets match.
pub fn mask_source(text: &str, style: MaskStyle) -> String {
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let line = style.line_comment.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        let rest = &bytes[i..];

        if style.block_comments && rest.starts_with(b"/*") {
            let end = find_sub(bytes, i + 2, b"*/").map_or(len, |e| e + 2);
            blank(&mut out, i, end);
            i = end;
        } else if rest.starts_with(line) {
            let end = find_byte(bytes, i, b'\n').unwrap_or(len);
            blank(&mut out, i, end);
            i = end;
        } else if style.triple_quotes && (rest.starts_with(b"\"\"\"") || rest.starts_with(b"'''")) {
            let (content_end, next) = scan_triple(bytes, i + 3, &bytes[i..i + 3]);
            if style.mask_strings {
                blank(&mut out, i + 3, content_end);
            }
            i = next;
        } else if style.verbatim_strings && (rest.starts_with(b"@\"") || rest.starts_with(b"$@\"") || rest.starts_with(b"@$\"")) {
            let open = i + rest.iter().position(|&b| b == b'"').unwrap_or(0) + 1;
            let (content_end, next) = scan_verbatim(bytes, open);
            if style.mask_strings {
                blank(&mut out, open, content_end);
            }
            i = next;
        } else if style.template_literals && rest[0] == b'`' {
            let (content_end, next) = scan_quoted(bytes, i + 1, b'`', true);
            if style.mask_strings {
                blank(&mut out, i + 1, content_end);
            }
            i = next;
        } else if rest[0] == b'"' || rest[0] == b'\'' {
            let (content_end, next) = scan_quoted(bytes, i + 1, rest[0], false);
            if style.mask_strings {
                blank(&mut out, i + 1, content_end);
            }
            i = next;
        } else {
            i += 1;
        }
    }

    // Only whole regions delimited by ASCII bytes were blanked, so this holds
    String::from_utf8(out).unwrap_or_else(|_| text.to_string())
}

/// Copy of a block body with the contents of every nested `{...}` blanked.
///
/// Braces of depth-one blocks are kept; only what sits directly in the
/// body stays readable.
pub fn flatten_nested(body: &str) -> String {
    let mut out = body.as_bytes().to_vec();
    let mut depth = 0usize;
    for b in out.iter_mut() {
        match *b {
            b'{' => {
                if depth > 0 {
                    *b = b' ';
                }
                depth += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth > 0 {
                    *b = b' ';
                }
            }
            b'\n' => {}
            _ if depth > 0 => *b = b' ',
            _ => {}
        }
    }
    String::from_utf8(out).unwrap_or_else(|_| body.to_string())
}

/// Remove every balanced `<...>` run, innermost first
pub fn strip_generics(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '<' => depth += 1,
            '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Remove balanced `[...]` subscripts, as in `Generic[T]`
pub fn strip_subscripts(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Split on commas that are not nested inside `<>`, `()`, `[]` or `{}`
pub fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            ',' if depth <= 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Leading identifier of `text` (letters, digits, `_`, `$`)
pub fn leading_identifier(text: &str) -> Option<&str> {
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '$'))
        .map_or(text.len(), |(i, _)| i);
    let ident = &text[..end];
    match ident.chars().next() {
        Some(c) if !c.is_ascii_digit() => Some(ident),
        _ => None,
    }
}

/// One-based line number of a byte offset
pub fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

fn blank(out: &mut [u8], from: usize, to: usize) {
    let to = to.min(out.len());
    for b in &mut out[from..to] {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|p| p + from)
}

fn find_sub(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// `(content_end, next)` for a quoted literal whose contents start at `from`.
/// Single-line literals stop at an unescaped newline.
fn scan_quoted(bytes: &[u8], from: usize, quote: u8, multiline: bool) -> (usize, usize) {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if !multiline => return (i, i),
            b if b == quote => return (i, i + 1),
            _ => i += 1,
        }
    }
    (bytes.len(), bytes.len())
}

fn scan_verbatim(bytes: &[u8], from: usize) -> (usize, usize) {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            return (i, i + 1);
        }
        i += 1;
    }
    (bytes.len(), bytes.len())
}

fn scan_triple(bytes: &[u8], from: usize, quote: &[u8]) -> (usize, usize) {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i..].starts_with(quote) {
            return (i, i + 3);
        }
        i += 1;
    }
    (bytes.len(), bytes.len())
}
