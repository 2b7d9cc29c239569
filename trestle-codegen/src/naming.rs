// Name conversion utilities for codegen.
//
// All casing functions are built on one word splitter so that every target
// runtime sees the same word boundaries. The splitter is deterministic and
// injective modulo casing: re-casing a converted name yields the same word
// sequence as converting the original.

/// Split an identifier into its word fragments.
///
/// A new word starts when (a) a non-alphanumeric separator is seen, (b) an
/// uppercase letter follows a lowercase letter, (c) an uppercase letter is
/// followed by a lowercase letter while preceded by another uppercase letter
/// ("HTTPServer" -> "HTTP", "Server"), or (d) a digit run meets a letter run
/// or vice versa. Fragments keep their original characters.
pub fn split_words(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = (ch.is_uppercase() && prev.is_lowercase())
                || (ch.is_uppercase() && prev.is_uppercase() && next_lower)
                || (ch.is_ascii_digit() && prev.is_alphabetic())
                || (ch.is_alphabetic() && prev.is_ascii_digit());
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// "getItem" -> "GetItem", "HTTPServer" -> "HttpServer".
pub fn to_pascal_case(identifier: &str) -> String {
    split_words(identifier)
        .iter()
        .map(|w| capitalize(&w.to_lowercase()))
        .collect()
}

/// "GetItem" -> "getItem". The first fragment stays fully lower-case.
pub fn to_camel_case(identifier: &str) -> String {
    let words = split_words(identifier);
    let mut out = String::with_capacity(identifier.len());
    for (i, w) in words.iter().enumerate() {
        let lower = w.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            out.push_str(&capitalize(&lower));
        }
    }
    out
}

/// "getItem" -> "get-item".
pub fn to_kebab_case(identifier: &str) -> String {
    split_words(identifier)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// "getItem" -> "get_item". Used for generated file names.
pub fn to_snake_case(identifier: &str) -> String {
    split_words(identifier)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Per-target reserved word escaping
// ---------------------------------------------------------------------------

const TS_RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "new", "null", "return",
    "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void",
    "while", "with", "yield",
];

const KOTLIN_RESERVED: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if",
    "in", "interface", "is", "null", "object", "package", "return", "super",
    "this", "throw", "true", "try", "typealias", "typeof", "val", "var", "when",
    "while",
];

const SWIFT_RESERVED: &[&str] = &[
    "as", "break", "case", "catch", "class", "continue", "default", "defer", "do",
    "else", "enum", "extension", "fallthrough", "false", "for", "func", "guard",
    "if", "import", "in", "internal", "is", "let", "nil", "protocol", "public",
    "repeat", "return", "self", "static", "struct", "switch", "throw", "true",
    "try", "var", "where", "while",
];

/// Escape a TypeScript reserved word by appending an underscore.
pub fn escape_ts(name: &str) -> String {
    if TS_RESERVED.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Escape a Kotlin reserved word with backtick quoting.
pub fn escape_kotlin(name: &str) -> String {
    if KOTLIN_RESERVED.contains(&name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// Escape a Swift reserved word with backtick quoting.
pub fn escape_swift(name: &str) -> String {
    if SWIFT_RESERVED.contains(&name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}
