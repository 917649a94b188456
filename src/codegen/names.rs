//! Naming Normalizer
//!
//! Pure string -> identifier transforms shared by the analyzer and the
//! emitter:
//! - `convert_property_name`: schema property/const text -> PascalCase member
//! - `class_name`: definition name -> type name (first letter upper-cased)
//! - `member_name`: property name inside a type, with the collision rule
//! - `to_snake_case` / `to_screaming_snake_case`: Rust field and const casing
//! - `escape_keyword`: keywords made legal as identifiers
//!
//! `NameRegistry` tracks every emitted type name so that two definitions can
//! never silently produce the same Rust type.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, SchemaError};

fn invalid_ident_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("literal pattern compiles"))
}

/// Suffix appended to a member whose name equals its type's name
pub const COLLISION_SUFFIX: &str = "Value";

// =============================================================================
// Conversions
// =============================================================================

/// Convert a schema property name or literal into a PascalCase identifier.
///
/// `load_session` -> `LoadSession`, `_meta` -> `Meta`, `userID` -> `UserID`,
/// `parse error` -> `ParseError`, `invalid-name` -> `Invalidname`,
/// `123abc` -> `_123abc`.
pub fn convert_property_name(name: &str) -> String {
    if name == "_meta" {
        return "Meta".to_string();
    }

    // Snake-case segments keep their own casing past the first letter
    let mut result: String = name
        .split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize_first)
        .collect();

    // Space-delimited titles are re-cased word by word
    if result.contains(' ') {
        result = result
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                    None => String::new(),
                }
            })
            .collect();
    }

    let mut result = invalid_ident_chars().replace_all(&result, "").into_owned();

    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    result
}

/// Type name for a definition: the first character upper-cased, the rest kept
pub fn class_name(name: &str) -> String {
    escape_keyword(&capitalize_first(name))
}

/// Identifier for an enum member or sum-type case built from schema text
pub fn case_name(text: &str) -> String {
    let name = convert_property_name(text);
    if name.is_empty() {
        "Variant".to_string()
    } else {
        escape_keyword(&name)
    }
}

/// `session_new` -> `SessionNew`; every segment after the first letter is lower-cased
pub fn convert_to_pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a PascalCase identifier to snake_case.
///
/// Runs of capitals stay together: `UserID` -> `user_id`, `SessionId` -> `session_id`.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c == '-' || c == ' ' {
            result.push('_');
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }

    result
}

pub fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_ascii_uppercase()
}

// =============================================================================
// Keywords
// =============================================================================

/// Keywords that can't be raw identifiers
pub const UNRAWABLE_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

pub const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "else", "enum", "extern", "false", "fn", "for", "if",
    "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while", "async",
    "await", "dyn", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// `type` -> `r#type`; `self`, `Self`, `super` and `crate` take a trailing underscore
pub fn escape_keyword(name: &str) -> String {
    if UNRAWABLE_KEYWORDS.contains(&name) {
        format!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

// =============================================================================
// Member names
// =============================================================================

/// Identifier chosen for one property of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberName {
    /// PascalCase member identifier
    pub identifier: String,
    /// The wire name must be spelled out even if it would otherwise be inferred
    pub forced_rename: bool,
}

/// Member identifier for `property` inside type `class`.
///
/// A member may not share its type's name: `value` inside `Value` becomes
/// `ValueValue`, and its wire name is pinned to `value`.
pub fn member_name(class: &str, property: &str) -> MemberName {
    let identifier = convert_property_name(property);
    if identifier == class {
        MemberName {
            identifier: format!("{}{}", identifier, COLLISION_SUFFIX),
            forced_rename: true,
        }
    } else {
        MemberName {
            identifier,
            forced_rename: false,
        }
    }
}

// =============================================================================
// Name Registry
// =============================================================================

/// Tracks emitted type names and who produced them
#[derive(Debug, Default)]
pub struct NameRegistry {
    owners: HashMap<String, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name` for `owner`; a second owner is a generation error
    pub fn claim(&mut self, name: &str, owner: &str) -> Result<()> {
        match self.owners.get(name) {
            Some(existing) if existing != owner => Err(SchemaError::TypeNameCollision {
                name: name.to_string(),
                first: existing.clone(),
                second: owner.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.owners.insert(name.to_string(), owner.to_string());
                Ok(())
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
