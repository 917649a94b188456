//! Diagnostics
//!
//! Non-fatal findings collected while analysing a schema. Anything that
//! would make the output wrong is a `SchemaError` instead and aborts the run;
//! what lands here still generates, just less precisely than the schema
//! author may expect.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// $ref target has no definition
    UnresolvedRef,
    /// Enum members collide after name normalization
    EnumVariantConflict,
    /// Two properties of one type map to the same Rust field
    FieldNameConflict,
    /// `default` on a property whose type cannot hold a literal
    UnsupportedDefault,
    /// anyOf looked discriminated but fewer than two values resolved
    UndiscriminatedAnyOf,
    /// Property-level union degraded to a dynamic value
    OpaqueUnion,
    /// Recursive reference stored behind a Box
    BoxedRecursion,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnresolvedRef => "W001",
            Self::EnumVariantConflict => "W002",
            Self::UnsupportedDefault => "W003",
            Self::UndiscriminatedAnyOf => "W004",
            Self::FieldNameConflict => "W005",
            Self::OpaqueUnion => "I001",
            Self::BoxedRecursion => "I002",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::UnresolvedRef
            | Self::EnumVariantConflict
            | Self::UnsupportedDefault
            | Self::UndiscriminatedAnyOf
            | Self::FieldNameConflict => Severity::Warning,

            Self::OpaqueUnion | Self::BoxedRecursion => Severity::Info,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticItem {
    /// Definition that caused this diagnostic
    pub definition: String,
    pub code: DiagnosticCode,
    pub message: String,
    /// Additional context (property names, original values)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl DiagnosticItem {
    pub fn new(definition: impl Into<String>, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.code,
            self.code.severity(),
            self.message,
            self.definition
        )?;

        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }

        Ok(())
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics from analysis passes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item; warnings are logged as they arrive
    pub fn push(&mut self, item: DiagnosticItem) {
        match item.severity() {
            Severity::Warning => warn!(code = %item.code, definition = %item.definition, "{}", item.message),
            Severity::Info => info!(code = %item.code, definition = %item.definition, "{}", item.message),
        }
        self.items.push(item);
    }

    pub fn unresolved_ref(&mut self, definition: impl Into<String>, target: &str) {
        self.push(DiagnosticItem::new(
            definition,
            DiagnosticCode::UnresolvedRef,
            format!("$ref target '{}' has no definition", target),
        ));
    }

    pub fn enum_variant_conflict(&mut self, definition: impl Into<String>, name: &str, renamed: &str) {
        self.push(
            DiagnosticItem::new(
                definition,
                DiagnosticCode::EnumVariantConflict,
                format!("member '{}' appears twice after normalization", name),
            )
            .with_context(format!("renamed to '{}'", renamed)),
        );
    }

    pub fn field_name_conflict(&mut self, definition: impl Into<String>, property: &str, field: &str) {
        self.push(
            DiagnosticItem::new(
                definition,
                DiagnosticCode::FieldNameConflict,
                format!("property '{}' maps to a field name already in use", property),
            )
            .with_context(format!("field renamed to '{}'", field)),
        );
    }

    pub fn unsupported_default(&mut self, definition: impl Into<String>, property: &str, default: &serde_json::Value) {
        self.push(
            DiagnosticItem::new(
                definition,
                DiagnosticCode::UnsupportedDefault,
                format!("default for '{}' is not a literal of its type; field stays optional", property),
            )
            .with_context(format!("default: {}", default)),
        );
    }

    pub fn undiscriminated_any_of(&mut self, definition: impl Into<String>, resolved: usize) {
        self.push(DiagnosticItem::new(
            definition,
            DiagnosticCode::UndiscriminatedAnyOf,
            format!("anyOf has {} resolvable discriminator value(s); needs at least 2", resolved),
        ));
    }

    pub fn opaque_union(&mut self, definition: impl Into<String>, property: &str) {
        self.push(DiagnosticItem::new(
            definition,
            DiagnosticCode::OpaqueUnion,
            format!("union property '{}' is kept as a dynamic value", property),
        ));
    }

    /// A root `oneOf`/`anyOf` that is neither an enum, a union nor a record
    pub fn opaque_definition(&mut self, definition: impl Into<String>) {
        self.push(DiagnosticItem::new(
            definition,
            DiagnosticCode::OpaqueUnion,
            "union definition is kept as a dynamic value",
        ));
    }

    pub fn boxed_recursion(&mut self, definition: impl Into<String>, property: &str, target: &str) {
        self.push(
            DiagnosticItem::new(
                definition,
                DiagnosticCode::BoxedRecursion,
                format!("property '{}' is recursive and is boxed", property),
            )
            .with_context(format!("target: {}", target)),
        );
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Whether any item carries `code`
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.items.iter().any(|i| i.code == code)
    }

    /// Format all diagnostics for display
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for item in &self.items {
            output.push_str(&format!("{}\n", item));
        }

        if !self.is_empty() {
            output.push_str(&format!(
                "\n{} warning(s), {} note(s)\n",
                self.warning_count(),
                self.len() - self.warning_count()
            ));
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticItem;
    type IntoIter = std::slice::Iter<'a, DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_severity() {
        assert_eq!(DiagnosticCode::UnresolvedRef.severity(), Severity::Warning);
        assert_eq!(DiagnosticCode::OpaqueUnion.severity(), Severity::Info);
    }

    #[test]
    fn test_diagnostics_collection() {
        let mut diags = Diagnostics::new();
        diags.unresolved_ref("Plan", "Ghost");
        diags.opaque_union("Plan", "entries");

        assert_eq!(diags.len(), 2);
        assert_eq!(diags.warning_count(), 1);
        assert!(diags.contains(DiagnosticCode::UnresolvedRef));
        assert!(diags.format_all().contains("[W001] warning"));
    }

    #[test]
    fn test_field_conflict_is_its_own_code() {
        let mut diags = Diagnostics::new();
        diags.field_name_conflict("Usage", "total-tokens", "total_tokens2");

        assert!(diags.contains(DiagnosticCode::FieldNameConflict));
        assert!(!diags.contains(DiagnosticCode::EnumVariantConflict));
        assert_eq!(diags.warning_count(), 1);
        assert!(diags.format_all().contains("[W005] warning"));
    }

    #[test]
    fn test_display_includes_context() {
        let item = DiagnosticItem::new("StopReason", DiagnosticCode::EnumVariantConflict, "clash")
            .with_context("renamed to 'EndTurn2'");
        let text = item.to_string();
        assert!(text.contains("StopReason"));
        assert!(text.contains("  - renamed to 'EndTurn2'"));
    }
}
