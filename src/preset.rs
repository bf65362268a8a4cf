//! Named prompt presets for the appendix.
//!
//! The `--prompt` value resolves against this table first; an unknown value
//! is used verbatim as free-form appendix text.

/// Type of preset prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    /// Comprehensive code review
    CodeReview,
    /// Documentation generation
    Documentation,
    /// Refactoring suggestions
    Refactoring,
    /// Bug detection and analysis
    BugAnalysis,
    /// Security audit
    SecurityAudit,
}

impl PresetKind {
    /// Returns the ID string for this preset.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::CodeReview => "code-review",
            Self::Documentation => "documentation",
            Self::Refactoring => "refactoring",
            Self::BugAnalysis => "bug-analysis",
            Self::SecurityAudit => "security-audit",
        }
    }

    /// Returns all available preset kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CodeReview,
            Self::Documentation,
            Self::Refactoring,
            Self::BugAnalysis,
            Self::SecurityAudit,
        ]
    }

    /// Parse preset kind from string ID.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "code-review" => Some(Self::CodeReview),
            "documentation" => Some(Self::Documentation),
            "refactoring" => Some(Self::Refactoring),
            "bug-analysis" => Some(Self::BugAnalysis),
            "security-audit" => Some(Self::SecurityAudit),
            _ => None,
        }
    }

    /// Returns the canned instruction text for this preset.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::CodeReview => {
                "Review the code above. Point out correctness issues, risky patterns, \
                 and places where the implementation diverges from its apparent intent. \
                 Rank findings by severity."
            }
            Self::Documentation => {
                "Write developer documentation for the project above: a short overview, \
                 the main modules and their responsibilities, and usage examples for the \
                 public entry points."
            }
            Self::Refactoring => {
                "Suggest refactorings for the code above. Prefer changes that reduce \
                 duplication, clarify ownership, and shrink public surface area. Show \
                 before/after sketches for the top suggestions."
            }
            Self::BugAnalysis => {
                "Hunt for bugs in the code above: off-by-one errors, unchecked edge \
                 cases, ordering assumptions, and error paths that drop information. \
                 For each, give a concrete failing scenario."
            }
            Self::SecurityAudit => {
                "Audit the code above for security issues: injection points, unsafe \
                 deserialization, path traversal, secret handling, and missing \
                 validation at trust boundaries."
            }
        }
    }
}

/// Resolves a `--prompt` value: preset text for a known ID, the value
/// itself otherwise.
#[must_use]
pub fn resolve_prompt(value: &str) -> String {
    match PresetKind::from_id(value.trim()) {
        Some(kind) => kind.prompt().to_string(),
        None => value.to_string(),
    }
}
