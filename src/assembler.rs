//! Markdown document assembly.
//!
//! One section per admitted non-empty file, rendered under a `# Project
//! Files` heading. Bodies sit inside `~~~` fences so that ``` blocks in the
//! source cannot terminate them early; a body line that itself begins with
//! `~~~` is escaped. An optional appendix follows a horizontal rule.

use std::fmt::Write as _;

/// Heading line opening every document.
pub const DOCUMENT_HEADING: &str = "# Project Files";

/// Fence delimiter wrapping file bodies.
pub const FENCE: &str = "~~~";

/// One file's rendered contribution to the document.
#[derive(Debug, Clone)]
pub struct Section {
    /// Root-relative path, used verbatim as the heading
    pub heading: String,
    /// Cleaned and redacted body, trimmed and non-empty
    pub body: String,
}

impl Section {
    /// Creates a section, trimming the body and escaping embedded fence
    /// delimiters. Returns `None` for bodies with no visible content.
    #[must_use]
    pub fn new(heading: impl Into<String>, body: &str) -> Option<Self> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            heading: heading.into(),
            body: escape_fences(trimmed),
        })
    }
}

/// The assembled document: ordered sections plus an optional appendix.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Sections in enumeration order
    pub sections: Vec<Section>,
    /// Free-form text appended after a horizontal rule
    pub appendix: Option<String>,
}

impl Document {
    /// Creates a document from ordered sections and an optional appendix.
    #[must_use]
    pub fn new(sections: Vec<Section>, appendix: Option<String>) -> Self {
        Self { sections, appendix }
    }

    /// Renders the full Markdown text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(DOCUMENT_HEADING);
        out.push_str("\n\n");

        for section in &self.sections {
            let _ = write!(
                out,
                "## {}\n{FENCE}\n{}\n{FENCE}\n\n",
                section.heading, section.body
            );
        }

        if let Some(appendix) = &self.appendix {
            let _ = write!(out, "---\n\n{appendix}\n");
        }

        out
    }
}

/// Escapes body lines that would close a `~~~` fence early.
fn escape_fences(body: &str) -> String {
    if !body.contains(FENCE) {
        return body.to_string();
    }
    body.lines()
        .map(|line| {
            if line.trim_start().starts_with(FENCE) {
                format!("\\{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_skips_blank_bodies() {
        assert!(Section::new("a.rs", "   \n\t ").is_none());
        assert!(Section::new("a.rs", "fn main() {}").is_some());
    }

    #[test]
    fn test_section_trims_body() {
        let section = Section::new("a.rs", "\n\nfn main() {}\n\n").unwrap();
        assert_eq!(section.body, "fn main() {}");
    }

    #[test]
    fn test_render_single_section() {
        let doc = Document::new(
            vec![Section::new("src/a.rs", "fn a() {}").unwrap()],
            None,
        );
        assert_eq!(
            doc.render(),
            "# Project Files\n\n## src/a.rs\n~~~\nfn a() {}\n~~~\n\n"
        );
    }

    #[test]
    fn test_render_preserves_section_order() {
        let doc = Document::new(
            vec![
                Section::new("a.rs", "a").unwrap(),
                Section::new("b.rs", "b").unwrap(),
            ],
            None,
        );
        let rendered = doc.render();
        let a_pos = rendered.find("## a.rs").unwrap();
        let b_pos = rendered.find("## b.rs").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn test_render_appendix_after_rule() {
        let doc = Document::new(
            vec![Section::new("a.rs", "fn a() {}").unwrap()],
            Some("Fix the frobnicator".to_string()),
        );
        let rendered = doc.render();
        assert!(rendered.ends_with("---\n\nFix the frobnicator\n"));
    }

    #[test]
    fn test_render_empty_appendix_still_separated() {
        let doc = Document::new(Vec::new(), Some(String::new()));
        assert_eq!(doc.render(), "# Project Files\n\n---\n\n\n");
    }

    #[test]
    fn test_backtick_fences_pass_through() {
        let section = Section::new("doc.md", "```rust\nfn x() {}\n```").unwrap();
        assert!(section.body.contains("```rust"));
    }

    #[test]
    fn test_tilde_fences_escaped() {
        let section = Section::new("notes.md", "~~~\ninner\n~~~").unwrap();
        for line in section.body.lines() {
            assert!(!line.trim_start().starts_with(FENCE));
        }
    }

    #[test]
    fn test_paths_rendered_verbatim() {
        let doc = Document::new(
            vec![Section::new("deep/nested dir/file name.rs", "x").unwrap()],
            None,
        );
        assert!(doc.render().contains("## deep/nested dir/file name.rs"));
    }
}
