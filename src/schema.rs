//! Schema parsing: schema text to an ordered element list.
//!
//! A schema is a separator-joined list of element names, e.g.
//! `YYYY.0M.Micro-Modifier`. Each element after the first records the
//! separator in front of it; a trailing `?` marks an element optional.
//! A handful of well-known schema names resolve as aliases before parsing.

use std::fmt;

use crate::element::ElementKind;
use crate::error::SchemaError;

/// The characters that may join schema elements (and version components).
pub const SEPARATORS: [char; 4] = ['.', '+', '-', '_'];

/// Well-known schema names, resolved case-insensitively before parsing.
const ALIASES: &[(&str, &str)] = &[
    ("semver", "Major.Minor.Patch-Modifier?+Metadata?"),
    ("four_part", "Major.Minor.Patch.Nano-Modifier?+Metadata?"),
    ("calver_ubuntu", "YY.0M.Micro"),
    ("calver_modifier", "YYYY.0M.Calvermodifier.Micro+Metadata"),
    ("calver_modifier_minor", "YYYY.0M.Calvermodifier.Minor.Micro+Metadata"),
    ("feature_branch", "Branch.Micro"),
    ("feature_branch_calver", "YYYY.0M.Branch.Micro"),
];

/// Resolves a schema alias to its full schema text, or returns the input
/// unchanged when it is not an alias.
pub fn resolve_alias(text: &str) -> &str {
    let trimmed = text.trim();
    ALIASES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        .map_or(text, |(_, schema)| schema)
}

/// One position of a parsed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaElement {
    /// What stands at this position.
    pub kind: ElementKind,
    /// The separator in front of this element. `None` for the first element.
    pub separator: Option<char>,
    /// Set when the preceding element was optional, which makes this
    /// element's separator optional too.
    pub separator_optional: bool,
    /// Marked with a trailing `?` in schema text.
    pub optional: bool,
}

/// A parsed, validated schema.
///
/// Synonymous spellings parse to the same element list: `Major.Minor.Patch`
/// and `MAJOR.MINOR.MICRO` have equal [`elements`](Schema::elements).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    text: String,
    elements: Vec<SchemaElement>,
}

impl Schema {
    /// Parses schema text, resolving aliases first. Any unknown element name
    /// fails the whole parse.
    pub fn parse(text: &str) -> Result<Schema, SchemaError> {
        let resolved = resolve_alias(text);
        if resolved.trim().is_empty() {
            return Err(SchemaError::EmptySchema);
        }
        let mut elements = Vec::new();
        let mut token = String::new();
        let mut front: Option<char> = None;
        for ch in resolved.chars() {
            if SEPARATORS.contains(&ch) {
                Self::push_element(resolved, &mut elements, &token, front)?;
                token.clear();
                front = Some(ch);
            } else {
                token.push(ch);
            }
        }
        Self::push_element(resolved, &mut elements, &token, front)?;
        if elements[0].optional && elements.len() > 1 {
            elements[1].separator_optional = true;
        }
        Ok(Schema {
            text: resolved.to_string(),
            elements,
        })
    }

    fn push_element(
        schema: &str,
        elements: &mut Vec<SchemaElement>,
        token: &str,
        separator: Option<char>,
    ) -> Result<(), SchemaError> {
        let kind = ElementKind::lookup(token).ok_or_else(|| SchemaError::UnknownElement {
            element: token.to_string(),
            schema: schema.to_string(),
        })?;
        elements.push(SchemaElement {
            kind,
            separator,
            separator_optional: false,
            optional: token.ends_with('?'),
        });
        Ok(())
    }

    /// The alias-resolved schema text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The ordered element positions.
    pub fn elements(&self) -> &[SchemaElement] {
        &self.elements
    }

    /// Whether any position holds `kind`.
    pub fn contains(&self, kind: ElementKind) -> bool {
        self.elements.iter().any(|e| e.kind == kind)
    }

    /// The index of the first position holding `kind`.
    pub fn position(&self, kind: ElementKind) -> Option<usize> {
        self.elements.iter().position(|e| e.kind == kind)
    }

    /// The positions that carry version components, i.e. everything except
    /// modifier and metadata elements joined by `-` or `+` (those are
    /// extracted before segmentation, not matched positionally).
    pub(crate) fn positional_elements(&self) -> Vec<SchemaElement> {
        self.elements
            .iter()
            .copied()
            .filter(|e| !is_extracted(e))
            .collect()
    }

    /// Whether the schema is the plain `Major.Minor.Patch` shape, possibly
    /// followed by a dash modifier and plus metadata.
    pub fn is_semver(&self) -> bool {
        let kinds: Vec<_> = self.positional_elements().iter().map(|e| e.kind).collect();
        kinds == [ElementKind::Major, ElementKind::Minor, ElementKind::Patch]
    }

    /// Whether the schema carries any calendar element.
    pub fn is_calver(&self) -> bool {
        self.elements.iter().any(|e| e.kind.is_date())
    }

    pub(crate) fn has_year(&self) -> bool {
        self.elements.iter().any(|e| e.kind.reads_year())
    }

    pub(crate) fn has_month(&self) -> bool {
        self.elements.iter().any(|e| e.kind.reads_month())
    }

    pub(crate) fn has_day(&self) -> bool {
        self.elements.iter().any(|e| e.kind.reads_day())
    }
}

/// True for modifier/metadata elements that the segmenter extracts through
/// their `-`/`+` separator instead of matching positionally.
pub(crate) fn is_extracted(element: &SchemaElement) -> bool {
    matches!(
        element.kind,
        ElementKind::SemverModifier | ElementKind::Metadata
    ) && matches!(element.separator, Some('-') | Some('+'))
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
