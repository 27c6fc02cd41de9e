//! Segmentation: carving a version string into schema-positioned components.
//!
//! Segmentation is shape-driven, not value-driven: it decides which slice of
//! the version text belongs to which schema position, using the schema's
//! separators. Value validation happens later, in the matcher. Ambiguity
//! comes from branch names, which may legally contain every separator
//! character, so a schema with a branch changes how dashes and pluses are
//! interpreted.

use crate::element::ElementKind;
use crate::schema::{Schema, SchemaElement};

/// Suffix marking a Maven-style snapshot version.
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// The outcome of segmenting one version string against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    /// Positional components, in schema order, paired with their elements.
    /// Dash/plus-joined modifier and metadata elements are not positional;
    /// their text lands in `modifier`/`metadata` instead.
    pub components: Vec<(SchemaElement, String)>,
    /// Text split off by the modifier rules, verbatim.
    pub modifier: Option<String>,
    /// Text split off after the first `+`, verbatim.
    pub metadata: Option<String>,
    /// Whether the version carried a `-SNAPSHOT` suffix.
    pub snapshot: bool,
}

impl ParsedVersion {
    /// The component text at the first position of `kind`, if present.
    pub fn component(&self, kind: ElementKind) -> Option<&str> {
        self.components
            .iter()
            .find(|(e, _)| e.kind == kind)
            .map(|(_, text)| text.as_str())
    }
}

/// Segments `version` against `schema`. Returns `None` when the text cannot
/// fill every required position; this is absence, not an error.
pub fn segment(version: &str, schema: &Schema) -> Option<ParsedVersion> {
    let (text, snapshot) = match version.strip_suffix(SNAPSHOT_SUFFIX) {
        Some(stripped) => (stripped, true),
        None => (version, false),
    };

    let handles_branch = schema.contains(ElementKind::Branch);
    let dash_after_branch = dash_follows_branch(schema);

    let mut text = text;
    let mut modifier = None;
    let mut metadata = None;

    if !handles_branch {
        if let Some(at) = text.find('+') {
            metadata = Some(text[at + 1..].to_string());
            text = &text[..at];
        }
    }

    if text.contains('-') && (!handles_branch || dash_after_branch) {
        let many_dashes = text.matches('-').count() > 1;
        let split = if many_dashes && dash_after_branch && has_modifier_kind(schema) {
            // the trailing dash-joined token is the modifier, everything
            // before it may belong to the branch
            text.rsplit_once('-')
        } else if !dash_after_branch {
            text.split_once('-')
        } else {
            None
        };
        if let Some((head, tail)) = split {
            modifier = Some(tail.to_string());
            text = head;
        }
    }

    let components = walk(text, &schema.positional_elements())?;

    Some(ParsedVersion {
        components,
        modifier,
        metadata,
        snapshot,
    })
}

/// Whether some element after the branch position is dash-joined. When true,
/// a dash in the version is schema structure, not a modifier split point.
fn dash_follows_branch(schema: &Schema) -> bool {
    let Some(branch_at) = schema.position(ElementKind::Branch) else {
        return false;
    };
    schema
        .elements()
        .iter()
        .enumerate()
        .any(|(i, e)| i > branch_at && e.separator == Some('-'))
}

fn has_modifier_kind(schema: &Schema) -> bool {
    schema.contains(ElementKind::SemverModifier) || schema.contains(ElementKind::CalverModifier)
}

/// Assigns text to positions, retrying without a leading optional element
/// when the full element list cannot be satisfied. The retry is what lets an
/// optional head vanish together with the separator that would join it to
/// the next element.
fn walk(text: &str, elements: &[SchemaElement]) -> Option<Vec<(SchemaElement, String)>> {
    match assign(text, elements) {
        Some(components) => Some(components),
        None if elements.first().map_or(false, |e| e.optional) => walk(text, &elements[1..]),
        None => None,
    }
}

/// Assigns text to positions left to right. An element that may contain
/// separators and is not last flips to right-anchored consumption: the
/// elements behind it are carved off the tail first, each taking the text
/// after the last occurrence of its own front separator, and the greedy
/// element keeps whatever remains.
fn assign(text: &str, elements: &[SchemaElement]) -> Option<Vec<(SchemaElement, String)>> {
    let mut components = Vec::with_capacity(elements.len());
    let mut rest = text;
    let mut i = 0;
    while i < elements.len() {
        if rest.is_empty() {
            break;
        }
        let element = elements[i];
        let last = i == elements.len() - 1;
        if element.kind.may_contain_separators() && !last {
            let mut tail = Vec::new();
            for follower in elements[i + 1..].iter().rev() {
                let sep = follower.separator?;
                match rest.rfind(sep) {
                    Some(at) => {
                        tail.push((*follower, rest[at + 1..].to_string()));
                        rest = &rest[..at];
                    }
                    None if follower.optional => continue,
                    None => return None,
                }
            }
            if !rest.is_empty() {
                components.push((element, rest.to_string()));
            }
            components.extend(tail.into_iter().rev());
            rest = "";
            break;
        }
        let taken = if last {
            let taken = rest;
            rest = "";
            taken
        } else {
            match elements[i + 1]
                .separator
                .and_then(|sep| rest.find(sep))
            {
                Some(at) => {
                    let taken = &rest[..at];
                    rest = &rest[at + 1..];
                    taken
                }
                None => {
                    let taken = rest;
                    rest = "";
                    taken
                }
            }
        };
        if taken.is_empty() {
            return None;
        }
        components.push((element, taken.to_string()));
        i += 1;
    }
    // every position the text never reached must be optional
    let filled: Vec<ElementKind> = components.iter().map(|(e, _)| e.kind).collect();
    if elements
        .iter()
        .any(|e| !e.optional && !filled.contains(&e.kind))
    {
        return None;
    }
    Some(components)
}
