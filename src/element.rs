//! The closed set of schema elements and their value rules.
//!
//! Every position in a schema names one [`ElementKind`]. A kind owns its
//! synonym set (what it may be called in schema text) and a validation rule
//! for the version text that can appear at its position.

use std::fmt;

/// A kind of element that can appear at a schema position.
///
/// The set is closed: schemas are built only from these kinds, and an
/// unrecognized name is a configuration error, never a soft fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Semantic major component.
    Major,
    /// Semantic minor component.
    Minor,
    /// Semantic patch component. Also answers to `micro`, `bugfix` and
    /// `build`.
    Patch,
    /// Fourth semantic component below patch (`revision`, `hotfix`).
    Nano,
    /// SemVer-style prerelease modifier, separated by `-` in the rendered
    /// version and optional at render time.
    SemverModifier,
    /// CalVer-style modifier that occupies a regular schema position and
    /// always renders.
    CalverModifier,
    /// Build metadata, separated by `+` and optional at render time.
    Metadata,
    /// Full year, e.g. `2024`.
    Yyyy,
    /// Full year and zero-padded month as one component, e.g. `202403`.
    YyyyOm,
    /// Short year and zero-padded month as one component, e.g. `2403`.
    YyOm,
    /// Short year without padding, e.g. `24`.
    Yy,
    /// Short year zero-padded to two digits, e.g. `04`.
    Oy,
    /// Month without padding, `1`-`12`.
    Mm,
    /// Month zero-padded to two digits, `01`-`12`.
    Om,
    /// Day of month without padding, `1`-`31`.
    Dd,
    /// Day of month zero-padded to two digits.
    Od,
    /// Opaque build identifier supplied by CI.
    Buildid,
    /// Opaque build environment name supplied by CI.
    Buildenv,
    /// Branch name. May contain separators, slashes and colons.
    Branch,
}

use ElementKind::*;

/// All kinds, in no significant order. The set is small enough that lookups
/// just scan it.
pub(crate) const ALL: &[ElementKind] = &[
    Major,
    Minor,
    Patch,
    Nano,
    SemverModifier,
    CalverModifier,
    Metadata,
    Yyyy,
    YyyyOm,
    YyOm,
    Yy,
    Oy,
    Mm,
    Om,
    Dd,
    Od,
    Buildid,
    Buildenv,
    Branch,
];

impl ElementKind {
    /// The names this kind answers to in schema text, lowercase. The first
    /// entry is the canonical name.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Major => &["major"],
            Minor => &["minor"],
            Patch => &["patch", "micro", "bugfix", "build"],
            Nano => &["nano", "revision", "hotfix"],
            SemverModifier => &["modifier", "identifier", "mod", "ident", "id"],
            CalverModifier => &["calvermodifier", "calvermod", "calverid", "stable"],
            Metadata => &["metadata", "meta"],
            Yyyy => &["yyyy", "year"],
            YyyyOm => &["yyyyom", "yyyy0m"],
            YyOm => &["yyom", "yy0m"],
            Yy => &["yy"],
            Oy => &["oy", "0y"],
            Mm => &["mm", "month"],
            Om => &["om", "0m"],
            Dd => &["dd", "day"],
            Od => &["od", "0d"],
            Buildid => &["buildid", "cibuildid", "cibuild"],
            Buildenv => &["buildenv", "cienv", "cibuildenv"],
            Branch => &["branch", "branchname"],
        }
    }

    /// Resolves a schema token (or a pin component) to its kind.
    ///
    /// Matching is case-insensitive and ignores one trailing `?`, the
    /// optionality marker.
    pub fn lookup(name: &str) -> Option<ElementKind> {
        let name = name.strip_suffix('?').unwrap_or(name);
        if name.is_empty() || !name.is_ascii() {
            return None;
        }
        let lower = name.to_ascii_lowercase();
        ALL.iter()
            .copied()
            .find(|kind| kind.synonyms().contains(&lower.as_str()))
    }

    /// Whether version text at this position may itself contain separator
    /// characters. Such elements consume greedily during segmentation.
    pub fn may_contain_separators(self) -> bool {
        matches!(self, SemverModifier | CalverModifier | Branch)
    }

    /// Whether this is one of the four counted semantic kinds.
    pub fn is_numeric(self) -> bool {
        matches!(self, Major | Minor | Patch | Nano)
    }

    /// Whether this kind reads any calendar field.
    pub fn is_date(self) -> bool {
        matches!(self, Yyyy | YyyyOm | YyOm | Yy | Oy | Mm | Om | Dd | Od)
    }

    pub(crate) fn reads_year(self) -> bool {
        matches!(self, Yyyy | YyyyOm | YyOm | Yy | Oy)
    }

    pub(crate) fn reads_month(self) -> bool {
        matches!(self, YyyyOm | YyOm | Mm | Om)
    }

    pub(crate) fn reads_day(self) -> bool {
        matches!(self, Dd | Od)
    }

    /// Whether `text` is a well-formed value for this position.
    pub fn is_valid_value(self, text: &str) -> bool {
        if !text.is_ascii() {
            return false;
        }
        match self {
            Major | Minor | Patch | Nano => all_digits(text),
            SemverModifier | CalverModifier | Metadata | Buildid | Buildenv => {
                !text.is_empty() && text.bytes().all(|b| b.is_ascii_alphanumeric())
            }
            Yyyy => is_full_year(text),
            YyyyOm => text.len() == 6 && is_full_year(&text[..4]) && is_padded_month(&text[4..]),
            YyOm => {
                text.len() >= 3
                    && is_short_year(&text[..text.len() - 2])
                    && is_padded_month(&text[text.len() - 2..])
            }
            Yy => is_short_year(text),
            Oy => matches!(text.len(), 2 | 3) && all_digits(text),
            Mm => in_numeric_range(text, 1, 12) && !has_leading_zero(text),
            Om => is_padded_month(text),
            Dd => in_numeric_range(text, 1, 31) && !has_leading_zero(text),
            Od => text.len() == 2 && in_numeric_range(text, 0, 31),
            Branch => {
                !text.is_empty()
                    && text
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || b"-./_:".contains(&b))
            }
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.synonyms()[0])
    }
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn has_leading_zero(text: &str) -> bool {
    text.len() > 1 && text.starts_with('0')
}

fn in_numeric_range(text: &str, min: u32, max: u32) -> bool {
    all_digits(text)
        && text.len() <= 3
        && text.parse::<u32>().map_or(false, |n| n >= min && n <= max)
}

/// Four digits, first millennium digit 1 or 2.
fn is_full_year(text: &str) -> bool {
    text.len() == 4 && all_digits(text) && matches!(text.as_bytes()[0], b'1' | b'2')
}

/// One to three digits without a leading zero, so `0`, `7`, `24` or `124`,
/// but not `07`.
fn is_short_year(text: &str) -> bool {
    all_digits(text) && text.len() <= 3 && !has_leading_zero(text)
}

/// Exactly two digits, `01`-`12`.
fn is_padded_month(text: &str) -> bool {
    text.len() == 2 && in_numeric_range(text, 1, 12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Major", Some(Major))]
    #[case("MICRO", Some(Patch))]
    #[case("build", Some(Patch))]
    #[case("Modifier?", Some(SemverModifier))]
    #[case("calvermodifier", Some(CalverModifier))]
    #[case("0M", Some(Om))]
    #[case("YYYY0M", Some(YyyyOm))]
    #[case("cienv", Some(Buildenv))]
    #[case("branch", Some(Branch))]
    #[case("sprocket", None)]
    #[case("", None)]
    fn lookup_resolves_synonyms(#[case] name: &str, #[case] expected: Option<ElementKind>) {
        assert_eq!(ElementKind::lookup(name), expected);
    }

    #[rstest]
    #[case(Major, "15", true)]
    #[case(Major, "1a", false)]
    #[case(SemverModifier, "alpha1", true)]
    #[case(SemverModifier, "alpha.1", false)]
    #[case(Yyyy, "2024", true)]
    #[case(Yyyy, "0999", false)]
    #[case(Yyyy, "24", false)]
    #[case(Yy, "24", true)]
    #[case(Yy, "0", true)]
    #[case(Yy, "07", false)]
    #[case(Oy, "07", true)]
    #[case(Oy, "7", false)]
    #[case(Mm, "12", true)]
    #[case(Mm, "13", false)]
    #[case(Mm, "06", false)]
    #[case(Om, "06", true)]
    #[case(Om, "6", false)]
    #[case(Dd, "31", true)]
    #[case(Dd, "32", false)]
    #[case(Od, "00", true)]
    #[case(Od, "32", false)]
    #[case(YyOm, "2406", true)]
    #[case(YyOm, "2413", false)]
    #[case(YyyyOm, "202406", true)]
    #[case(YyyyOm, "202400", false)]
    #[case(Branch, "feature/login-page", true)]
    #[case(Branch, "bad branch", false)]
    fn value_validation(#[case] kind: ElementKind, #[case] text: &str, #[case] valid: bool) {
        assert_eq!(kind.is_valid_value(text), valid);
    }

    #[test]
    fn separator_affinity() {
        assert!(Branch.may_contain_separators());
        assert!(SemverModifier.may_contain_separators());
        assert!(!Major.may_contain_separators());
        assert!(!Metadata.may_contain_separators());
    }
}
