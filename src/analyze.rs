//! Version intelligence: strict SemVer shape checks and difference
//! inspection between two versions of the same schema.

use crate::element::ElementKind;
use crate::schema::Schema;
use crate::segment::segment;

/// Whether `version` is a well-formed SemVer 2.0 version string: a numeric
/// `Major.Minor.Patch` core without leading zeros, an optional dot-separated
/// prerelease and an optional dot-separated build, each using only
/// alphanumerics and hyphens.
pub fn is_version_semver(version: &str) -> bool {
    let (rest, build) = match version.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (version, None),
    };
    let (core, prerelease) = match rest.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (rest, None),
    };

    let mut parts = core.split('.');
    let core_ok = parts.clone().count() == 3 && parts.all(is_numeric_identifier);
    if !core_ok {
        return false;
    }
    if let Some(pre) = prerelease {
        if !pre.split('.').all(is_prerelease_identifier) {
            return false;
        }
    }
    if let Some(build) = build {
        if !build.split('.').all(is_build_identifier) {
            return false;
        }
    }
    true
}

/// A numeric identifier: digits only, no leading zero (but `0` itself).
fn is_numeric_identifier(text: &str) -> bool {
    !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text.len() == 1 || !text.starts_with('0'))
}

fn is_prerelease_identifier(text: &str) -> bool {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return false;
    }
    // purely numeric prerelease identifiers must not have leading zeros
    if text.bytes().all(|b| b.is_ascii_digit()) {
        is_numeric_identifier(text)
    } else {
        true
    }
}

fn is_build_identifier(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// The most significant schema position where two versions differ, in
/// schema order. `None` when they are identical or either side does not
/// match the schema.
pub fn largest_difference(old: &str, new: &str, schema: &Schema) -> Option<ElementKind> {
    if !schema.matches_version(old) || !schema.matches_version(new) {
        return None;
    }
    let old = segment(old, schema)?;
    let new = segment(new, schema)?;
    if old.components.len() != new.components.len() {
        return None;
    }
    old.components
        .iter()
        .zip(new.components.iter())
        .find(|((_, a), (_, b))| a != b)
        .map(|((element, _), _)| element.kind)
}

/// Like [`largest_difference`] but considering only the semantic triplet,
/// checked in Major, Minor, Patch order.
pub fn largest_semver_difference(old: &str, new: &str, schema: &Schema) -> Option<ElementKind> {
    if !schema.matches_version(old) || !schema.matches_version(new) {
        return None;
    }
    let old = segment(old, schema)?;
    let new = segment(new, schema)?;
    for kind in [ElementKind::Major, ElementKind::Minor, ElementKind::Patch] {
        if let (Some(a), Some(b)) = (old.component(kind), new.component(kind)) {
            if a != b {
                return Some(kind);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.3", true)]
    #[case("0M.1.2.3", false)]
    #[case("1.1.2+meta-valid", true)]
    #[case("1.1.2+meta-valid%", false)]
    #[case("1.0.0-alpha-a.b-c-somethinglong+build.1-aef.1-its-okay", true)]
    #[case("1.0.0-rc.1+build.1%", false)]
    #[case("01.2.3", false)]
    #[case("1.0.0-alpha.01", false)]
    #[case("1.2", false)]
    fn semver_shape(#[case] version: &str, #[case] semver: bool) {
        assert_eq!(is_version_semver(version), semver);
    }

    #[rstest]
    #[case("0.0.4", "0.3.4", "Semver", Some(Minor))]
    #[case("2019.0.4", "2021.3.4", "YYYY.Major.Minor", Some(Yyyy))]
    #[case("3.4.7", "3.4.7", "Semver", None)]
    #[case("0.0.4", "0.3.4", "MM.Major", None)]
    fn difference(
        #[case] old: &str,
        #[case] new: &str,
        #[case] schema: &str,
        #[case] expected: Option<ElementKind>,
    ) {
        let schema = Schema::parse(schema).unwrap();
        assert_eq!(largest_difference(old, new, &schema), expected);
    }

    #[rstest]
    #[case("2019.0.4", "2021.3.4", "YYYY.Major.Minor", Some(Major))]
    #[case("2019.3.4.3", "2021.3.4.5", "YYYY.Major.Minor.Patch", Some(Patch))]
    #[case("3.4.7", "3.4.7", "Semver", None)]
    #[case("3.4.5", "6.7.8", "Semver", Some(Major))]
    fn semver_difference(
        #[case] old: &str,
        #[case] new: &str,
        #[case] schema: &str,
        #[case] expected: Option<ElementKind>,
    ) {
        let schema = Schema::parse(schema).unwrap();
        assert_eq!(largest_semver_difference(old, new, &schema), expected);
    }
}
