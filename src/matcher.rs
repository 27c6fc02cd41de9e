//! The three matching predicates: version against schema, pin against
//! schema, and version against schema-plus-pin.
//!
//! A *pin* is a half-frozen version: at each position it carries either a
//! literal value (that exact text is required) or the name of the position's
//! own element kind (a free slot that any valid value satisfies).

use crate::element::ElementKind;
use crate::schema::Schema;
use crate::segment::segment;

impl Schema {
    /// Whether `version` segments against this schema with a well-formed
    /// value at every position.
    pub fn matches_version(&self, version: &str) -> bool {
        match segment(version, self) {
            Some(parsed) => parsed
                .components
                .iter()
                .all(|(element, text)| element.kind.is_valid_value(text)),
            None => false,
        }
    }

    /// Whether `pin` fits this schema. A position passes either with a
    /// well-formed value or with the name of its own element kind.
    pub fn matches_pin(&self, pin: &str) -> bool {
        match segment(pin, self) {
            Some(parsed) => parsed.components.iter().all(|(element, text)| {
                element.kind.is_valid_value(text)
                    || ElementKind::lookup(text) == Some(element.kind)
            }),
            None => false,
        }
    }

    /// Whether `version` fits this schema *and* honors `pin`: every literal
    /// pin position must be reproduced in the version exactly.
    pub fn version_matches_pin(&self, pin: &str, version: &str) -> bool {
        if !self.matches_version(version) || !self.matches_pin(pin) {
            return false;
        }
        let (Some(pinned), Some(parsed)) = (segment(pin, self), segment(version, self)) else {
            return false;
        };
        if pinned.components.len() != parsed.components.len() {
            return false;
        }
        pinned
            .components
            .iter()
            .zip(parsed.components.iter())
            .all(|((element, pin_text), (_, version_text))| {
                ElementKind::lookup(pin_text) == Some(element.kind) || pin_text == version_text
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("semver", "1.0.0", true)]
    #[case("semver", "1.3.6-alpha.1+1234.234.5", true)]
    #[case("semver", "1.3.6.7", false)]
    #[case("semver", "1.x.6", false)]
    #[case("Major.Minor.Patch", "5.7_3", false)]
    #[case("YYYY.0M.Micro", "2024.06.4", true)]
    #[case("YYYY.0M.Micro", "2024.6.4", false)]
    #[case("YY.0M.Micro", "23.06.0", true)]
    #[case("Branch.Micro", "dependabot/npm_and_yarn/vue/cli-plugin-babel-4.5.13.0", true)]
    #[case("Branch?-Major.Minor", "1.2", true)]
    #[case("Branch?-Major.Minor", "feature-x-1.2", true)]
    #[case("Year.Month", "2019.5", true)]
    #[case("Year.Month", "2019.13", false)]
    fn version_matching(#[case] schema: &str, #[case] version: &str, #[case] matches: bool) {
        let schema = Schema::parse(schema).unwrap();
        assert_eq!(schema.matches_version(version), matches);
    }

    #[rstest]
    #[case("semver", "1.2.patch", true)]
    #[case("semver", "3.minor.patch", true)]
    #[case("semver", "1.2.3", true)]
    #[case("semver", "major.minor.patch", true)]
    #[case("semver", "1.2.branch", false)]
    #[case("YY.0M.Micro-Branch", "23.06.micro-Branch", true)]
    #[case("YYYY.0M.Micro", "2024.0M.Micro", true)]
    #[case("YYYY.0M.Micro", "24.0M.Micro", false)]
    fn pin_matching(#[case] schema: &str, #[case] pin: &str, #[case] matches: bool) {
        let schema = Schema::parse(schema).unwrap();
        assert_eq!(schema.matches_pin(pin), matches);
    }

    #[rstest]
    #[case("semver", "1.2.patch", "1.2.7", true)]
    #[case("semver", "1.2.patch", "1.3.7", false)]
    #[case("semver", "1.2.3", "1.2.3", true)]
    #[case("semver", "major.minor.patch", "9.9.9", true)]
    #[case("YY.0M.Micro-Branch", "23.06.micro-Branch", "23.06.0-newbr", true)]
    #[case("YY.0M.Micro-Branch", "23.06.micro-Branch", "23.07.0-newbr", false)]
    fn version_against_pin(
        #[case] schema: &str,
        #[case] pin: &str,
        #[case] version: &str,
        #[case] matches: bool,
    ) {
        let schema = Schema::parse(schema).unwrap();
        assert_eq!(schema.version_matches_pin(pin, version), matches);
    }
}
