//! The policy facade: actions, commit classification and base-version
//! helpers.
//!
//! This layer turns external signals (an action name from a flag, a parsed
//! conventional commit) into engine operations. It owns no versioning logic
//! of its own.

use crate::error::{SchemaError, VersionError};
use crate::version::{Version, BASE_MODIFIER};

/// An increment request against a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The schema's plainest increment (patch, else minor, else date).
    Bump,
    /// Increment patch, zeroing nano.
    BumpPatch,
    /// Increment minor, zeroing patch and nano.
    BumpMinor,
    /// Increment major, zeroing everything finer.
    BumpMajor,
    /// Refresh the calendar fields to the current date.
    BumpDate,
}

impl Action {
    const ALL: &'static [Action] = &[
        Action::Bump,
        Action::BumpPatch,
        Action::BumpMinor,
        Action::BumpMajor,
        Action::BumpDate,
    ];

    /// The lowercase wire name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Action::Bump => "bump",
            Action::BumpPatch => "bumppatch",
            Action::BumpMinor => "bumpminor",
            Action::BumpMajor => "bumpmajor",
            Action::BumpDate => "bumpdate",
        }
    }

    /// Case-insensitive lookup by wire name.
    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }
}

/// Applies an action to a version in place.
pub fn apply_action(v: &mut Version, action: Action) {
    match action {
        Action::Bump => v.simple_bump(),
        Action::BumpPatch => v.bump_patch(None),
        Action::BumpMinor => v.bump_minor(None),
        Action::BumpMajor => v.bump_major(None),
        Action::BumpDate => v.set_current_date(),
    }
}

/// The conventional-commit types this engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    Fix,
    Feat,
    Perf,
    Revert,
    Refactor,
    Build,
    Test,
    Docs,
    Chore,
    Ci,
    Style,
}

impl CommitKind {
    /// The type prefix as written in a commit header.
    pub fn prefix(self) -> &'static str {
        match self {
            CommitKind::Fix => "fix",
            CommitKind::Feat => "feat",
            CommitKind::Perf => "perf",
            CommitKind::Revert => "revert",
            CommitKind::Refactor => "refactor",
            CommitKind::Build => "build",
            CommitKind::Test => "test",
            CommitKind::Docs => "docs",
            CommitKind::Chore => "chore",
            CommitKind::Ci => "ci",
            CommitKind::Style => "style",
        }
    }

    /// Case-insensitive lookup by header prefix.
    pub fn from_prefix(prefix: &str) -> Option<CommitKind> {
        const ALL: &[CommitKind] = &[
            CommitKind::Fix,
            CommitKind::Feat,
            CommitKind::Perf,
            CommitKind::Revert,
            CommitKind::Refactor,
            CommitKind::Build,
            CommitKind::Test,
            CommitKind::Docs,
            CommitKind::Chore,
            CommitKind::Ci,
            CommitKind::Style,
        ];
        ALL.iter()
            .copied()
            .find(|k| k.prefix().eq_ignore_ascii_case(prefix))
    }
}

/// What the engine needs to know about a parsed commit. Commit message
/// parsing itself lives with the caller.
pub trait CommitInfo {
    fn is_breaking_change(&self) -> bool;
    fn kind(&self) -> CommitKind;
}

/// Maps a commit to the action it warrants: breaking changes bump major,
/// features bump minor, fixes bump patch, anything else changes nothing.
pub fn action_for_commit(commit: &impl CommitInfo) -> Option<Action> {
    if commit.is_breaking_change() {
        Some(Action::BumpMajor)
    } else {
        match commit.kind() {
            CommitKind::Feat => Some(Action::BumpMinor),
            CommitKind::Fix => Some(Action::BumpPatch),
            _ => None,
        }
    }
}

/// Renders the baseline version of a schema with an optional modifier and
/// metadata applied.
pub fn base_version(
    schema: &str,
    modifier: Option<&str>,
    metadata: Option<&str>,
) -> Result<String, SchemaError> {
    let mut v = Version::new(schema)?;
    if let Some(modifier) = modifier.filter(|m| !m.is_empty()) {
        v.set_modifier(Some(modifier.to_string()));
    }
    if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
        v.set_metadata(Some(metadata.to_string()));
    }
    v.render()
}

/// A fresh Ubuntu-style `YY.0M.Micro` version for today.
pub fn ubuntu_calver() -> Result<String, SchemaError> {
    base_version("calver_ubuntu", None, None)
}

/// A fresh `YYYY.0M.Calvermodifier.Micro+Metadata` version; an absent
/// modifier defaults to `"Snapshot"`.
pub fn modifier_calver(
    modifier: Option<&str>,
    metadata: Option<&str>,
) -> Result<String, SchemaError> {
    base_version(
        "calver_modifier",
        modifier.filter(|m| !m.is_empty()).or(Some(BASE_MODIFIER)),
        metadata,
    )
}

/// Like [`modifier_calver`] with an extra minor position.
pub fn modifier_minor_calver(
    modifier: Option<&str>,
    metadata: Option<&str>,
) -> Result<String, SchemaError> {
    base_version(
        "calver_modifier_minor",
        modifier.filter(|m| !m.is_empty()).or(Some(BASE_MODIFIER)),
        metadata,
    )
}

/// Sets a version's calendar fields from a `YYYY-MM-DD` string.
pub fn set_date_from_str(v: &mut Version, date: &str) -> Result<(), VersionError> {
    let parsed = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        VersionError::UnparseableDate {
            date: date.to_string(),
        }
    })?;
    v.set_date(parsed);
    Ok(())
}

/// Copies the major, minor and patch of a `Major.Minor.Patch` string onto a
/// version.
pub fn set_semver_elements(v: &mut Version, semver: &str) -> Result<(), VersionError> {
    let source = Version::parse(semver, "semver").map_err(|_| VersionError::NotSemver {
        semver: semver.to_string(),
    })?;
    if v.major.is_some() {
        v.major = source.major;
    }
    if v.minor.is_some() {
        v.minor = source.minor;
    }
    if v.patch.is_some() {
        v.patch = source.patch;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use rstest::rstest;

    struct FakeCommit {
        breaking: bool,
        kind: CommitKind,
    }

    impl CommitInfo for FakeCommit {
        fn is_breaking_change(&self) -> bool {
            self.breaking
        }

        fn kind(&self) -> CommitKind {
            self.kind
        }
    }

    #[rstest]
    #[case("bump", Some(Action::Bump))]
    #[case("BumpMinor", Some(Action::BumpMinor))]
    #[case("BUMPPATCH", Some(Action::BumpPatch))]
    #[case("bumpdate", Some(Action::BumpDate))]
    #[case("explode", None)]
    fn action_lookup(#[case] name: &str, #[case] expected: Option<Action>) {
        assert_eq!(Action::from_name(name), expected);
    }

    #[rstest]
    #[case(false, CommitKind::Feat, Some(Action::BumpMinor))]
    #[case(false, CommitKind::Fix, Some(Action::BumpPatch))]
    #[case(true, CommitKind::Chore, Some(Action::BumpMajor))]
    #[case(false, CommitKind::Docs, None)]
    #[case(false, CommitKind::Perf, None)]
    fn commit_classification(
        #[case] breaking: bool,
        #[case] kind: CommitKind,
        #[case] expected: Option<Action>,
    ) {
        let commit = FakeCommit { breaking, kind };
        assert_eq!(action_for_commit(&commit), expected);
    }

    #[test]
    fn apply_action_dispatches() {
        let mut v = Version::parse("1.2.3", "semver").unwrap();
        apply_action(&mut v, Action::BumpMinor);
        assert_eq!(v.render().unwrap(), "1.3.0");
        apply_action(&mut v, Action::Bump);
        assert_eq!(v.render().unwrap(), "1.3.1");
    }

    #[test]
    fn base_version_with_modifier_and_metadata() {
        let version = base_version("semver", Some("rc1"), Some("b42")).unwrap();
        assert_eq!(version, "0.0.0-rc1+b42");
    }

    #[test]
    fn modifier_calver_defaults_to_snapshot() {
        let now = Utc::now().date_naive();
        assert_eq!(
            modifier_calver(None, None).unwrap(),
            format!("{}.{:02}.Snapshot.0", now.year(), now.month())
        );
    }

    #[test]
    fn ubuntu_calver_is_short_year_month_micro() {
        let now = Utc::now().date_naive();
        assert_eq!(
            ubuntu_calver().unwrap(),
            format!("{}.{:02}.0", now.year() % 100, now.month())
        );
    }

    #[test]
    fn date_from_string() {
        let mut v = Version::parse("2024.01.3", "YYYY.0M.Micro").unwrap();
        set_date_from_str(&mut v, "2025-07-09").unwrap();
        assert_eq!(v.render().unwrap(), "2025.07.3");
        assert!(set_date_from_str(&mut v, "not-a-date").is_err());
    }

    #[test]
    fn semver_elements_transfer() {
        let mut v = Version::parse("2024.01.3", "YYYY.0M.Micro").unwrap();
        set_semver_elements(&mut v, "9.8.7").unwrap();
        assert_eq!(v.render().unwrap(), "2024.01.7");
        assert!(set_semver_elements(&mut v, "9.8").is_err());
    }
}
