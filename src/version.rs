//! The version value: a bag of typed fields owned by a schema, with a
//! renderer and a descending comparison.
//!
//! A [`Version`] never stores its rendered text. It stores the fields its
//! schema can read (numbers, calendar parts, free-form strings) and renders
//! on demand, so the same value can also be rendered under a compatible
//! override schema.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate, Utc};

use crate::element::ElementKind;
use crate::error::{SchemaError, VersionError};
use crate::schema::{Schema, SchemaElement};
use crate::segment::{segment, ParsedVersion, SNAPSHOT_SUFFIX};

/// The modifier installed when a schema demands one and nothing supplied it.
pub const BASE_MODIFIER: &str = "Snapshot";

/// A version under a schema. Fields are populated only when the owning
/// schema contains an element that reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub(crate) schema: String,
    pub(crate) major: Option<u32>,
    pub(crate) minor: Option<u32>,
    pub(crate) patch: Option<u32>,
    pub(crate) nano: Option<u32>,
    pub(crate) year: Option<u32>,
    pub(crate) month: Option<u32>,
    pub(crate) day: Option<u32>,
    pub(crate) modifier: Option<String>,
    pub(crate) metadata: Option<String>,
    pub(crate) branch: Option<String>,
    pub(crate) buildid: Option<String>,
    pub(crate) buildenv: Option<String>,
    pub(crate) snapshot: bool,
}

impl Version {
    pub(crate) fn empty(schema: &Schema) -> Version {
        Version {
            schema: schema.text().to_string(),
            major: None,
            minor: None,
            patch: None,
            nano: None,
            year: None,
            month: None,
            day: None,
            modifier: None,
            metadata: None,
            branch: None,
            buildid: None,
            buildenv: None,
            snapshot: false,
        }
    }

    /// Builds the baseline version for a schema: numeric fields start at 0,
    /// except that a lowest-granularity Major or Minor starts at 1 (so
    /// `Major.Minor` begins life as `0.1`). Calendar fields are today, UTC.
    /// A calver modifier position starts as `"Snapshot"`.
    pub fn new(schema_text: &str) -> Result<Version, SchemaError> {
        let schema = Schema::parse(schema_text)?;
        let mut v = Version::empty(&schema);
        for element in schema.elements() {
            if element.kind.is_numeric() {
                v.set_numeric(element.kind, 0);
            }
        }
        if v.patch.is_none() && v.nano.is_none() {
            if v.minor.is_some() {
                v.minor = Some(1);
            } else if v.major.is_some() {
                v.major = Some(1);
            }
        }
        if schema.contains(ElementKind::CalverModifier) {
            v.modifier = Some(BASE_MODIFIER.to_string());
        }
        v.set_current_date();
        Ok(v)
    }

    /// Parses a version string under a schema. The string must match the
    /// schema; this is validated before any field is read.
    pub fn parse(version: &str, schema_text: &str) -> Result<Version, VersionError> {
        let schema = Schema::parse(schema_text)?;
        if !schema.matches_version(version) {
            return Err(VersionError::VersionSchemaMismatch {
                version: version.to_string(),
                schema: schema.text().to_string(),
            });
        }
        let mut v = Version::empty(&schema);
        if let Some(parsed) = segment(version, &schema) {
            v.apply_parsed(&parsed);
        }
        Ok(v)
    }

    pub(crate) fn apply_parsed(&mut self, parsed: &ParsedVersion) {
        for (element, text) in &parsed.components {
            self.apply_component(element.kind, text);
        }
        if parsed.modifier.is_some() {
            self.modifier = parsed.modifier.clone();
        }
        if parsed.metadata.is_some() {
            self.metadata = parsed.metadata.clone();
        }
        self.snapshot = parsed.snapshot;
    }

    pub(crate) fn apply_component(&mut self, kind: ElementKind, text: &str) {
        use ElementKind::*;
        match kind {
            Major => self.major = text.parse().ok(),
            Minor => self.minor = text.parse().ok(),
            Patch => self.patch = text.parse().ok(),
            Nano => self.nano = text.parse().ok(),
            Yyyy | Yy | Oy => self.year = text.parse().ok(),
            Mm | Om => self.month = text.parse().ok(),
            Dd | Od => self.day = text.parse().ok(),
            YyOm => {
                let split = text.len().saturating_sub(2);
                self.year = text[..split].parse().ok();
                self.month = text[split..].parse().ok();
            }
            YyyyOm if text.len() >= 4 => {
                self.year = text[..4].parse().ok();
                self.month = text[4..].parse().ok();
            }
            YyyyOm => {}
            SemverModifier | CalverModifier => self.modifier = Some(text.to_string()),
            Metadata => self.metadata = Some(text.to_string()),
            Branch => self.branch = Some(text.to_string()),
            Buildid => self.buildid = Some(text.to_string()),
            Buildenv => self.buildenv = Some(text.to_string()),
        }
    }

    pub(crate) fn set_numeric(&mut self, kind: ElementKind, value: u32) {
        match kind {
            ElementKind::Major => self.major = Some(value),
            ElementKind::Minor => self.minor = Some(value),
            ElementKind::Patch => self.patch = Some(value),
            ElementKind::Nano => self.nano = Some(value),
            _ => {}
        }
    }

    /// Renders under the owning schema.
    pub fn render(&self) -> Result<String, SchemaError> {
        self.render_with(None, None)
    }

    /// Renders under an override schema and/or an override snapshot flag.
    /// A position whose field is unpopulated (other than the optional
    /// modifier/metadata) makes the schema unsupported for this version.
    pub fn render_with(
        &self,
        schema_text: Option<&str>,
        snapshot: Option<bool>,
    ) -> Result<String, SchemaError> {
        let schema = Schema::parse(schema_text.unwrap_or(&self.schema))?;
        let mut out = String::new();
        for (i, element) in schema.elements().iter().enumerate() {
            match element.kind {
                ElementKind::SemverModifier => {
                    append_optional(&mut out, element, self.modifier.as_deref())
                }
                ElementKind::Metadata => {
                    append_optional(&mut out, element, self.metadata.as_deref())
                }
                kind => {
                    let value =
                        self.format_element(kind)
                            .ok_or_else(|| SchemaError::UnsupportedSchema {
                                schema: schema.text().to_string(),
                                element: kind.to_string(),
                            })?;
                    if i > 0 {
                        if let Some(sep) = element.separator {
                            out.push(sep);
                        }
                    }
                    out.push_str(&value);
                }
            }
        }
        if snapshot.unwrap_or(self.snapshot) {
            out.push_str(SNAPSHOT_SUFFIX);
        }
        Ok(out)
    }

    fn format_element(&self, kind: ElementKind) -> Option<String> {
        use ElementKind::*;
        match kind {
            Major => self.major.map(|n| n.to_string()),
            Minor => self.minor.map(|n| n.to_string()),
            Patch => self.patch.map(|n| n.to_string()),
            Nano => self.nano.map(|n| n.to_string()),
            Yyyy => self.year.map(format_full_year),
            Yy => self.year.map(|y| (y % 100).to_string()),
            Oy => self.year.map(|y| format!("{:02}", y % 100)),
            Mm => self.month.map(|m| m.to_string()),
            Om => self.month.map(|m| format!("{m:02}")),
            Dd => self.day.map(|d| d.to_string()),
            Od => self.day.map(|d| format!("{d:02}")),
            YyOm => match (self.year, self.month) {
                (Some(y), Some(m)) => Some(format!("{}{m:02}", y % 100)),
                _ => None,
            },
            YyyyOm => match (self.year, self.month) {
                (Some(y), Some(m)) => Some(format!("{}{m:02}", format_full_year(y))),
                _ => None,
            },
            CalverModifier => self.modifier.clone().filter(|m| !m.is_empty()),
            Branch => self.branch.clone(),
            Buildid => self.buildid.clone(),
            Buildenv => self.buildenv.clone(),
            SemverModifier | Metadata => None,
        }
    }

    /// Sets the calendar fields the schema reads to today's UTC date.
    pub fn set_current_date(&mut self) {
        self.set_date(Utc::now().date_naive());
    }

    /// Sets the calendar fields the schema reads from an explicit date.
    pub fn set_date(&mut self, date: NaiveDate) {
        let Ok(schema) = Schema::parse(&self.schema) else {
            return;
        };
        if schema.has_year() {
            self.year = Some(date.year().max(0) as u32);
        }
        if schema.has_month() {
            self.month = Some(date.month());
        }
        if schema.has_day() {
            self.day = Some(date.day());
        }
    }

    /// Increments major, zeroing every finer semantic field.
    pub fn bump_major(&mut self, step: Option<u32>) {
        if let Some(major) = self.major {
            self.major = Some(major.saturating_add(step.unwrap_or(1)));
        }
        self.minor = self.minor.map(|_| 0);
        self.patch = self.patch.map(|_| 0);
        self.nano = self.nano.map(|_| 0);
    }

    /// Increments minor, zeroing patch and nano.
    pub fn bump_minor(&mut self, step: Option<u32>) {
        if let Some(minor) = self.minor {
            self.minor = Some(minor.saturating_add(step.unwrap_or(1)));
        }
        self.patch = self.patch.map(|_| 0);
        self.nano = self.nano.map(|_| 0);
    }

    /// Increments patch, zeroing nano.
    pub fn bump_patch(&mut self, step: Option<u32>) {
        if let Some(patch) = self.patch {
            self.patch = Some(patch.saturating_add(step.unwrap_or(1)));
        }
        self.nano = self.nano.map(|_| 0);
    }

    /// Increments nano.
    pub fn bump_nano(&mut self, step: Option<u32>) {
        if let Some(nano) = self.nano {
            self.nano = Some(nano.saturating_add(step.unwrap_or(1)));
        }
    }

    /// The plainest possible bump: patch if the schema has one, else minor,
    /// else (for a calver schema) a date refresh.
    pub fn simple_bump(&mut self) {
        if self.patch.is_some() {
            self.bump_patch(None);
        } else if self.minor.is_some() {
            self.bump_minor(None);
        } else if Schema::parse(&self.schema).map_or(false, |s| s.is_calver()) {
            self.set_current_date();
        }
    }

    /// The schema this version renders under.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn major(&self) -> Option<u32> {
        self.major
    }

    pub fn minor(&self) -> Option<u32> {
        self.minor
    }

    pub fn patch(&self) -> Option<u32> {
        self.patch
    }

    pub fn nano(&self) -> Option<u32> {
        self.nano
    }

    pub fn year(&self) -> Option<u32> {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn modifier(&self) -> Option<&str> {
        self.modifier.as_deref()
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn buildid(&self) -> Option<&str> {
        self.buildid.as_deref()
    }

    pub fn buildenv(&self) -> Option<&str> {
        self.buildenv.as_deref()
    }

    pub fn is_snapshot(&self) -> bool {
        self.snapshot
    }

    pub fn set_modifier(&mut self, modifier: Option<String>) {
        self.modifier = modifier;
    }

    pub fn set_metadata(&mut self, metadata: Option<String>) {
        self.metadata = metadata;
    }

    pub fn set_branch(&mut self, branch: Option<String>) {
        self.branch = branch;
    }

    pub fn set_buildid(&mut self, buildid: Option<String>) {
        self.buildid = buildid;
    }

    pub fn set_buildenv(&mut self, buildenv: Option<String>) {
        self.buildenv = buildenv;
    }

    pub fn set_snapshot(&mut self, snapshot: bool) {
        self.snapshot = snapshot;
    }
}

/// Optional-at-render elements: skipped (separator and all) when empty,
/// separator-deduplicated when present.
fn append_optional(out: &mut String, element: &SchemaElement, value: Option<&str>) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return;
    };
    if !out.is_empty() && !out.ends_with(['-', '+', '.', '_']) {
        if let Some(sep) = element.separator {
            out.push(sep);
        }
    }
    out.push_str(value);
}

/// Years that lost their century render with a 20xx base, so `24` becomes
/// `2024` and `206` becomes `2206`.
fn format_full_year(year: u32) -> String {
    if (10..1000).contains(&year) {
        (2000 + year).to_string()
    } else {
        year.to_string()
    }
}

/// `Some` outranks `None`; two values compare numerically.
fn cmp_fields(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Year comparison tolerant of mixed widths: a two-digit year against a full
/// year compares modulo 100.
fn cmp_years(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if (a < 100) != (b < 100) => (a % 100).cmp(&(b % 100)),
        _ => cmp_fields(a, b),
    }
}

fn cmp_buildids(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (
        a.and_then(|s| s.parse::<u64>().ok()),
        b.and_then(|s| s.parse::<u64>().ok()),
    ) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

impl Version {
    /// Compares two versions, *descending*: the newest (largest) version
    /// ranks first, so sorting with this comparison puts the latest release
    /// at index 0.
    ///
    /// Two versions of equal rank compare `Equal` even when their remaining
    /// fields (or schemas) differ, which is why this is a named method and
    /// not an `Ord` impl.
    pub fn compare(&self, other: &Self) -> Ordering {
        cmp_years(self.year, other.year)
            .then_with(|| cmp_fields(self.month, other.month))
            .then_with(|| cmp_fields(self.major, other.major))
            .then_with(|| cmp_fields(self.day, other.day))
            .then_with(|| cmp_fields(self.minor, other.minor))
            .then_with(|| cmp_fields(self.patch, other.patch))
            .then_with(|| cmp_fields(self.nano, other.nano))
            .then_with(|| cmp_buildids(self.buildid.as_deref(), other.buildid.as_deref()))
            .reverse()
    }
}

/// Orders version *strings* under a schema, newest first, with strings that
/// do not match the schema sorting after all that do.
#[derive(Debug, Clone)]
pub struct VersionStringComparator {
    schema: Schema,
}

impl VersionStringComparator {
    pub fn new(schema_text: &str) -> Result<VersionStringComparator, SchemaError> {
        Ok(VersionStringComparator {
            schema: Schema::parse(schema_text)?,
        })
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let parse = |text: &str| {
            if self.schema.matches_version(text) {
                Version::parse(text, self.schema.text()).ok()
            } else {
                None
            }
        };
        match (parse(a), parse(b)) {
            (Some(va), Some(vb)) => va.compare(&vb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn baseline_semver_is_all_zero() {
        let v = Version::new("semver").unwrap();
        assert_eq!(v.render().unwrap(), "0.0.0");
        assert_eq!(v.modifier(), None);
    }

    #[test]
    fn baseline_major_minor_starts_at_zero_one() {
        let v = Version::new("Major.Minor").unwrap();
        assert_eq!(v.render().unwrap(), "0.1");
    }

    #[test]
    fn baseline_four_part() {
        let v = Version::new("four_part").unwrap();
        assert_eq!(v.render().unwrap(), "0.0.0.0");
    }

    #[test]
    fn baseline_calver_modifier_is_snapshot() {
        let v = Version::new("YYYY.0M.Calvermodifier.Micro").unwrap();
        let now = Utc::now().date_naive();
        assert_eq!(
            v.render().unwrap(),
            format!("{}.{:02}.Snapshot.0", now.year(), now.month())
        );
    }

    #[test]
    fn parse_populates_fields() {
        let v = Version::parse("1.3.6-alpha1+b77", "semver").unwrap();
        assert_eq!(v.major(), Some(1));
        assert_eq!(v.minor(), Some(3));
        assert_eq!(v.patch(), Some(6));
        assert_eq!(v.modifier(), Some("alpha1"));
        assert_eq!(v.metadata(), Some("b77"));
        assert_eq!(v.render().unwrap(), "1.3.6-alpha1+b77");
    }

    #[test]
    fn parse_rejects_mismatch() {
        let err = Version::parse("1.2", "semver").unwrap_err();
        assert!(matches!(err, VersionError::VersionSchemaMismatch { .. }));
    }

    #[test]
    fn optional_modifier_and_metadata_drop_their_separators() {
        let mut v = Version::parse("4.5.6", "Major.Minor.Patch-Modifier?+Metadata?").unwrap();
        assert_eq!(v.render().unwrap(), "4.5.6");
        v.set_modifier(Some("rc1".to_string()));
        assert_eq!(v.render().unwrap(), "4.5.6-rc1");
        v.set_metadata(Some("b9".to_string()));
        assert_eq!(v.render().unwrap(), "4.5.6-rc1+b9");
    }

    #[rstest]
    #[case("YYYY.0M.Micro", "2019.05.7", "2019.05.7")]
    #[case("YY.0M.Micro", "23.06.0", "23.06.0")]
    #[case("YYYY0M.DD.Micro", "202101.1.0", "202101.1.0")]
    #[case("YY0M.Micro", "2101.4", "2101.4")]
    #[case("0Y.0M.0D.Micro-Modifier", "22.03.28.2-dev", "22.03.28.2-dev")]
    fn calendar_round_trips(#[case] schema: &str, #[case] version: &str, #[case] expected: &str) {
        let v = Version::parse(version, schema).unwrap();
        assert_eq!(v.render().unwrap(), expected);
    }

    #[test]
    fn short_year_expands_under_full_year_schema() {
        let v = Version::parse("23.1", "YY.Micro").unwrap();
        assert_eq!(v.render_with(Some("YYYY.Micro"), None).unwrap(), "2023.1");
    }

    #[test]
    fn snapshot_renders_and_round_trips() {
        let v = Version::parse("1.2.3-SNAPSHOT", "Major.Minor.Patch").unwrap();
        assert!(v.is_snapshot());
        assert_eq!(v.render().unwrap(), "1.2.3-SNAPSHOT");
        assert_eq!(v.render_with(None, Some(false)).unwrap(), "1.2.3");
    }

    #[test]
    fn unpopulated_position_is_unsupported_schema() {
        let v = Version::parse("1.2.3", "Major.Minor.Patch").unwrap();
        let err = v.render_with(Some("YYYY.Minor.Patch"), None).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedSchema { .. }));
    }

    #[test]
    fn bumps_cascade() {
        let mut v = Version::parse("1.2.3.4", "Major.Minor.Patch.Nano").unwrap();
        v.bump_patch(None);
        assert_eq!(v.render().unwrap(), "1.2.4.0");
        v.bump_minor(None);
        assert_eq!(v.render().unwrap(), "1.3.0.0");
        v.bump_major(None);
        assert_eq!(v.render().unwrap(), "2.0.0.0");
        v.bump_nano(None);
        assert_eq!(v.render().unwrap(), "2.0.0.1");
    }

    #[test]
    fn bumps_saturate_at_the_numeric_ceiling() {
        let mut v = Version::parse("4294967295.0.0", "Major.Minor.Patch").unwrap();
        v.bump_major(None);
        assert_eq!(v.major(), Some(u32::MAX));
        let mut v = Version::parse("0.0.4294967295", "Major.Minor.Patch").unwrap();
        v.bump_patch(None);
        assert_eq!(v.patch(), Some(u32::MAX));
    }

    #[test]
    fn simple_bump_prefers_patch() {
        let mut v = Version::parse("1.2.3", "semver").unwrap();
        v.simple_bump();
        assert_eq!(v.render().unwrap(), "1.2.4");
    }

    #[test]
    fn newer_semver_ranks_first() {
        let older = Version::parse("1.2.3", "semver").unwrap();
        let newer = Version::parse("1.3.0", "semver").unwrap();
        assert_eq!(older.compare(&newer), Ordering::Greater);
        assert_eq!(newer.compare(&older), Ordering::Less);
    }

    #[test]
    fn newer_calver_ranks_first() {
        let older = Version::parse("2023.06.1", "YYYY.0M.Micro").unwrap();
        let newer = Version::parse("2024.01.0", "YYYY.0M.Micro").unwrap();
        assert_eq!(newer.compare(&older), Ordering::Less);
    }

    #[test]
    fn string_comparator_sorts_newest_first_and_mismatches_last() {
        let cmp = VersionStringComparator::new("Major.Minor.Patch").unwrap();
        let mut versions = vec!["2.3.7", "not-a-version", "2.3.25", "1.0.0"];
        versions.sort_by(|a, b| cmp.compare(a, b));
        assert_eq!(versions, vec!["2.3.25", "2.3.7", "1.0.0", "not-a-version"]);
    }
}
