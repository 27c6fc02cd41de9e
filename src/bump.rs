//! Pin-aware next-version resolution.
//!
//! A bump starts from a schema, a pin, an optional previous version, an
//! optional action and an optional namespace. The pin decides which
//! positions are frozen (literal values) and which float (free slots named
//! after their own element). Everything frozen is *protected*: no action may
//! move it, and the bump cascades downward until it finds something
//! unprotected to advance.

use std::collections::HashSet;

use chrono::{Datelike, Utc};

use crate::api::Action;
use crate::element::ElementKind;
use crate::error::VersionError;
use crate::schema::{resolve_alias, Schema};
use crate::segment::segment;
use crate::version::{Version, BASE_MODIFIER};

impl Version {
    /// Resolves the next version from a pin and an optional previous
    /// version.
    ///
    /// Validation happens before any state is built: the pin must match the
    /// schema, and the old version (when given) must match both. With a
    /// previous version and no action, the action defaults to
    /// [`Action::Bump`].
    pub fn next(
        schema_text: &str,
        pin_text: &str,
        old_version: Option<&str>,
        action: Option<Action>,
        namespace: Option<&str>,
    ) -> Result<Version, VersionError> {
        let schema = Schema::parse(schema_text)?;
        let pin = resolve_alias(pin_text);
        if !schema.matches_pin(pin) {
            return Err(VersionError::PinSchemaMismatch {
                pin: pin_text.to_string(),
                schema: schema.text().to_string(),
            });
        }
        if let Some(old) = old_version {
            if !schema.version_matches_pin(pin, old) {
                return Err(VersionError::VersionPinMismatch {
                    version: old.to_string(),
                    schema: schema.text().to_string(),
                    pin: pin_text.to_string(),
                });
            }
        }
        let old_v = old_version
            .map(|old| Version::parse(old, schema.text()))
            .transpose()?;

        let action = normalize_action(action, &schema, old_v.is_some());
        let namespace = namespace.filter(|ns| !ns.is_empty());

        let mut v = Version::empty(&schema);
        initialize(&mut v, &schema, old_v.as_ref(), action);

        let Some(pinned) = segment(pin, &schema) else {
            return Err(VersionError::PinSchemaMismatch {
                pin: pin_text.to_string(),
                schema: schema.text().to_string(),
            });
        };

        let mut protected: HashSet<ElementKind> = HashSet::new();
        let today = Utc::now().date_naive();
        for (element, text) in &pinned.components {
            if ElementKind::lookup(text) == Some(element.kind) {
                // free slot
                match element.kind {
                    ElementKind::CalverModifier => {
                        v.modifier = Some(BASE_MODIFIER.to_string());
                    }
                    ElementKind::Branch => {
                        v.branch = old_v.as_ref().and_then(|old| old.branch.clone());
                    }
                    kind if kind.is_date() => {
                        if action != Some(Action::BumpPatch) {
                            if kind.reads_year() && v.year.is_some() {
                                v.year = Some(today.year().max(0) as u32);
                            }
                            if kind.reads_month() && v.month.is_some() {
                                v.month = Some(today.month());
                            }
                            if kind.reads_day() && v.day.is_some() {
                                v.day = Some(today.day());
                            }
                        }
                        // a refreshed date still counts as settled when
                        // deciding whether only nano is left to move
                        protected.insert(kind);
                    }
                    _ => {}
                }
            } else {
                v.apply_component(element.kind, text);
                if element.kind.is_numeric() || element.kind.is_date() {
                    protected.insert(element.kind);
                }
            }
        }

        fill_from_pin_extraction(&mut v, pinned.modifier.as_deref(), pinned.metadata.as_deref());
        resolve(&mut v, &schema, old_v.as_ref(), action, namespace, &protected);
        Ok(v)
    }
}

fn normalize_action(action: Option<Action>, schema: &Schema, has_old: bool) -> Option<Action> {
    let mut action = action;
    if action == Some(Action::BumpMajor) && !schema.contains(ElementKind::Major) {
        action = Some(Action::BumpMinor);
    }
    if action == Some(Action::BumpMinor) && !schema.contains(ElementKind::Minor) {
        action = Some(Action::Bump);
    }
    if action == Some(Action::BumpPatch) && !schema.contains(ElementKind::Patch) {
        action = Some(Action::Bump);
    }
    if action.is_none() && has_old {
        action = Some(Action::Bump);
    }
    action
}

/// Numeric fields carry over from the old version (or start at 0); calendar
/// fields are current unless the action is a pure patch bump, then the old
/// version's calendar values win.
fn initialize(v: &mut Version, schema: &Schema, old: Option<&Version>, action: Option<Action>) {
    for element in schema.elements() {
        if element.kind.is_numeric() {
            let carried = old
                .and_then(|old| match element.kind {
                    ElementKind::Major => old.major,
                    ElementKind::Minor => old.minor,
                    ElementKind::Patch => old.patch,
                    ElementKind::Nano => old.nano,
                    _ => None,
                })
                .unwrap_or(0);
            v.set_numeric(element.kind, carried);
        }
    }
    if old.is_none() && v.patch.is_none() && v.nano.is_none() {
        if v.minor.is_some() {
            v.minor = Some(1);
        } else if v.major.is_some() {
            v.major = Some(1);
        }
    }
    if action != Some(Action::BumpPatch) {
        v.set_current_date();
    }
    if let Some(old) = old {
        if old.year.is_some() {
            v.year = old.year;
        }
        if old.month.is_some() {
            v.month = old.month;
        }
        if old.day.is_some() {
            v.day = old.day;
        }
        v.modifier = old.modifier.clone();
        v.metadata = old.metadata.clone();
        v.snapshot = old.snapshot;
    }
}

/// Modifier/metadata text split off the pin fills an empty field, but only
/// when it is a literal value and not the name of a modifier/metadata kind
/// (which would just mark a free slot).
fn fill_from_pin_extraction(v: &mut Version, modifier: Option<&str>, metadata: Option<&str>) {
    if v.modifier.as_deref().map_or(true, str::is_empty) {
        if let Some(m) = modifier {
            if !matches!(
                ElementKind::lookup(m),
                Some(ElementKind::SemverModifier) | Some(ElementKind::CalverModifier)
            ) {
                v.modifier = Some(m.to_string());
            }
        }
    }
    if v.metadata.as_deref().map_or(true, str::is_empty) {
        if let Some(m) = metadata {
            if ElementKind::lookup(m) != Some(ElementKind::Metadata) {
                v.metadata = Some(m.to_string());
            }
        }
    }
}

fn resolve(
    v: &mut Version,
    schema: &Schema,
    old: Option<&Version>,
    action: Option<Action>,
    namespace: Option<&str>,
    protected: &HashSet<ElementKind>,
) {
    use ElementKind::{Major, Minor, Nano, Patch};

    let mut numeric_moved = false;
    if action == Some(Action::BumpPatch) && !protected.contains(&Patch) {
        v.bump_patch(None);
        numeric_moved = true;
    } else if old.map_or(false, |old| calendar_moved(v, old)) {
        for kind in [Major, Minor, Patch, Nano] {
            if schema.contains(kind) && !protected.contains(&kind) {
                v.set_numeric(kind, 0);
            }
        }
        numeric_moved = true;
    } else if action == Some(Action::BumpMajor) && !protected.contains(&Major) {
        v.bump_major(None);
        numeric_moved = true;
    } else if action == Some(Action::BumpMinor) && !protected.contains(&Minor) {
        v.bump_minor(None);
        numeric_moved = true;
    } else if action.is_some() && schema.contains(Patch) && !protected.contains(&Patch) {
        v.bump_patch(None);
        numeric_moved = true;
    } else if old.is_some() || (namespace.is_some() && fully_pinned(schema, protected)) {
        let settled_except_nano = schema
            .elements()
            .iter()
            .map(|e| e.kind)
            .filter(|k| (k.is_numeric() || k.is_date()) && *k != Nano)
            .all(|k| protected.contains(&k));
        if schema.contains(Nano) && !protected.contains(&Nano) && settled_except_nano {
            v.bump_nano(None);
            numeric_moved = true;
        } else {
            resolve_modifier_metadata(v, namespace);
            return;
        }
    }
    if numeric_moved {
        if let Some(ns) = namespace {
            v.modifier = Some(ns.to_string());
        }
    }
}

/// Nothing numeric was free to move, so the version advances through its
/// modifier counter (or, failing that, numeric metadata, or a plain bump).
fn resolve_modifier_metadata(v: &mut Version, namespace: Option<&str>) {
    let current = v.modifier.clone().filter(|m| !m.is_empty());
    match namespace {
        Some(ns) => {
            let bumped = match &current {
                None => Some(format!("{ns}1")),
                Some(m) => {
                    if let Ok(n) = m.parse::<u64>() {
                        Some(format!("{ns}{}", n.saturating_add(1)))
                    } else {
                        m.strip_prefix(ns)
                            .and_then(|digits| digits.parse::<u64>().ok())
                            .map(|n| format!("{ns}{}", n.saturating_add(1)))
                    }
                }
            };
            match bumped {
                Some(modifier) => v.modifier = Some(modifier),
                None => bump_metadata_or_fall_back(v),
            }
        }
        None => match &current {
            None => v.modifier = Some("1".to_string()),
            Some(m) => match m.parse::<u64>() {
                Ok(n) => v.modifier = Some(n.saturating_add(1).to_string()),
                Err(_) => bump_metadata_or_fall_back(v),
            },
        },
    }
}

fn bump_metadata_or_fall_back(v: &mut Version) {
    match v
        .metadata
        .as_deref()
        .and_then(|m| m.parse::<u64>().ok())
    {
        Some(n) => v.metadata = Some(n.saturating_add(1).to_string()),
        None => v.simple_bump(),
    }
}

/// Whether the new version's calendar fields moved forward relative to the
/// old version's. Years of different widths compare modulo 100.
fn calendar_moved(v: &Version, old: &Version) -> bool {
    let year_moved = match (v.year, old.year) {
        (Some(new), Some(old)) if (new < 100) != (old < 100) => new % 100 > old % 100,
        (Some(new), Some(old)) => new > old,
        _ => false,
    };
    let month_moved = matches!((v.month, old.month), (Some(new), Some(old)) if new > old);
    let day_moved = matches!((v.day, old.day), (Some(new), Some(old)) if new > old);
    year_moved || month_moved || day_moved
}

fn fully_pinned(schema: &Schema, protected: &HashSet<ElementKind>) -> bool {
    schema
        .elements()
        .iter()
        .map(|e| e.kind)
        .filter(|k| k.is_numeric() || k.is_date())
        .all(|k| protected.contains(&k))
}
