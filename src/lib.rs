//! # verstruct
//!
//! A library for parsing, matching and bumping versions against custom
//! SemVer/CalVer schemas.
//!
//! Instead of hard-coding one versioning convention, verstruct lets you
//! describe your own as a *schema*: a separator-joined list of elements such
//! as `Major.Minor.Patch` or `YYYY.0M.Micro-Modifier`. Version strings are
//! parsed, validated, compared and incremented against that schema.
//!
//! ## Examples
//!
//! Resolve the next version from a *pin* (a half-frozen version where some
//! positions hold literal values and the rest float):
//!
//! ```
//! use verstruct::prelude::*;
//!
//! // without history, unpinned positions take their baseline value
//! let v = Version::next("semver", "1.2.Patch", None, None, None).unwrap();
//! assert_eq!(v.render().unwrap(), "1.2.0");
//!
//! // with history, the engine advances the first field the pin left free
//! let v = Version::next("semver", "semver", Some("1.2.3"), Some(Action::Bump), None).unwrap();
//! assert_eq!(v.render().unwrap(), "1.2.4");
//! ```
//!
//! Or work with schemas and versions directly:
//!
//! ```
//! use verstruct::prelude::*;
//!
//! let schema = Schema::parse("YYYY.0M.Micro").unwrap();
//! assert!(schema.matches_version("2024.06.4"));
//! assert!(!schema.matches_version("2024.6.4"));
//!
//! let mut v = Version::parse("2024.06.4", "YYYY.0M.Micro").unwrap();
//! v.bump_patch(None);
//! assert_eq!(v.render().unwrap(), "2024.06.5");
//! ```
//!
//! ## Important Terms
//!
//! - **Schema**: the shape of a version, one [`ElementKind`] per position,
//!   modeled by [`Schema`]. Well-known names (`semver`, `four_part`,
//!   `calver_ubuntu`, ...) resolve as aliases.
//! - **Version**: a parsed value under a schema, modeled by [`Version`]. It
//!   renders back to text on demand and orders *descending* (newest first).
//! - **Pin**: a version-shaped string where each position is either a
//!   literal value (frozen, *protected* from bumping) or the name of its own
//!   element kind (free to move).
//! - **Action**: an increment request ([`Action`]), possibly derived from a
//!   conventional commit via [`action_for_commit`].

mod analyze;
mod api;
mod bump;
mod element;
mod error;
mod matcher;
mod schema;
mod segment;
mod version;

pub use crate::analyze::{is_version_semver, largest_difference, largest_semver_difference};
pub use crate::api::{
    action_for_commit, apply_action, base_version, modifier_calver, modifier_minor_calver,
    set_date_from_str, set_semver_elements, ubuntu_calver, Action, CommitInfo, CommitKind,
};
pub use crate::element::ElementKind;
pub use crate::error::{SchemaError, VersionError};
pub use crate::schema::{resolve_alias, Schema, SchemaElement, SEPARATORS};
pub use crate::segment::{segment, ParsedVersion, SNAPSHOT_SUFFIX};
pub use crate::version::{Version, VersionStringComparator, BASE_MODIFIER};

/// A convenience module appropriate for glob imports (`use verstruct::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::Action;
    #[doc(no_inline)]
    pub use crate::CommitInfo;
    #[doc(no_inline)]
    pub use crate::CommitKind;
    #[doc(no_inline)]
    pub use crate::ElementKind;
    #[doc(no_inline)]
    pub use crate::Schema;
    #[doc(no_inline)]
    pub use crate::SchemaError;
    #[doc(no_inline)]
    pub use crate::Version;
    #[doc(no_inline)]
    pub use crate::VersionError;
    #[doc(no_inline)]
    pub use crate::VersionStringComparator;
}
