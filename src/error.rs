/// Errors caused by a bad or unusable schema.
///
/// These are configuration problems: the schema text itself is wrong, or a
/// schema was asked to render a version that does not carry the fields the
/// schema needs. They surface as soon as the schema is used.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum SchemaError {
    #[error("Unknown element `{element}` in schema `{schema}`")]
    UnknownElement { element: String, schema: String },

    #[error("Schema `{schema}` cannot represent this version: element `{element}` has no value")]
    UnsupportedSchema { schema: String, element: String },

    #[error("Schema must not be empty")]
    EmptySchema,
}

/// Errors caused by version or pin data that does not fit its schema.
///
/// Unlike [`SchemaError`], these describe bad *inputs*: the schema is fine,
/// but a supplied version or pin string does not match it. They are raised
/// before any version state is mutated.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum VersionError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Version `{version}` does not match schema `{schema}`")]
    VersionSchemaMismatch { version: String, schema: String },

    #[error("Pin `{pin}` does not match schema `{schema}`")]
    PinSchemaMismatch { pin: String, schema: String },

    #[error("Version `{version}` does not match schema `{schema}` with pin `{pin}`")]
    VersionPinMismatch {
        version: String,
        schema: String,
        pin: String,
    },

    #[error("`{semver}` is not a Major.Minor.Patch version")]
    NotSemver { semver: String },

    #[error("Unparseable date `{date}`, expected YYYY-MM-DD")]
    UnparseableDate { date: String },
}
