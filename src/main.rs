use clap::Parser;

use verstruct::{
    action_for_commit, set_date_from_str, set_semver_elements, Action, CommitInfo, CommitKind,
    Version, VersionError,
};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    LibraryError(#[from] VersionError),

    #[error("a schema is required; pass one with --schema")]
    MissingSchema,

    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::MissingSchema => 1,
            _ => 2,
        }
    }
}

/// A commit header in the conventional `type(scope)!: subject` shape. Only
/// the pieces that influence version resolution are kept.
#[derive(Debug)]
struct ConventionalCommit {
    kind: CommitKind,
    breaking: bool,
}

impl ConventionalCommit {
    fn parse(message: &str) -> Option<ConventionalCommit> {
        let header = message.lines().next()?;
        let (prefix, _) = header.split_once(':')?;
        let prefix = prefix.trim();
        let breaking = prefix.ends_with('!') || message.contains("BREAKING CHANGE");
        let prefix = prefix.trim_end_matches('!');
        let prefix = match prefix.split_once('(') {
            Some((type_name, _)) => type_name,
            None => prefix,
        };
        let kind = CommitKind::from_prefix(prefix)?;
        Some(ConventionalCommit { kind, breaking })
    }
}

impl CommitInfo for ConventionalCommit {
    fn is_breaking_change(&self) -> bool {
        self.breaking
    }

    fn kind(&self) -> CommitKind {
        self.kind
    }
}

/// Resolves the next version of a project from its schema, pin and current
/// version, then prints it.
///
/// clap's auto-generated `--version` flag is disabled; that name belongs to
/// the current-version argument.
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Cli {
    /// The schema the version follows, as element names or a known alias
    /// such as `semver` or `calver_ubuntu`
    #[arg(short, long)]
    schema: Option<String>,

    /// The current version; omit to start from the schema's baseline
    #[arg(short, long)]
    version: Option<String>,

    /// The pin restricting which positions may move; defaults to the schema
    /// itself (everything free)
    #[arg(short, long)]
    pin: Option<String>,

    /// The bump to apply: bump, bumppatch, bumpminor, bumpmajor or bumpdate
    #[arg(short, long)]
    action: Option<String>,

    /// A commit message to derive the action from, when --action is absent
    #[arg(short, long)]
    commit: Option<String>,

    /// Overrides the modifier element of the result
    #[arg(long)]
    modifier: Option<String>,

    /// Overrides the metadata element of the result
    #[arg(long)]
    metadata: Option<String>,

    /// A maturity stream name; its own modifier counter advances
    /// independently of other streams
    #[arg(long)]
    namespace: Option<String>,

    /// Overrides the branch element of the result
    #[arg(long)]
    branch: Option<String>,

    /// Overrides the build environment element of the result
    #[arg(long)]
    cienv: Option<String>,

    /// Overrides the build id element of the result
    #[arg(long)]
    cibuild: Option<String>,

    /// Copies major, minor and patch from a `Major.Minor.Patch` string onto
    /// the result
    #[arg(long)]
    semver: Option<String>,

    /// Forces the snapshot marker on or off; omit to keep the resolved state
    #[arg(long)]
    snapshot: Option<bool>,

    /// Sets the calendar elements from a `YYYY-MM-DD` date instead of today
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<String>,
}

type Output = (String, i32);

fn main() {
    let cli = Cli::parse();

    match do_work(cli) {
        Ok((output, exit_code)) => {
            println!("{output}");
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn do_work(cli: Cli) -> Result<Output, CliError> {
    let schema = cli.schema.as_deref().ok_or(CliError::MissingSchema)?;
    let pin = cli.pin.as_deref().unwrap_or(schema);

    let action = match cli.action.as_deref().filter(|a| !a.is_empty()) {
        Some(name) => {
            Some(Action::from_name(name).ok_or_else(|| CliError::UnknownAction(name.to_string()))?)
        }
        None => match cli.commit.as_deref().and_then(ConventionalCommit::parse) {
            Some(commit) => action_for_commit(&commit),
            None => None,
        },
    };

    let mut next = Version::next(
        schema,
        pin,
        cli.version.as_deref(),
        action,
        cli.namespace.as_deref(),
    )?;

    if let Some(modifier) = nonempty(&cli.modifier) {
        next.set_modifier(Some(modifier.to_string()));
    }
    if let Some(metadata) = nonempty(&cli.metadata) {
        next.set_metadata(Some(metadata.to_string()));
    }
    if let Some(cienv) = nonempty(&cli.cienv) {
        next.set_buildenv(Some(cienv.to_string()));
    }
    if let Some(cibuild) = nonempty(&cli.cibuild) {
        next.set_buildid(Some(cibuild.to_string()));
    }
    if let Some(branch) = nonempty(&cli.branch) {
        next.set_branch(Some(branch.to_string()));
    }
    if let Some(semver) = nonempty(&cli.semver) {
        set_semver_elements(&mut next, semver)?;
    }
    if let Some(snapshot) = cli.snapshot {
        next.set_snapshot(snapshot);
    }
    if let Some(date) = nonempty(&cli.date) {
        set_date_from_str(&mut next, date)?;
    }

    let rendered = next.render().map_err(VersionError::from)?;
    Ok((rendered, 0))
}

fn nonempty(arg: &Option<String>) -> Option<&str> {
    arg.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run(args: &[&str]) -> Result<Output, CliError> {
        let mut argv = vec!["verstruct"];
        argv.extend_from_slice(args);
        do_work(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn argument_definitions_are_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn bump_from_current_version() {
        let (output, code) = run(&["--schema", "semver", "--version", "1.2.3"]).unwrap();
        assert_eq!(output, "1.2.4");
        assert_eq!(code, 0);
    }

    #[test]
    fn baseline_when_no_version() {
        let (output, _) = run(&["--schema", "semver"]).unwrap();
        assert_eq!(output, "0.0.0");
    }

    #[test]
    fn pin_restricts_movement() {
        let (output, _) = run(&[
            "--schema", "semver", "--pin", "1.2.Patch", "--version", "1.2.7",
        ])
        .unwrap();
        assert_eq!(output, "1.2.8");
    }

    #[test]
    fn missing_schema_is_exit_one() {
        let err = run(&["--version", "1.2.3"]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn bad_version_is_exit_two() {
        let err = run(&["--schema", "semver", "--version", "1.2.3.4"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn overrides_apply_after_resolution() {
        let (output, _) = run(&[
            "--schema",
            "semver",
            "--version",
            "1.2.3",
            "--modifier",
            "rc2",
            "--snapshot",
            "true",
        ])
        .unwrap();
        assert_eq!(output, "1.2.4-rc2-SNAPSHOT");
    }

    #[rstest]
    #[case("fix: stop the bleeding", "1.2.4")]
    #[case("feat(parser): learn new tricks", "1.3.0")]
    #[case("feat!: breaking api rework", "2.0.0")]
    #[case("chore: tidy up", "1.2.4")]
    fn commit_classification_drives_action(#[case] commit: &str, #[case] expected: &str) {
        let (output, _) = run(&[
            "--schema", "semver", "--version", "1.2.3", "--commit", commit,
        ])
        .unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn explicit_action_beats_commit() {
        let (output, _) = run(&[
            "--schema",
            "semver",
            "--version",
            "1.2.3",
            "--action",
            "bumpmajor",
            "--commit",
            "fix: minor thing",
        ])
        .unwrap();
        assert_eq!(output, "2.0.0");
    }
}
