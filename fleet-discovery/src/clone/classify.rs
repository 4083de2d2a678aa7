//! Classification of `git clone` failures from stderr.

/// Why a clone failed, as far as git's output tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloneFailure {
    /// Credentials missing or rejected.
    Authentication,
    /// The repository does not exist or is not visible.
    RepositoryNotFound,
    /// The requested branch does not exist on the remote.
    BranchNotFound,
    /// Anything else: network, disk, git itself.
    Other,
}

const BRANCH_MARKERS: &[&str] = &[
    "could not find remote branch",
    "couldn't find remote ref",
];

const AUTH_MARKERS: &[&str] = &[
    "authentication failed",
    "could not read username",
    "could not read password",
    "terminal prompts disabled",
    "invalid username or password",
    "http basic: access denied",
    "the requested url returned error: 401",
    "the requested url returned error: 403",
];

const NOT_FOUND_MARKERS: &[&str] = &[
    "repository not found",
    "does not appear to be a git repository",
    "the requested url returned error: 404",
];

/// Classifies a failed clone from its (already sanitized) stderr.
///
/// Branch markers are checked first since git reports a missing branch with
/// "not found" too; auth markers come before the generic not-found ones.
pub(crate) fn classify(stderr: &str) -> CloneFailure {
    let stderr = stderr.to_lowercase();
    let has_any = |markers: &[&str]| markers.iter().any(|m| stderr.contains(m));

    if has_any(BRANCH_MARKERS) || (stderr.contains("remote branch") && stderr.contains("not found"))
    {
        CloneFailure::BranchNotFound
    } else if has_any(AUTH_MARKERS) {
        CloneFailure::Authentication
    } else if has_any(NOT_FOUND_MARKERS) || stderr.lines().any(is_remote_not_found) {
        CloneFailure::RepositoryNotFound
    } else {
        CloneFailure::Other
    }
}

/// Matches `fatal: repository '<url>' not found` and `remote: ... not found`.
///
/// Local warnings such as "templates not found" do not count.
fn is_remote_not_found(line: &str) -> bool {
    let line = line.trim();
    if !line.ends_with("not found") && !line.ends_with("not found.") {
        return false;
    }
    line.starts_with("remote:") || line.contains("repository '")
}
