//! SLS version grammars.
//!
//! Orderable versions are plain releases (`1.2.3`), release candidates
//! (`1.2.3-rc4`), and either of those with a snapshot suffix
//! (`1.2.3-5-gabc123`, `1.2.3-rc4-5-gabc123`). Matchers allow `x` in place of
//! trailing components.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static RELEASE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]+\.[0-9]+\.[0-9]+$"));
static RELEASE_SNAPSHOT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[0-9]+\.[0-9]+\.[0-9]+-[0-9]+-g[a-f0-9]+$"));
static RELEASE_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[0-9]+\.[0-9]+\.[0-9]+-rc[0-9]+$"));
static RELEASE_CANDIDATE_SNAPSHOT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[0-9]+\.[0-9]+\.[0-9]+-rc[0-9]+-[0-9]+-g[a-f0-9]+$"));
static MATCHER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^((x\.x\.x)|([0-9]+\.x\.x)|([0-9]+\.[0-9]+\.x)|([0-9]+\.[0-9]+\.[0-9]+))$")
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("SLS grammar regex should compile")
}

/// Which SLS grammar a string was checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlsGrammar {
    /// Strict orderable version.
    Version,
    /// Version matcher (`x.x.x`, `1.x.x`, `1.2.x`, `1.2.3`).
    Matcher,
}

impl SlsGrammar {
    /// Whether `value` satisfies this grammar.
    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        match self {
            Self::Version => is_valid_version(value),
            Self::Matcher => is_valid_matcher(value),
        }
    }
}

impl fmt::Display for SlsGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version => f.write_str("SLS version"),
            Self::Matcher => f.write_str("SLS version matcher"),
        }
    }
}

#[must_use]
pub fn is_valid_version(value: &str) -> bool {
    RELEASE.is_match(value)
        || RELEASE_SNAPSHOT.is_match(value)
        || RELEASE_CANDIDATE.is_match(value)
        || RELEASE_CANDIDATE_SNAPSHOT.is_match(value)
}

#[must_use]
pub fn is_valid_matcher(value: &str) -> bool {
    MATCHER.is_match(value)
}
