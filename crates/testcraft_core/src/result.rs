//! Per-test outcome records and their aggregate.

use std::error::Error;
use std::fmt;

use crate::failure::FailureCause;

/// Outcome of a single test.
///
/// `Unknown` is the state of a verdict that has not been reached yet; results built through the
/// [`TestResult`] factories are always `Pass` or `Fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    #[default]
    Unknown,
    Pass,
    Fail,
}

impl Outcome {
    pub fn is_pass(self) -> bool {
        self == Outcome::Pass
    }

    pub fn is_fail(self) -> bool {
        self == Outcome::Fail
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Unknown => "Unknown",
            Outcome::Pass => "Pass",
            Outcome::Fail => "Fail",
        };
        f.write_str(s)
    }
}

/// Result of running one test (or one of its hooks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    name: String,
    outcome: Outcome,
    message: Option<String>,
    cause: Option<FailureCause>,
}

impl TestResult {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Pass,
            message: None,
            cause: None,
        }
    }

    /// A failure caused by `cause`; its message becomes the result's message.
    pub fn fail(name: impl Into<String>, cause: &(dyn Error + 'static)) -> Self {
        let cause = FailureCause::capture(cause);
        Self {
            name: name.into(),
            outcome: Outcome::Fail,
            message: Some(cause.message().to_string()),
            cause: Some(cause),
        }
    }

    pub fn fail_with_message(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Fail,
            message: Some(message.into()),
            cause: None,
        }
    }

    /// Qualified name, `"<Type>.<method>"` or a hook pseudo-name such as `"<Type>.<method>.Setup()"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cause(&self) -> Option<&FailureCause> {
        self.cause.as_ref()
    }
}

/// Ordered collection of results; counts are derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    results: Vec<TestResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn add_range(&mut self, results: impl IntoIterator<Item = TestResult>) {
        self.results.extend(results);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestResult> {
        self.results.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed() + self.failed()
    }

    pub fn passed(&self) -> usize {
        self.count(Outcome::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::Fail)
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }
}

impl From<TestResult> for ResultSet {
    fn from(result: TestResult) -> Self {
        Self { results: vec![result] }
    }
}

impl FromIterator<TestResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = TestResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl Extend<TestResult> for ResultSet {
    fn extend<I: IntoIterator<Item = TestResult>>(&mut self, iter: I) {
        self.add_range(iter);
    }
}

impl IntoIterator for ResultSet {
    type Item = TestResult;
    type IntoIter = std::vec::IntoIter<TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a TestResult;
    type IntoIter = std::slice::Iter<'a, TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
