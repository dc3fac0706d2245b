//! Registration records for fixture types and their methods.
//!
//! A [`TypeEntry`] is what reflection would have told us about a type: where it lives, whether it
//! carries the fixture marker, how to construct it, and which of its methods are tests or hooks.
//! Entries are produced at compile time by `#[testcraft::fixture]` and submitted to the
//! link-time registry; [`registered`] iterates everything linked into the current binary.

use std::any::{Any, type_name};
use std::error::Error;
use std::fmt;

use crate::failure::{BoxError, FixtureMismatch};

/// Type-erased call of one method on a fixture instance.
pub type InvokeFn = fn(&mut dyn Any) -> Result<(), BoxError>;

/// Type-erased constructor of a fixture instance.
pub type ConstructFn = fn() -> Result<Box<dyn Any>, BoxError>;

/// Role of a method inside its fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Test,
    Setup,
    Teardown,
    FixtureSetup,
    FixtureTeardown,
}

impl MethodKind {
    /// The attribute that declares this role.
    pub fn attribute(self) -> &'static str {
        match self {
            MethodKind::Test => "test",
            MethodKind::Setup => "setup",
            MethodKind::Teardown => "teardown",
            MethodKind::FixtureSetup => "fixture_setup",
            MethodKind::FixtureTeardown => "fixture_teardown",
        }
    }
}

/// A concrete error type an expected failure must match.
#[derive(Clone, Copy)]
pub struct FailureKind {
    name: &'static str,
    matches: fn(&(dyn Error + 'static)) -> bool,
}

impl FailureKind {
    pub const fn of<K: Error + 'static>(name: &'static str) -> Self {
        Self {
            name,
            matches: is_kind::<K>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        (self.matches)(err)
    }
}

fn is_kind<K: Error + 'static>(err: &(dyn Error + 'static)) -> bool {
    err.is::<K>()
}

impl fmt::Debug for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FailureKind").field(&self.name).finish()
    }
}

/// Declares that a test is only correct if it fails with `kind` (and optionally `message`).
#[derive(Debug, Clone, Copy)]
pub struct ExpectedFailure {
    kind: Option<FailureKind>,
    message: Option<&'static str>,
}

impl ExpectedFailure {
    pub const fn new(kind: Option<FailureKind>, message: Option<&'static str>) -> Self {
        Self { kind, message }
    }

    pub fn kind(&self) -> Option<FailureKind> {
        self.kind
    }

    /// Expected message, if one was given and is non-empty.
    pub fn message(&self) -> Option<&'static str> {
        self.message.filter(|m| !m.is_empty())
    }
}

/// One method of a fixture, as registered.
#[derive(Debug, Clone, Copy)]
pub struct MethodDescriptor {
    pub name: &'static str,
    pub kind: MethodKind,
    pub expected: Option<ExpectedFailure>,
    pub invoke: InvokeFn,
}

impl MethodDescriptor {
    pub const fn new(name: &'static str, kind: MethodKind, invoke: InvokeFn) -> Self {
        Self {
            name,
            kind,
            expected: None,
            invoke,
        }
    }

    pub const fn expecting(mut self, expected: ExpectedFailure) -> Self {
        self.expected = Some(expected);
        self
    }
}

/// Registration record of one type.
#[derive(Debug, Clone, Copy)]
pub struct TypeEntry {
    /// Module path of the type, segments separated by `::`.
    pub namespace: &'static str,
    pub name: &'static str,
    /// Whether the type carries the fixture marker.
    pub is_fixture: bool,
    pub construct: ConstructFn,
    /// Declared methods, in declaration order.
    pub methods: &'static [MethodDescriptor],
}

impl TypeEntry {
    pub fn descriptor(&self) -> FixtureDescriptor {
        FixtureDescriptor::of(self)
    }
}

inventory::collect!(TypeEntry);

/// Every entry linked into the current binary, in link order.
pub fn registered() -> impl Iterator<Item = &'static TypeEntry> {
    inventory::iter::<TypeEntry>.into_iter()
}

/// Implemented by `#[testcraft::fixture]` for every fixture type.
pub trait Fixture: Any {
    const ENTRY: TypeEntry;
}

/// Validated view of a fixture's methods: at most one hook of each kind, tests in order.
#[derive(Debug, Clone, Default)]
pub struct FixtureDescriptor {
    pub setup: Option<&'static MethodDescriptor>,
    pub teardown: Option<&'static MethodDescriptor>,
    pub fixture_setup: Option<&'static MethodDescriptor>,
    pub fixture_teardown: Option<&'static MethodDescriptor>,
    pub tests: Vec<&'static MethodDescriptor>,
}

impl FixtureDescriptor {
    pub fn of(entry: &TypeEntry) -> Self {
        let mut descriptor = Self::default();
        for method in entry.methods {
            let slot = match method.kind {
                MethodKind::Test => {
                    descriptor.tests.push(method);
                    continue;
                }
                MethodKind::Setup => &mut descriptor.setup,
                MethodKind::Teardown => &mut descriptor.teardown,
                MethodKind::FixtureSetup => &mut descriptor.fixture_setup,
                MethodKind::FixtureTeardown => &mut descriptor.fixture_teardown,
            };
            if let Some(first) = *slot {
                tracing::warn!(
                    fixture = entry.name,
                    kind = method.kind.attribute(),
                    kept = first.name,
                    ignored = method.name,
                    "duplicate hook declaration"
                );
            } else {
                *slot = Some(method);
            }
        }
        descriptor
    }
}

/// Return types allowed for tests and hooks.
pub trait TestReturn {
    fn into_result(self) -> Result<(), BoxError>;
}

impl TestReturn for () {
    fn into_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E: Into<BoxError>> TestReturn for Result<(), E> {
    fn into_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

/// Recover the concrete fixture behind a type-erased instance.
pub fn downcast_fixture<T: Any>(instance: &mut dyn Any) -> Result<&mut T, BoxError> {
    instance.downcast_mut::<T>().ok_or_else(|| {
        FixtureMismatch {
            expected: type_name::<T>(),
        }
        .into()
    })
}
