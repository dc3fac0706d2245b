//! Discovery: which registered types are fixtures, and in what order they run.

use std::any::Any;

use thiserror::Error;
use testcraft_core::{InvocationError, TypeEntry, registered, root_cause};

use crate::engine::invoke::guarded;

/// The set of types one run looks at.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    entries: Vec<TypeEntry>,
}

impl Assembly {
    /// Every type registered in the current binary.
    pub fn linked() -> Self {
        Self::from_entries(registered().copied())
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TypeEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("could not construct `{name}`")]
    Construction {
        name: &'static str,
        #[source]
        source: InvocationError,
    },
}

/// A constructed fixture, ready to run.
#[derive(Debug)]
pub struct FixtureInstance {
    entry: TypeEntry,
    instance: Box<dyn Any>,
}

impl FixtureInstance {
    pub fn entry(&self) -> &TypeEntry {
        &self.entry
    }

    pub fn name(&self) -> &'static str {
        self.entry.name
    }

    pub fn namespace(&self) -> &'static str {
        self.entry.namespace
    }

    pub fn instance(&self) -> &dyn Any {
        self.instance.as_ref()
    }

    pub fn instance_mut(&mut self) -> &mut dyn Any {
        self.instance.as_mut()
    }
}

pub fn is_candidate(entry: &TypeEntry) -> bool {
    entry.is_fixture
}

/// Builds an instance with the registered constructor. Panics are caught.
pub fn instantiate(entry: &TypeEntry) -> Result<FixtureInstance, DiscoveryError> {
    let instance = guarded(entry.name, entry.construct).map_err(|source| DiscoveryError::Construction {
        name: entry.name,
        source,
    })?;
    Ok(FixtureInstance { entry: *entry, instance })
}

/// Fixture entries of `assembly`, sorted by namespace then name.
pub fn candidates(assembly: &Assembly) -> Vec<&TypeEntry> {
    let mut candidates: Vec<_> = assembly.entries().iter().filter(|entry| is_candidate(entry)).collect();
    candidates.sort_by(|a, b| (a.namespace, a.name).cmp(&(b.namespace, b.name)));
    candidates
}

/// Constructs each candidate lazily, in run order. Types that fail to construct are skipped.
pub fn discover(assembly: &Assembly) -> impl Iterator<Item = FixtureInstance> + '_ {
    candidates(assembly)
        .into_iter()
        .filter_map(|entry| match instantiate(entry) {
            Ok(fixture) => Some(fixture),
            Err(err) => {
                tracing::debug!(
                    namespace = entry.namespace,
                    fixture = entry.name,
                    error = %root_cause(&err),
                    "excluded from run"
                );
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use testcraft_core::{BoxError, Fixture, Panicked};

    fn construct_unit() -> Result<Box<dyn Any>, BoxError> {
        Ok(Box::new(()))
    }

    fn entry(namespace: &'static str, name: &'static str, is_fixture: bool) -> TypeEntry {
        TypeEntry {
            namespace,
            name,
            is_fixture,
            construct: construct_unit,
            methods: &[],
        }
    }

    #[derive(Default)]
    struct Plain;

    #[crate::fixture]
    impl Plain {
        #[test]
        fn runs(&self) {}
    }

    struct Unreachable;

    #[crate::fixture(new = Self::connect)]
    impl Unreachable {
        fn connect() -> io::Result<Self> {
            Err(io::Error::other("connection refused"))
        }

        #[test]
        fn never_runs(&self) {}
    }

    struct Exploding;

    #[crate::fixture(new = Self::build)]
    impl Exploding {
        fn build() -> Result<Self, io::Error> {
            panic!("constructor exploded")
        }

        #[test]
        fn never_runs(&self) {}
    }

    #[test]
    fn test_candidates_are_marked_and_sorted() {
        let assembly = Assembly::from_entries([
            entry("b::inner", "Alpha", true),
            entry("a", "Zulu", true),
            entry("a", "Helper", false),
            entry("a", "Mike", true),
        ]);

        let order: Vec<_> = candidates(&assembly).iter().map(|e| (e.namespace, e.name)).collect();
        assert_eq!(order, vec![("a", "Mike"), ("a", "Zulu"), ("b::inner", "Alpha")]);
    }

    #[test]
    fn test_instantiate_uses_default() {
        let fixture = instantiate(&Plain::ENTRY).unwrap();
        assert_eq!(fixture.name(), "Plain");
        assert!(fixture.namespace().ends_with("discovery::tests"));
        assert!(fixture.instance().is::<Plain>());
    }

    #[test]
    fn test_failed_constructors_are_reported_by_instantiate() {
        let err = instantiate(&Unreachable::ENTRY).unwrap_err();
        assert_eq!(root_cause(&err).to_string(), "connection refused");

        let err = instantiate(&Exploding::ENTRY).unwrap_err();
        assert!(root_cause(&err).is::<Panicked>());
    }

    #[test]
    fn test_discover_skips_unconstructible_types() {
        let assembly = Assembly::from_entries([Exploding::ENTRY, Plain::ENTRY, Unreachable::ENTRY]);
        let found: Vec<_> = discover(&assembly).map(|f| f.name()).collect();
        assert_eq!(found, vec!["Plain"]);
    }

    #[test]
    fn test_linked_assembly_sees_registered_fixtures() {
        let assembly = Assembly::linked();
        assert!(assembly.entries().iter().any(|e| e.name == "Plain" && e.is_fixture));
    }
}
