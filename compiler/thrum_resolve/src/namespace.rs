//! The namespace table.
//!
//! One [`Namespace`] per source file, keyed in the [`NamespaceMap`] by the
//! accessor the external loader assigned when it resolved `include`
//! statements. The table is built fully before any file's code is generated
//! and is read-only thereafter; the resolver, inliner, and import extractor
//! only ever borrow from it.

use rustc_hash::FxHashMap;

use thrum_ir::{Definition, Statement};

/// A file's exports: unqualified name → definition. Names are unique within
/// a namespace.
pub type FileExports = FxHashMap<String, Definition>;

/// Where an include alias points: the included namespace's path and the
/// accessor under which the map stores it.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct IncludePath {
    pub path: String,
    pub accessor: String,
}

impl IncludePath {
    pub fn new(path: impl Into<String>, accessor: impl Into<String>) -> Self {
        IncludePath {
            path: path.into(),
            accessor: accessor.into(),
        }
    }
}

/// The record for one namespace.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    /// The dotted namespace path, e.g. `com.test.shared`.
    pub path: String,
    /// Definitions this namespace exports, by unqualified name.
    pub exports: FileExports,
    /// Direct includes: alias → target path and accessor.
    pub included_namespaces: FxHashMap<String, IncludePath>,
    /// Indirect (re-exported) includes: alias → accessor.
    pub namespace_includes: FxHashMap<String, String>,
}

impl Namespace {
    /// Create an empty namespace record.
    pub fn new(path: impl Into<String>) -> Self {
        Namespace {
            path: path.into(),
            ..Namespace::default()
        }
    }

    /// Create a record whose exports come from a file body.
    pub fn from_statements(path: impl Into<String>, statements: &[Statement]) -> Self {
        Namespace {
            path: path.into(),
            exports: exports_for_file(statements),
            ..Namespace::default()
        }
    }

    /// Add a definition to the exports, replacing any previous definition of
    /// the same name.
    pub fn add_definition(&mut self, def: Definition) -> &mut Self {
        self.exports.insert(def.name().to_string(), def);
        self
    }

    /// Register a direct include under `alias`.
    pub fn add_include(
        &mut self,
        alias: impl Into<String>,
        target: impl Into<String>,
        accessor: impl Into<String>,
    ) -> &mut Self {
        self.included_namespaces
            .insert(alias.into(), IncludePath::new(target, accessor));
        self
    }

    /// Register an indirect ("namespace include") accessor under `alias`.
    pub fn add_namespace_include(
        &mut self,
        alias: impl Into<String>,
        accessor: impl Into<String>,
    ) -> &mut Self {
        self.namespace_includes
            .insert(alias.into(), accessor.into());
        self
    }

    /// The accessor an include alias resolves to, consulting direct includes
    /// first and then indirect ones. Shared by the definition resolver and
    /// the constant inliner so the two walks agree.
    pub fn include_accessor(&self, alias: &str) -> Option<&str> {
        if let Some(include) = self.included_namespaces.get(alias) {
            return Some(&include.accessor);
        }
        self.namespace_includes.get(alias).map(String::as_str)
    }
}

/// All namespaces of a project, keyed by accessor.
#[derive(Clone, Debug, Default)]
pub struct NamespaceMap {
    namespaces: FxHashMap<String, Namespace>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        NamespaceMap::default()
    }

    /// Insert a namespace under its accessor.
    pub fn insert(&mut self, accessor: impl Into<String>, namespace: Namespace) {
        self.namespaces.insert(accessor.into(), namespace);
    }

    /// Look up a namespace by accessor.
    pub fn get(&self, accessor: &str) -> Option<&Namespace> {
        self.namespaces.get(accessor)
    }

    /// Iterate (accessor, namespace) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Namespace)> {
        self.namespaces
            .iter()
            .map(|(accessor, ns)| (accessor.as_str(), ns))
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

/// Compute a file's exports from its statements.
///
/// Include and namespace statements export nothing; every definition exports
/// under its declared name.
pub fn exports_for_file(statements: &[Statement]) -> FileExports {
    let mut exports = FileExports::default();
    for statement in statements {
        match statement {
            Statement::Def(def) => {
                exports.insert(def.name().to_string(), def.clone());
            }
            Statement::Include(_) | Statement::Namespace(_) => {}
        }
    }
    exports
}
