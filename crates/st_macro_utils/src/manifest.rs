use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item};

const FACADE: &str = "stripes_core";
const MEMBER_PREFIX: &str = "st_";

/// The `Cargo.toml` of the crate being compiled.
///
/// Generated code names `st_bean` through whatever the caller depends on:
///
/// - `st_bean` itself gives `::st_bean`.
/// - `stripes_core` gives `::stripes_core::bean`.
/// - Anything else falls back to `::st_bean`.
///
/// `[dependencies]` is searched before `[dev-dependencies]`. A crate that
/// derives its own types in tests adds `extern crate self as st_bean;`.
#[derive(Debug)]
pub struct Manifest {
    document: Document<Box<str>>,
    modified: SystemTime,
}

impl Manifest {
    /// Parses `source` as a manifest.
    ///
    /// # Panics
    ///
    /// `source` is not valid TOML.
    pub fn parse(source: &str) -> Self {
        let document = Document::parse(Box::<str>::from(source))
            .unwrap_or_else(|e| panic!("Failed to parse the cargo manifest: {e}"));
        Self {
            document,
            modified: SystemTime::UNIX_EPOCH,
        }
    }

    /// How generated code should spell the path to the member crate `name`.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        let module = name.strip_prefix(MEMBER_PREFIX);
        let found = ["dependencies", "dev-dependencies"].into_iter().find_map(|section| {
            let Some(Item::Table(deps)) = self.document.get(section) else {
                return None;
            };
            if deps.contains_key(name) {
                Some(format!("::{name}"))
            } else if let Some(module) = module
                && deps.contains_key(FACADE)
            {
                Some(format!("::{FACADE}::{module}"))
            } else {
                None
            }
        });

        let path = found.unwrap_or_else(|| format!("::{name}"));
        syn::parse_str(&path).unwrap_or_else(|_| panic!("`{path}` is not a valid path"))
    }

    /// Runs `func` with the caller's manifest.
    ///
    /// Manifests are parsed once per path and parsed again only when the
    /// file changes on disk.
    ///
    /// # Panics
    ///
    /// `CARGO_MANIFEST_DIR` is unset, or its `Cargo.toml` cannot be read.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static CACHE: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .unwrap_or_else(|| panic!("CARGO_MANIFEST_DIR should be set by cargo"));
        let path = PathBuf::from(dir).join("Cargo.toml");
        let modified = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .unwrap_or_else(|e| panic!("Cannot stat {}: {e}", path.display()));

        {
            let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path)
                && manifest.modified == modified
            {
                return func(manifest);
            }
        }

        let source = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Cannot read {}: {e}", path.display()));
        let manifest = Self {
            modified,
            ..Self::parse(&source)
        };
        let result = func(&manifest);
        CACHE.write().unwrap_or_else(PoisonError::into_inner).insert(path, manifest);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;

    fn spelled(manifest: &str, name: &str) -> String {
        let path = Manifest::parse(manifest).get_crate_path(name);
        assert!(path.leading_colon.is_some());
        path.segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    #[test]
    fn direct_dependency_wins() {
        let toml = "[dependencies]\nst_bean = \"0.0.1\"\nstripes_core = \"0.0.1\"\n";
        assert_eq!(spelled(toml, "st_bean"), "st_bean");
    }

    #[test]
    fn facade_dev_dependency() {
        let toml = "[dev-dependencies]\nstripes_core = \"0.0.1\"\n";
        assert_eq!(spelled(toml, "st_bean"), "stripes_core::bean");
    }

    #[test]
    fn falls_back_to_the_crate_name() {
        assert_eq!(spelled("[package]\nname = \"demo\"\n", "st_bean"), "st_bean");
    }
}
