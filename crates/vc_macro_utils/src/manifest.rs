use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find the path under which generated
/// code can reach another crate.
///
/// # Example
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_access"));
/// ```
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the requested crate name begins with `vc_` and the caller depends on
///    the facade `vc_rw`, return `::vc_rw::short_name`
///    (e.g. `vc_access` -> `::vc_rw::access`).
/// 3. Repeat steps 1-2 in `dev-dependencies`.
/// 4. Otherwise, fall back to `::crate_name`.
///
/// A crate deriving its own traits resolves to `::crate_name` and needs
/// `extern crate self as crate_name;` at its root.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "vc_rw";
const CRATE_PREFIX: &str = "vc_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be defined by cargo");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(path.exists(), "no Cargo manifest at {}", path.display());
        path
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("unable to read Cargo manifest {}", path.display()));
        Document::parse(text.into_boxed_str())
            .unwrap_or_else(|_| panic!("failed to parse Cargo manifest {}", path.display()))
    }

    fn parse_path(path: &str) -> syn::Path {
        syn::parse_str(path).unwrap_or_else(|_| panic!("`{path}` is not a valid path"))
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_path(&format!("::{name}")));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        deps.contains_key(FACADE_NAME)
            .then(|| Self::parse_path(&format!("::{FACADE_NAME}::{module}")))
    }

    /// The [`syn::Path`] of the package `name`, as seen from the caller.
    /// See the type documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .find_map(|section| match self.manifest.get(section) {
                Some(Item::Table(deps)) => Self::find_in_deps(deps, name),
                _ => None,
            })
            .unwrap_or_else(|| Self::parse_path(&format!("::{name}")))
    }

    /// Runs `func` with the caller's manifest.
    ///
    /// Manifests are cached per path and reloaded when the file changes.
    /// Reading is still not free, so call this once per macro invocation.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = std::fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .expect("the Cargo manifest should have a modified time");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = manifests.get(&path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }
        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use quote::ToTokens;
    use toml_edit::Document;

    fn resolve(toml: &str, name: &str) -> String {
        let manifest = Manifest {
            manifest: Document::parse(Box::from(toml)).unwrap(),
            modified_time: std::time::SystemTime::UNIX_EPOCH,
        };
        manifest
            .get_crate_path(name)
            .to_token_stream()
            .to_string()
            .replace(' ', "")
    }

    #[test]
    fn direct_dependency_wins() {
        let toml = "[dependencies]\nvc_access = \"0.0.1\"\nvc_rw = \"0.0.1\"\n";
        assert_eq!(resolve(toml, "vc_access"), "::vc_access");
    }

    #[test]
    fn facade_dependency_is_used() {
        let toml = "[dependencies]\nvc_rw = \"0.0.1\"\n";
        assert_eq!(resolve(toml, "vc_access"), "::vc_rw::access");

        let toml = "[dev-dependencies]\nvc_rw = \"0.0.1\"\n";
        assert_eq!(resolve(toml, "vc_access"), "::vc_rw::access");
    }

    #[test]
    fn unknown_crates_fall_back_to_absolute_paths() {
        assert_eq!(resolve("[package]\nname = \"x\"\n", "vc_access"), "::vc_access");
        assert_eq!(resolve("[dependencies]\nvc_rw = \"0.0.1\"\n", "serde"), "::serde");
    }
}
