//! Rules mapping source file references of a verified contract onto a local project tree.
//!
//! Given a root directory, references are placed as follows
//! - `@scope/pkg/File.sol` becomes `node_modules/@scope/pkg/File.sol`, where `node_modules/@scope/pkg` is
//!   treated as an installed module and gets a placeholder `package.json` if it has none
//! - `contracts/Foo.sol` and `/contracts/Foo.sol` become `contracts/Foo.sol`
//! - everything else, e.g. `Foo.sol` or `lib/Bar.sol`, is prefixed with `contracts/`
//!
//! References are normalized lexically and must stay within `contracts/` or `node_modules/`.

use crate::error::Error;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

pub const DIR_CONTRACTS: &str = "contracts";
pub const DIR_NODE_MODULES: &str = "node_modules";

/// Content of the `package.json` written into module directories that didn't exist before.
pub const PACKAGE_PLACEHOLDER: &str = "{ \"name\": \"\", \"version\": \"\" }";
pub const PACKAGE_FILE: &str = "package.json";

/// Maximum number of empty parent directories removed after a file has been deleted.
const MAX_PRUNE_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Path relative to the root, always starting with `contracts/` or `node_modules/`.
    pub relative: PathBuf,

    /// `relative` joined onto the root.
    pub absolute: PathBuf,

    /// Absolute path of the module directory (`node_modules/@scope/pkg`) for scoped package references.
    pub module_root: Option<PathBuf>,
}

impl ResolvedPath {
    pub fn is_module(&self) -> bool {
        self.relative.starts_with(DIR_NODE_MODULES)
    }
}

/// Resolves a source file reference against `root`.
pub fn resolve(root: &Path, reference: &str) -> Result<ResolvedPath, Error> {
    let is_module = reference.starts_with('@');

    let prefixed = if is_module {
        format!("{DIR_NODE_MODULES}/{reference}")
    } else if reference.starts_with("contracts/") || reference.starts_with("/contracts/") {
        reference.to_string()
    } else {
        format!("{DIR_CONTRACTS}/{reference}")
    };

    let segments = normalize(&prefixed);
    let base = if is_module { DIR_NODE_MODULES } else { DIR_CONTRACTS };

    // At least one segment below `contracts/` or `node_modules/` and no `..` escaping out of them
    if segments.len() < 2 || segments[0] != base {
        return Err(Error::SourcePathOutsideTree(reference.to_string()));
    }

    let relative: PathBuf = segments.iter().collect();
    let module_root = match is_module && segments.len() > 3 {
        true => Some(root.join(segments[..3].iter().collect::<PathBuf>())),
        false => None,
    };

    Ok(ResolvedPath {
        absolute: root.join(&relative),
        relative,
        module_root,
    })
}

/// Splits a `/` separated path into its segments, dropping empty and `.` segments and resolving `..`.
fn normalize(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();

    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            // Leading `..` segments are kept, `resolve` rejects them as escaping the tree
            ".." => match segments.last() {
                Some(&"..") | None => segments.push(".."),
                Some(_) => {
                    segments.pop();
                }
            },
            segment => segments.push(segment),
        }
    }

    segments
}

/// Writes `content` to the resolved path, creating missing parent directories as well as the module's
/// placeholder `package.json`.
pub fn write(path: &ResolvedPath, content: &str) -> Result<(), Error> {
    let display = path.relative.display().to_string();

    if let Some(parent) = path.absolute.parent() {
        std::fs::create_dir_all(parent).map_err(|why| Error::FilesystemWrite(display.clone(), why))?;
    }

    if let Some(module_root) = &path.module_root {
        let package = module_root.join(PACKAGE_FILE);
        if !package.exists() {
            std::fs::write(&package, PACKAGE_PLACEHOLDER)
                .map_err(|why| Error::FilesystemWrite(package.display().to_string(), why))?;
        }
    }

    std::fs::write(&path.absolute, content).map_err(|why| Error::FilesystemWrite(display, why))
}

/// Removes the file at the resolved path (if present) and afterwards its empty parent directories.
/// Removal is best-effort, any failure is silently ignored.
pub fn remove(root: &Path, path: &ResolvedPath) {
    match std::fs::remove_file(&path.absolute) {
        Ok(()) => {}
        Err(why) if why.kind() == ErrorKind::NotFound => {}
        Err(_) => return,
    }

    if let Some(parent) = path.absolute.parent() {
        prune(root, parent);
    }
}

/// Removes a module's placeholder `package.json` once it's the only entry left in the module directory,
/// i.e. all other files of the module were removed.
pub fn remove_placeholder(root: &Path, module_root: &Path) {
    let package = module_root.join(PACKAGE_FILE);

    let is_placeholder = std::fs::read_to_string(&package)
        .map(|content| content == PACKAGE_PLACEHOLDER)
        .unwrap_or(false);

    let is_only_entry = std::fs::read_dir(module_root)
        .map(|entries| entries.count() == 1)
        .unwrap_or(false);

    if is_placeholder && is_only_entry && std::fs::remove_file(&package).is_ok() {
        prune(root, module_root);
    }
}

/// Removes up to [`MAX_PRUNE_DEPTH`] empty directories starting at `dir` and walking upwards, stopping at the
/// first non-empty directory and never touching `root` itself.
fn prune(root: &Path, dir: &Path) {
    let mut dir = dir.to_path_buf();

    for _ in 0..MAX_PRUNE_DEPTH {
        if dir == root || !dir.starts_with(root) || std::fs::remove_dir(&dir).is_err() {
            return;
        }

        if !dir.pop() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::layout;
    use crate::layout::resolve;
    use crate::layout::PACKAGE_PLACEHOLDER;
    use std::path::Path;
    use std::path::PathBuf;

    fn relative(reference: &str) -> PathBuf {
        resolve(Path::new("/work"), reference).unwrap().relative
    }

    #[test]
    fn resolve_project_files() {
        assert_eq!(relative("Foo.sol"), PathBuf::from("contracts/Foo.sol"));
        assert_eq!(relative("lib/utils/Bar.sol"), PathBuf::from("contracts/lib/utils/Bar.sol"));
        assert_eq!(relative("contracts/Foo.sol"), PathBuf::from("contracts/Foo.sol"));
        assert_eq!(relative("/contracts/Foo.sol"), PathBuf::from("contracts/Foo.sol"));
        assert_eq!(relative("src/contracts/Foo.sol"), PathBuf::from("contracts/src/contracts/Foo.sol"));
        assert_eq!(relative("/src/Foo.sol"), PathBuf::from("contracts/src/Foo.sol"));
        assert_eq!(relative("./lib//Bar.sol"), PathBuf::from("contracts/lib/Bar.sol"));
        assert_eq!(relative("contracts/a/../Foo.sol"), PathBuf::from("contracts/Foo.sol"));

        // Only the exact `contracts/` prefix counts
        assert_eq!(relative("contractsFoo.sol"), PathBuf::from("contracts/contractsFoo.sol"));
        assert_eq!(relative("contracts"), PathBuf::from("contracts/contracts"));
    }

    #[test]
    fn resolve_module_files() {
        let path = resolve(Path::new("/work"), "@openzeppelin/contracts/token/ERC20/ERC20.sol").unwrap();
        assert_eq!(path.relative, PathBuf::from("node_modules/@openzeppelin/contracts/token/ERC20/ERC20.sol"));
        assert_eq!(path.absolute, PathBuf::from("/work/node_modules/@openzeppelin/contracts/token/ERC20/ERC20.sol"));
        assert_eq!(path.module_root, Some(PathBuf::from("/work/node_modules/@openzeppelin/contracts")));
        assert!(path.is_module());

        let path = resolve(Path::new("/work"), "@scope/File.sol").unwrap();
        assert_eq!(path.relative, PathBuf::from("node_modules/@scope/File.sol"));
        assert_eq!(path.module_root, None);

        let path = resolve(Path::new("/work"), "@scope/pkg/File.sol").unwrap();
        assert_eq!(path.module_root, Some(PathBuf::from("/work/node_modules/@scope/pkg")));

        let path = resolve(Path::new("/work"), "contracts/Foo.sol").unwrap();
        assert_eq!(path.absolute, PathBuf::from("/work/contracts/Foo.sol"));
        assert_eq!(path.module_root, None);
        assert!(!path.is_module());
    }

    #[test]
    fn resolve_outside_tree() {
        for reference in [
            "../Foo.sol",
            "contracts/../../Foo.sol",
            "contracts/../../../x/../Foo.sol",
            "@scope/../../x.sol",
            "@scope/pkg/../../../contracts/x.sol",
            "",
            "/",
            "contracts/",
        ] {
            assert!(resolve(Path::new("/work"), reference).is_err(), "{reference}");
        }
    }

    #[test]
    fn write_and_remove() {
        let root = tempfile::tempdir().unwrap();
        let path = resolve(root.path(), "@scope/pkg/lib/File.sol").unwrap();

        layout::write(&path, "contract File {}").unwrap();
        assert_eq!(std::fs::read_to_string(&path.absolute).unwrap(), "contract File {}");

        let package = root.path().join("node_modules/@scope/pkg/package.json");
        assert_eq!(std::fs::read_to_string(&package).unwrap(), PACKAGE_PLACEHOLDER);

        // Existing files are overwritten, existing package.json files are kept as is
        std::fs::write(&package, "{ \"name\": \"pkg\" }").unwrap();
        layout::write(&path, "contract File2 {}").unwrap();
        assert_eq!(std::fs::read_to_string(&path.absolute).unwrap(), "contract File2 {}");
        assert_eq!(std::fs::read_to_string(&package).unwrap(), "{ \"name\": \"pkg\" }");

        layout::remove(root.path(), &path);
        assert!(!path.absolute.exists());
        assert!(!root.path().join("node_modules/@scope/pkg/lib").exists());
        assert!(package.exists());

        // Not a placeholder, hence kept
        layout::remove_placeholder(root.path(), path.module_root.as_ref().unwrap());
        assert!(package.exists());

        std::fs::write(&package, PACKAGE_PLACEHOLDER).unwrap();
        layout::remove_placeholder(root.path(), path.module_root.as_ref().unwrap());
        assert!(!root.path().join("node_modules").exists());
        assert!(root.path().exists());
    }

    #[test]
    fn remove_prunes_at_most_four_directories() {
        let root = tempfile::tempdir().unwrap();
        let path = resolve(root.path(), "a/b/c/d/e/F.sol").unwrap();

        layout::write(&path, "contract F {}").unwrap();
        layout::remove(root.path(), &path);

        assert!(!path.absolute.exists());
        assert!(!root.path().join("contracts/a/b").exists());
        assert!(root.path().join("contracts/a").is_dir());
    }

    #[test]
    fn remove_keeps_non_empty_directories() {
        let root = tempfile::tempdir().unwrap();
        let a = resolve(root.path(), "lib/A.sol").unwrap();
        let b = resolve(root.path(), "lib/B.sol").unwrap();

        layout::write(&a, "contract A {}").unwrap();
        layout::write(&b, "contract B {}").unwrap();

        layout::remove(root.path(), &a);
        assert!(!a.absolute.exists());
        assert!(b.absolute.exists());

        layout::remove(root.path(), &b);
        assert!(!root.path().join("contracts").exists());

        // Removing twice is a no-op
        layout::remove(root.path(), &b);
        assert!(root.path().exists());
    }
}
