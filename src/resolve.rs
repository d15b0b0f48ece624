//! # Include Resolution
//!
//! Decides, for every include directive, whether it refers to something the
//! merge will inline, something deliberately left out, or something outside
//! the amalgamation entirely.
//!
//! The decision is driven by an injected [`IncludeLookup`]: a mapping from
//! the literal text of a directive, seen from the directory of the file that
//! contains it, to the canonical path of the file it names. The on-disk
//! implementation is [`FileIndex`], which tries the including file's own
//! directory, then the `-i` search directories, then the explicit inputs;
//! tests can use a plain `HashMap`.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{trace, warn};
use walkdir::WalkDir;

use crate::directive::{IncludeReference, LibraryRule};
use crate::error::{Error, Result};
use crate::path::{target_key, to_include_form, unit_key};

/// Maps a directive's literal target to the file it names.
///
/// `from_dir` is the directory of the file containing the directive, when
/// it has one.
pub trait IncludeLookup {
    fn lookup(&self, target: &str, from_dir: Option<&Path>) -> Option<PathBuf>;
}

impl IncludeLookup for HashMap<String, PathBuf> {
    fn lookup(&self, target: &str, _from_dir: Option<&Path>) -> Option<PathBuf> {
        self.get(target).cloned()
    }
}

/// Index of files a directive may resolve to.
///
/// A target naming an existing file relative to the including file's
/// directory always wins. Otherwise search-directory entries are matched on
/// their exact relative path (`Argos/Option.hpp`), and explicit inputs on
/// their basename, the same identity the dependency graph uses. Earlier
/// registrations win.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    relative: HashMap<String, PathBuf>,
    by_name: HashMap<String, PathBuf>,
    search_dirs: usize,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every file below `dir` under its path relative to `dir`.
    ///
    /// Returns how many new entries were added.
    pub fn add_search_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(Error::Walk {
                path: dir.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }
        let mut added = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let name = to_include_form(relative);
            if self.relative.contains_key(&name) {
                continue;
            }
            let canonical = fs::canonicalize(entry.path())?;
            self.relative.insert(name, canonical);
            added += 1;
        }
        self.search_dirs += 1;
        Ok(added)
    }

    /// Register an explicit input under its basename.
    pub fn add_input(&mut self, path: &Path) {
        self.by_name
            .entry(unit_key(path))
            .or_insert_with(|| path.to_path_buf());
    }

    /// Whether any search directory has been registered.
    pub fn has_search_dirs(&self) -> bool {
        self.search_dirs > 0
    }

    pub fn len(&self) -> usize {
        self.relative.len() + self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IncludeLookup for FileIndex {
    fn lookup(&self, target: &str, from_dir: Option<&Path>) -> Option<PathBuf> {
        from_dir
            .and_then(|dir| beside(dir, target))
            .or_else(|| {
                self.relative
                    .get(target)
                    .or_else(|| self.by_name.get(target_key(target)))
                    .cloned()
            })
    }
}

/// The file `target` names below `dir`, if it exists.
///
/// Only plain downward paths qualify; `..` and absolute targets never match.
fn beside(dir: &Path, target: &str) -> Option<PathBuf> {
    let relative = Path::new(target);
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return None;
    }
    let candidate = dir.join(relative);
    if !candidate.is_file() {
        return None;
    }
    fs::canonicalize(candidate).ok()
}

/// Files excluded from the merge even when referenced.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    paths: HashSet<PathBuf>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a file, or every file below a directory.
    pub fn add(&mut self, entry: &Path) -> Result<()> {
        if entry.is_dir() {
            for item in WalkDir::new(entry) {
                let item = item?;
                if item.file_type().is_file() {
                    self.paths.insert(fs::canonicalize(item.path())?);
                }
            }
        } else if entry.is_file() {
            self.paths.insert(fs::canonicalize(entry)?);
        } else {
            warn!("Filter {} does not exist and is ignored", entry.display());
        }
        Ok(())
    }

    pub fn insert(&mut self, path: PathBuf) {
        self.paths.insert(path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// What a directive means for the merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Refers to a unit by `key`; `path` is set when the target resolved to a
    /// file on disk.
    Local { key: String, path: Option<PathBuf> },
    /// Resolves to a file the filter set excludes.
    Filtered,
    /// A bracketed directive outside every internal-library rule.
    External,
}

/// A classified include directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub reference: IncludeReference,
    pub disposition: Disposition,
    /// Name of the internal-library rule that matched a bracketed target.
    pub library: Option<String>,
}

/// Classifies include directives against a lookup, a filter set, and the
/// configured internal-library rules.
pub struct IncludeResolver {
    lookup: Box<dyn IncludeLookup>,
    filters: FilterSet,
    libraries: Vec<LibraryRule>,
}

impl IncludeResolver {
    pub fn new(
        lookup: impl IncludeLookup + 'static,
        filters: FilterSet,
        libraries: Vec<LibraryRule>,
    ) -> Self {
        Self {
            lookup: Box::new(lookup),
            filters,
            libraries,
        }
    }

    /// A resolver that knows no files, has no filters and no library rules.
    pub fn empty() -> Self {
        Self::new(HashMap::new(), FilterSet::new(), Vec::new())
    }

    pub fn is_filtered(&self, path: &Path) -> bool {
        self.filters.contains(path)
    }

    /// Recognize and classify the directive on `line` of the file at
    /// `includer`, if any.
    pub fn classify_line(&self, line: &str, includer: &Path) -> Option<Directive> {
        IncludeReference::parse(line).map(|reference| self.classify(reference, includer))
    }

    pub fn classify(&self, reference: IncludeReference, includer: &Path) -> Directive {
        let library = if reference.is_quoted() {
            None
        } else {
            self.libraries
                .iter()
                .find(|rule| rule.matches(&reference.literal_text))
                .map(|rule| rule.name.clone())
        };

        let disposition = if !reference.is_quoted() && library.is_none() {
            Disposition::External
        } else {
            match self
                .lookup
                .lookup(&reference.literal_text, includer.parent())
            {
                Some(path) if self.filters.contains(&path) => Disposition::Filtered,
                Some(path) => Disposition::Local {
                    key: unit_key(&path),
                    path: Some(path),
                },
                None => Disposition::Local {
                    key: target_key(&reference.literal_text).to_string(),
                    path: None,
                },
            }
        };

        trace!("{} -> {:?}", reference.literal_text, disposition);
        Directive {
            reference,
            disposition,
            library,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        fs::canonicalize(path).unwrap()
    }

    #[test]
    fn test_file_index_search_dir_uses_relative_paths() {
        let temp = TempDir::new().unwrap();
        let option = write(temp.path(), "Argos/Option.hpp", "");
        write(temp.path(), "Argos/detail/Util.hpp", "");

        let mut index = FileIndex::new();
        assert_eq!(index.add_search_dir(temp.path()).unwrap(), 2);
        assert!(index.has_search_dirs());
        assert_eq!(index.lookup("Argos/Option.hpp", None), Some(option));
        assert!(index.lookup("Argos/detail/Util.hpp", None).is_some());
        assert!(index.lookup("Option.hpp", None).is_none());
    }

    #[test]
    fn test_file_index_first_search_dir_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let winner = write(first.path(), "x.h", "");
        write(second.path(), "x.h", "");

        let mut index = FileIndex::new();
        index.add_search_dir(first.path()).unwrap();
        assert_eq!(index.add_search_dir(second.path()).unwrap(), 0);
        assert_eq!(index.lookup("x.h", None), Some(winner));
    }

    #[test]
    fn test_file_index_missing_dir_is_error() {
        let temp = TempDir::new().unwrap();
        let mut index = FileIndex::new();
        let err = index.add_search_dir(&temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, Error::Walk { .. }));
    }

    #[test]
    fn test_file_index_inputs_match_by_basename() {
        let mut index = FileIndex::new();
        index.add_input(Path::new("/src/b.h"));
        index.add_input(Path::new("/other/b.h"));
        assert_eq!(index.lookup("b.h", None), Some(PathBuf::from("/src/b.h")));
        assert_eq!(index.lookup("sub/b.h", None), Some(PathBuf::from("/src/b.h")));
        assert!(!index.has_search_dirs());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_file_index_prefers_includer_directory() {
        let temp = TempDir::new().unwrap();
        let own = write(temp.path(), "src/helper.h", "");
        let nested = write(temp.path(), "src/detail/util.h", "");
        let searched = write(temp.path(), "include/helper.h", "");

        let mut index = FileIndex::new();
        index.add_search_dir(&temp.path().join("include")).unwrap();
        let src = temp.path().join("src");
        assert_eq!(index.lookup("helper.h", Some(src.as_path())), Some(own));
        assert_eq!(index.lookup("detail/util.h", Some(src.as_path())), Some(nested));
        assert_eq!(index.lookup("helper.h", None), Some(searched.clone()));
        assert_eq!(
            index.lookup("helper.h", Some(temp.path().join("elsewhere").as_path())),
            Some(searched)
        );
    }

    #[test]
    fn test_file_index_includer_directory_needs_plain_relative_path() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "top.h", "");
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let index = FileIndex::new();
        assert!(index.lookup("../top.h", Some(src.as_path())).is_none());
        assert!(index.lookup("./top.h", Some(temp.path())).is_none());
    }

    #[test]
    fn test_classify_resolves_beside_includer() {
        let temp = TempDir::new().unwrap();
        let main = write(temp.path(), "src/main.cpp", "");
        let helper = write(temp.path(), "src/helper.h", "");

        let resolver = IncludeResolver::new(FileIndex::new(), FilterSet::new(), Vec::new());
        let d = resolver.classify_line("#include \"helper.h\"", &main).unwrap();
        assert_eq!(
            d.disposition,
            Disposition::Local {
                key: "helper.h".to_string(),
                path: Some(helper)
            }
        );

        // bracketed targets stay external without a library rule
        let d = resolver.classify_line("#include <helper.h>", &main).unwrap();
        assert_eq!(d.disposition, Disposition::External);
    }

    #[test]
    fn test_filter_set_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let a = write(temp.path(), "inc/a.h", "");
        let b = write(temp.path(), "inc/deep/b.h", "");
        let c = write(temp.path(), "c.h", "");

        let mut filters = FilterSet::new();
        filters.add(&temp.path().join("inc")).unwrap();
        filters.add(&temp.path().join("c.h")).unwrap();
        filters.add(&temp.path().join("missing.h")).unwrap();

        assert_eq!(filters.len(), 3);
        assert!(filters.contains(&a));
        assert!(filters.contains(&b));
        assert!(filters.contains(&c));
    }

    #[test]
    fn test_classify_quoted_unresolved_is_local_by_basename() {
        let resolver = IncludeResolver::empty();
        let d = resolver
            .classify_line("#include \"detail/common.h\"", Path::new("a.cpp"))
            .unwrap();
        assert_eq!(
            d.disposition,
            Disposition::Local {
                key: "common.h".to_string(),
                path: None
            }
        );
        assert_eq!(d.library, None);
    }

    #[test]
    fn test_classify_bracketed_is_external() {
        let resolver = IncludeResolver::empty();
        let d = resolver
            .classify_line("#include <vector>", Path::new("a.cpp"))
            .unwrap();
        assert_eq!(d.disposition, Disposition::External);
    }

    #[test]
    fn test_classify_library_rule_makes_bracketed_local() {
        let mut files = HashMap::new();
        files.insert(
            "Argos/Option.hpp".to_string(),
            PathBuf::from("/inc/Argos/Option.hpp"),
        );
        let rules = vec![LibraryRule::new("argos", "^Argos/").unwrap()];
        let resolver = IncludeResolver::new(files, FilterSet::new(), rules);

        let d = resolver
            .classify_line("#include <Argos/Option.hpp>", Path::new("a.cpp"))
            .unwrap();
        assert_eq!(d.library.as_deref(), Some("argos"));
        assert_eq!(
            d.disposition,
            Disposition::Local {
                key: "Option.hpp".to_string(),
                path: Some(PathBuf::from("/inc/Argos/Option.hpp"))
            }
        );

        let d = resolver
            .classify_line("#include <string>", Path::new("a.cpp"))
            .unwrap();
        assert_eq!(d.disposition, Disposition::External);
    }

    #[test]
    fn test_classify_filtered() {
        let mut files = HashMap::new();
        files.insert("Argos.hpp".to_string(), PathBuf::from("/inc/Argos.hpp"));
        let mut filters = FilterSet::new();
        filters.insert(PathBuf::from("/inc/Argos.hpp"));
        let resolver = IncludeResolver::new(files, filters, Vec::new());

        let d = resolver
            .classify_line("#include \"Argos.hpp\"", Path::new("a.cpp"))
            .unwrap();
        assert_eq!(d.disposition, Disposition::Filtered);
        assert!(resolver.is_filtered(Path::new("/inc/Argos.hpp")));
    }

    #[test]
    fn test_classify_line_without_directive() {
        let resolver = IncludeResolver::empty();
        assert!(resolver
            .classify_line("int main() {}", Path::new("a.cpp"))
            .is_none());
    }
}
