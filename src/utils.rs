use std::path::{Component, Path, PathBuf};

/// Normalizes a manifest `path` into a relative segment that stays under the
/// directory containing the entry.
///
/// Root and prefix components are dropped (`/a/b.txt` becomes `a/b.txt`), `.` is
/// skipped and `..` pops the previous component without ever climbing above the
/// start.
pub fn normalize_entry_path(raw: &str) -> PathBuf {
    let mut new_path = PathBuf::new();

    for component in Path::new(raw).components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}

            Component::ParentDir => {
                new_path.pop();
            }

            Component::Normal(segment) => new_path.push(segment),
        }
    }

    new_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_separator() {
        assert_eq!(normalize_entry_path("/a/b.txt"), PathBuf::from("a/b.txt"));
        assert_eq!(normalize_entry_path("//src"), PathBuf::from("src"));
    }

    #[test]
    fn relative_paths_are_kept() {
        assert_eq!(normalize_entry_path("src/Main.java"), PathBuf::from("src/Main.java"));
        assert_eq!(normalize_entry_path("./src/"), PathBuf::from("src"));
    }

    #[test]
    fn parent_components_never_escape() {
        assert_eq!(normalize_entry_path("../../etc/passwd"), PathBuf::from("etc/passwd"));
        assert_eq!(normalize_entry_path("a/../b"), PathBuf::from("b"));
    }

    #[test]
    fn degenerate_paths_normalize_to_empty() {
        assert!(normalize_entry_path("").as_os_str().is_empty());
        assert!(normalize_entry_path("/").as_os_str().is_empty());
        assert!(normalize_entry_path("./..").as_os_str().is_empty());
    }
}
