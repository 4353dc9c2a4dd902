use std::path::{Component, Path, PathBuf};

/// Remove `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut ret = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match ret.components().next_back() {
                Some(Component::Normal(_)) => {
                    ret.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => ret.push(".."),
            },
            other => ret.push(other.as_os_str()),
        }
    }
    ret
}

pub(crate) fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.to_string_lossy().ends_with(suffix)
}
