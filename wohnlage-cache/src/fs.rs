//! Directory creation for on-disk databases.

use std::io;
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Create the parent directory of `path` when it does not exist yet.
///
/// Absolute paths are split into the root and a relative remainder because
/// `cap-std` only creates directories relative to an opened one.
pub(crate) fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    Dir::open_ambient_dir(&base, ambient_authority())?.create_dir_all(&relative)
}

fn split_base(parent: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let mut components = parent.as_std_path().components();
    let mut base = Utf8PathBuf::new();
    match components.clone().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            base.push(prefix);
            base.push(std::path::MAIN_SEPARATOR_STR);
            components.next();
            if matches!(components.clone().next(), Some(Component::RootDir)) {
                components.next();
            }
        }
        Some(Component::RootDir) => {
            base.push(std::path::MAIN_SEPARATOR_STR);
            components.next();
        }
        _ => base.push("."),
    }
    let relative = Utf8PathBuf::from_path_buf(components.as_path().to_path_buf())
        .map_err(|_| io::Error::other("non-UTF-8 path"))?;
    Ok((base, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn creates_nested_parents_for_absolute_paths() {
        let temp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 path");
        let target = root.join("a").join("b").join("cache.db");
        ensure_parent_dir(&target).expect("parents created");
        assert!(root.join("a").join("b").is_dir());
    }

    #[rstest]
    #[case("cache.db")]
    #[case("/cache.db")]
    fn parentless_paths_are_left_alone(#[case] path: &str) {
        ensure_parent_dir(Utf8Path::new(path)).expect("nothing to create");
    }

    #[rstest]
    fn splits_absolute_paths_at_the_root() {
        let (base, relative) = split_base(Utf8Path::new("/var/lib/wohnlage")).expect("split");
        assert_eq!(base, Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR));
        assert_eq!(relative, Utf8PathBuf::from("var/lib/wohnlage"));
    }

    #[rstest]
    fn relative_paths_resolve_from_the_working_directory() {
        let (base, relative) = split_base(Utf8Path::new("data/cache")).expect("split");
        assert_eq!(base, Utf8PathBuf::from("."));
        assert_eq!(relative, Utf8PathBuf::from("data/cache"));
    }
}
