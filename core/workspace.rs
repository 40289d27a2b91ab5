use crate::fs_access::locator_to_path;
use log;
use std::path::{Component, Path, PathBuf};

/// Workspace folders used to turn locators into readable paths.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    roots: Vec<PathBuf>,
}

impl Workspace {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn single(root: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![root.into()],
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Path relative to the first root that contains the locator, joined with
    /// `/`. Falls back to the absolute path, or to the raw locator when it is
    /// not a local path at all.
    pub fn relative_display_path(&self, locator: &str) -> String {
        let path = match locator_to_path(locator) {
            Ok(path) => path,
            Err(_) => return locator.to_string(),
        };

        if let Some(relative) = self.relative_to_roots(&path) {
            return relative;
        }
        // roots are canonical, the locator may still run through a symlink
        if let Some(relative) = path
            .canonicalize()
            .ok()
            .and_then(|canonical| self.relative_to_roots(&canonical))
        {
            return relative;
        }
        log::trace!("No workspace root contains {}", path.display());
        path.to_string_lossy().into_owned()
    }

    fn relative_to_roots(&self, path: &Path) -> Option<String> {
        self.roots.iter().find_map(|root| {
            let relative = pathdiff::diff_paths(path, root)?;
            if relative.as_os_str().is_empty() || starts_with_parent(&relative) {
                return None;
            }
            Some(to_slash(&relative))
        })
    }
}

fn starts_with_parent(relative: &Path) -> bool {
    matches!(relative.components().next(), Some(Component::ParentDir))
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_inside_root_is_relative() {
        let ws = Workspace::single("/work/project");
        assert_eq!(
            ws.relative_display_path("/work/project/src/main.rs"),
            "src/main.rs"
        );
        assert_eq!(
            ws.relative_display_path("file:///work/project/docs/read%20me.md"),
            "docs/read me.md"
        );
    }

    #[test]
    fn path_outside_roots_stays_absolute() {
        let ws = Workspace::single("/work/project");
        assert_eq!(ws.relative_display_path("/etc/hosts"), "/etc/hosts");
    }

    #[test]
    fn first_matching_root_wins() {
        let ws = Workspace::new(vec![
            PathBuf::from("/work/other"),
            PathBuf::from("/work/project"),
        ]);
        assert_eq!(ws.relative_display_path("/work/project/a.txt"), "a.txt");
    }

    #[test]
    fn no_roots_means_absolute() {
        let ws = Workspace::default();
        assert_eq!(ws.relative_display_path("/work/a.txt"), "/work/a.txt");
    }

    #[cfg(unix)]
    #[test]
    fn locator_through_symlinked_root_is_relative() {
        use crate::config::Config;
        use std::fs;

        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir_all(real.join("ws/src")).unwrap();
        fs::write(real.join("ws/src/a.rs"), "fn a() {}").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let root = Config::determine_workspace_root(Some(&link.join("ws"))).unwrap();
        let ws = Workspace::single(root);
        let locator = link.join("ws/src/a.rs");
        assert_eq!(ws.relative_display_path(&locator.to_string_lossy()), "src/a.rs");
    }

    #[test]
    fn non_local_locator_is_returned_raw() {
        let ws = Workspace::single("/work");
        assert_eq!(
            ws.relative_display_path("untitled://scratch"),
            "untitled://scratch"
        );
    }
}
