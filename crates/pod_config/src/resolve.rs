//! Resolution of the directories a project file refers to.

use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};

/// Absolute locations derived from a project file and its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Directory holding the project file.
    pub root: PathBuf,
    /// Where generated components are written.
    pub components: PathBuf,
    /// Directory of bus descriptor overrides, if configured.
    pub busses: Option<PathBuf>,
}

/// Resolves the configured directories against `root`.
///
/// Absolute paths in the configuration are kept as they are.
pub fn resolve_paths(config: &ProjectConfig, root: &Path) -> ResolvedPaths {
    ResolvedPaths {
        root: root.to_path_buf(),
        components: root.join(&config.project.components),
        busses: config.project.busses.as_ref().map(|dir| root.join(dir)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn relative_dirs_join_the_root() {
        let config = load_config_from_str(
            "[project]\nname = \"demo\"\nbusses = \"busses\"\n",
        )
        .unwrap();
        let paths = resolve_paths(&config, Path::new("/work/demo"));
        assert_eq!(paths.components, Path::new("/work/demo/components"));
        assert_eq!(paths.busses.as_deref(), Some(Path::new("/work/demo/busses")));
    }

    #[test]
    fn absolute_dirs_are_kept() {
        let config = load_config_from_str(
            "[project]\nname = \"demo\"\ncomponents = \"/tmp/out\"\n",
        )
        .unwrap();
        let paths = resolve_paths(&config, Path::new("/work/demo"));
        assert_eq!(paths.components, Path::new("/tmp/out"));
        assert!(paths.busses.is_none());
    }
}
