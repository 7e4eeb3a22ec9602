//! `.gitignore` generator

use super::Artifact;

const GITIGNORE: &str = "# Node modules\nnode_modules/\n";

/// Ignore file excluding the dependency directory; identical for every project
pub fn render() -> Artifact {
    Artifact::new(".gitignore", GITIGNORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignores_node_modules() {
        let artifact = render();
        assert_eq!(artifact.path.to_str(), Some(".gitignore"));
        assert!(artifact.contents.lines().any(|l| l == "node_modules/"));
    }
}
