//! `package.json` generator

use super::{to_pretty_json, Artifact};
use crate::config::{Language, ProjectConfig};
use crate::error::Result;
use crate::registry::VersionResolver;
use serde::Serialize;

/// HTTP server library
pub const SERVER_PACKAGE: &str = "express";
/// Framework library
pub const FRAMEWORK_PACKAGE: &str = "destino";
/// Process watcher used by the `dev` script
pub const WATCHER_PACKAGE: &str = "nodemon";
pub const TS_RUNTIME_PACKAGE: &str = "ts-node";
pub const TYPESCRIPT_PACKAGE: &str = "typescript";

const PROJECT_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
struct Scripts {
    start: &'static str,
    dev: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    build: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Dependencies {
    express: String,
    destino: String,
}

#[derive(Debug, Serialize)]
struct DevDependencies {
    nodemon: String,
    #[serde(rename = "ts-node", skip_serializing_if = "Option::is_none")]
    ts_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    typescript: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson<'a> {
    name: &'a str,
    version: &'static str,
    main: String,
    scripts: Scripts,
    dependencies: Dependencies,
    dev_dependencies: DevDependencies,
}

/// Dependency versions pinned into the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersions {
    pub express: String,
    pub destino: String,
    pub nodemon: String,
    /// `ts-node` and `typescript`, only for TypeScript projects
    pub typescript: Option<(String, String)>,
}

impl ResolvedVersions {
    /// Look up every dependency the project needs, one query at a time
    pub async fn resolve<R: VersionResolver>(language: Language, resolver: &R) -> Result<Self> {
        let express = resolver.latest_version(SERVER_PACKAGE).await?;
        let destino = resolver.latest_version(FRAMEWORK_PACKAGE).await?;
        let nodemon = resolver.latest_version(WATCHER_PACKAGE).await?;

        let typescript = if language.is_typescript() {
            let ts_node = resolver.latest_version(TS_RUNTIME_PACKAGE).await?;
            let typescript = resolver.latest_version(TYPESCRIPT_PACKAGE).await?;
            Some((ts_node, typescript))
        } else {
            None
        };

        Ok(Self {
            express,
            destino,
            nodemon,
            typescript,
        })
    }
}

fn caret(version: &str) -> String {
    format!("^{}", version)
}

/// Render the manifest from already resolved versions
pub fn render_with(config: &ProjectConfig, versions: &ResolvedVersions) -> Result<Artifact> {
    let typescript = config.language.is_typescript();

    let scripts = if typescript {
        Scripts {
            start: "node dist/index.js",
            dev: "nodemon",
            build: Some("tsc -p ."),
        }
    } else {
        Scripts {
            start: "node index.js",
            dev: "nodemon",
            build: None,
        }
    };

    let (ts_node, ts) = match (&versions.typescript, typescript) {
        (Some((ts_node, ts)), true) => (Some(caret(ts_node)), Some(caret(ts))),
        _ => (None, None),
    };

    let manifest = PackageJson {
        name: &config.name,
        version: PROJECT_VERSION,
        main: super::entry::file_name(config.language),
        scripts,
        dependencies: Dependencies {
            express: caret(&versions.express),
            destino: caret(&versions.destino),
        },
        dev_dependencies: DevDependencies {
            nodemon: caret(&versions.nodemon),
            ts_node,
            typescript: ts,
        },
    };

    let contents = to_pretty_json("package.json", &manifest)?;
    Ok(Artifact::new("package.json", format!("{}\n", contents)))
}

/// Resolve every dependency version, then render the manifest
///
/// Any failed lookup aborts before anything is rendered.
pub async fn render<R: VersionResolver>(config: &ProjectConfig, resolver: &R) -> Result<Artifact> {
    let versions = ResolvedVersions::resolve(config.language, resolver).await?;
    render_with(config, &versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigurationMode, PackageManager};
    use crate::error::ScaffoldError;
    use crate::registry::FixedVersionResolver;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn resolver() -> FixedVersionResolver {
        FixedVersionResolver::new()
            .with("express", "4.21.2")
            .with("destino", "1.2.0")
            .with("nodemon", "3.1.9")
            .with("ts-node", "10.9.2")
            .with("typescript", "5.7.3")
    }

    fn config(language: Language) -> ProjectConfig {
        ProjectConfig::new("demo", language, ConfigurationMode::Default, PackageManager::Npm)
    }

    #[tokio::test]
    async fn test_typescript_manifest() {
        let artifact = render(&config(Language::TypeScript), &resolver()).await.unwrap();
        assert_eq!(artifact.path.to_str(), Some("package.json"));
        assert!(artifact.contents.ends_with("}\n"));

        let value: Value = serde_json::from_str(&artifact.contents).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "demo",
                "version": "1.0.0",
                "main": "index.ts",
                "scripts": {
                    "start": "node dist/index.js",
                    "dev": "nodemon",
                    "build": "tsc -p ."
                },
                "dependencies": {
                    "express": "^4.21.2",
                    "destino": "^1.2.0"
                },
                "devDependencies": {
                    "nodemon": "^3.1.9",
                    "ts-node": "^10.9.2",
                    "typescript": "^5.7.3"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_javascript_manifest() {
        let artifact = render(&config(Language::JavaScript), &resolver()).await.unwrap();
        let value: Value = serde_json::from_str(&artifact.contents).unwrap();

        assert_eq!(value["main"], json!("index.js"));
        assert_eq!(value["scripts"], json!({ "start": "node index.js", "dev": "nodemon" }));
        assert_eq!(value["devDependencies"], json!({ "nodemon": "^3.1.9" }));
    }

    #[tokio::test]
    async fn test_javascript_skips_typescript_lookups() {
        // Only the three shared packages are configured; a lookup for ts-node would fail
        let resolver = FixedVersionResolver::new()
            .with("express", "4.21.2")
            .with("destino", "1.2.0")
            .with("nodemon", "3.1.9");

        assert!(render(&config(Language::JavaScript), &resolver).await.is_ok());
        assert!(render(&config(Language::TypeScript), &resolver).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_lookup_propagates() {
        let resolver = FixedVersionResolver::new().with("express", "4.21.2");
        let err = render(&config(Language::JavaScript), &resolver)
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::RegistryQuery { ref package, .. } if package == "destino"));
    }

    #[test]
    fn test_key_order_matches_conventional_layout() {
        let versions = ResolvedVersions {
            express: "4.21.2".to_string(),
            destino: "1.2.0".to_string(),
            nodemon: "3.1.9".to_string(),
            typescript: None,
        };
        let contents = render_with(&config(Language::JavaScript), &versions)
            .unwrap()
            .contents;
        let name = contents.find("\"name\"").unwrap();
        let main = contents.find("\"main\"").unwrap();
        let deps = contents.find("\"dependencies\"").unwrap();
        let dev = contents.find("\"devDependencies\"").unwrap();
        assert!(name < main && main < deps && deps < dev);
        assert!(contents.find("\"express\"").unwrap() < contents.find("\"destino\"").unwrap());
    }
}
