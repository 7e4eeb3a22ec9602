//! `tsconfig.json` generator (TypeScript projects only)

use super::{to_pretty_json, Artifact};
use crate::config::ProjectConfig;
use crate::error::Result;
use serde::Serialize;

const FILE_NAME: &str = "tsconfig.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    target: &'static str,
    module: &'static str,
    es_module_interop: bool,
    skip_lib_check: bool,
    force_consistent_casing_in_file_names: bool,
    out_dir: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    compiler_options: CompilerOptions,
    exclude: [&'static str; 2],
}

const TS_CONFIG: TsConfig = TsConfig {
    compiler_options: CompilerOptions {
        target: "ES6",
        module: "commonjs",
        es_module_interop: true,
        skip_lib_check: true,
        force_consistent_casing_in_file_names: true,
        out_dir: "./dist",
    },
    exclude: ["node_modules", "dist"],
};

/// Fixed compiler configuration; `None` for JavaScript projects
pub fn render(config: &ProjectConfig) -> Result<Option<Artifact>> {
    if !config.language.is_typescript() {
        return Ok(None);
    }
    let contents = to_pretty_json(FILE_NAME, &TS_CONFIG)?;
    Ok(Some(Artifact::new(FILE_NAME, format!("{}\n", contents))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigurationMode, Language, PackageManager};
    use pretty_assertions::assert_eq;

    fn config(language: Language) -> ProjectConfig {
        ProjectConfig::new("demo", language, ConfigurationMode::Default, PackageManager::Npm)
    }

    #[test]
    fn test_javascript_has_no_tsconfig() {
        assert!(render(&config(Language::JavaScript)).unwrap().is_none());
    }

    #[test]
    fn test_typescript_tsconfig_contents() {
        let artifact = render(&config(Language::TypeScript)).unwrap().unwrap();
        assert_eq!(artifact.path.to_str(), Some("tsconfig.json"));
        assert_eq!(
            artifact.contents,
            r#"{
  "compilerOptions": {
    "target": "ES6",
    "module": "commonjs",
    "esModuleInterop": true,
    "skipLibCheck": true,
    "forceConsistentCasingInFileNames": true,
    "outDir": "./dist"
  },
  "exclude": [
    "node_modules",
    "dist"
  ]
}
"#
        );
    }
}
