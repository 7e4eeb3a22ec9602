//! Example route handler generator

use super::{Artifact, ROUTES_DIR};
use crate::config::{Language, ProjectConfig};
use std::path::PathBuf;

const HELLO_TS: &str = r#"import { Request, Response } from 'express';

export function GET(req: Request, res: Response) {
  res.send('Hello Destino!');
}

export function POST(req: Request, res: Response) {
  const { message } = req.body;
  res.status(200).json({ message });
}
"#;

const HELLO_JS: &str = r#"const express = require('express');

function GET(req, res) {
  res.send('Hello Destino!');
}

function POST(req, res) {
  const { message } = req.body;
  res.status(200).json({ message });
}

module.exports = {
  GET,
  POST
};
"#;

/// `routes/hello.{ts,js}` with a GET and a POST handler
pub fn render(config: &ProjectConfig) -> Artifact {
    let contents = match config.language {
        Language::TypeScript => HELLO_TS,
        Language::JavaScript => HELLO_JS,
    };
    let path = PathBuf::from(ROUTES_DIR).join(format!("hello.{}", config.language.extension()));
    Artifact::new(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigurationMode, PackageManager};

    fn render_for(language: Language) -> Artifact {
        render(&ProjectConfig::new(
            "demo",
            language,
            ConfigurationMode::Default,
            PackageManager::Npm,
        ))
    }

    #[test]
    fn test_typescript_route_is_typed_module() {
        let artifact = render_for(Language::TypeScript);
        assert_eq!(artifact.path, PathBuf::from("routes").join("hello.ts"));
        assert!(artifact.contents.contains("import { Request, Response } from 'express';"));
        assert!(artifact.contents.contains("export function GET(req: Request, res: Response)"));
        assert!(artifact.contents.contains("export function POST(req: Request, res: Response)"));
    }

    #[test]
    fn test_javascript_route_uses_require() {
        let artifact = render_for(Language::JavaScript);
        assert_eq!(artifact.path, PathBuf::from("routes").join("hello.js"));
        assert!(artifact.contents.contains("require('express')"));
        assert!(artifact.contents.contains("function GET(req, res)"));
        assert!(artifact.contents.contains("module.exports"));
        assert!(!artifact.contents.contains("Request"));
    }
}
