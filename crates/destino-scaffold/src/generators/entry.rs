//! Entry point (`index.{ts,js}`) generator

use super::Artifact;
use crate::config::{Language, ProjectConfig};

pub fn file_name(language: Language) -> String {
    format!("index.{}", language.extension())
}

/// Entry point that starts the framework's server
pub fn render(config: &ProjectConfig) -> Artifact {
    let contents = match config.language {
        Language::TypeScript => "import { createServer } from \"destino\";\n\ncreateServer();\n",
        Language::JavaScript => {
            "const { createServer } = require(\"destino\");\n\ncreateServer();\n"
        }
    };
    Artifact::new(file_name(config.language), contents)
}
