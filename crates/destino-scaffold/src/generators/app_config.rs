//! `destino.config.{ts,js}` generator

use super::{to_pretty_json, Artifact};
use crate::config::{Language, ProjectConfig, StaticMount};
use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CorsOptions {
    origin: &'static str,
}

#[derive(Debug, Serialize)]
struct Cors {
    options: CorsOptions,
}

#[derive(Debug, Serialize)]
struct RateLimitOptions {
    duration: &'static str,
    max: u32,
    headers: bool,
    message: &'static str,
}

/// Request throttling block emitted when rate limiting is enabled
#[derive(Debug, Serialize)]
struct RateLimitPolicy {
    route: &'static str,
    options: RateLimitOptions,
}

const RATE_LIMIT_POLICY: RateLimitPolicy = RateLimitPolicy {
    route: "/*",
    options: RateLimitOptions {
        duration: "15m",
        max: 100,
        headers: true,
        message: "Limit exceeded",
    },
};

/// Application config object; absent keys are omitted entirely
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    cors: Cors,
    enable_json_parser: bool,
    enable_urlencoded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    serve_static: Option<&'a [StaticMount]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit: Option<&'static RateLimitPolicy>,
}

fn cors() -> Cors {
    Cors {
        options: CorsOptions { origin: "*" },
    }
}

impl<'a> AppConfig<'a> {
    fn default_config() -> Self {
        Self {
            port: None,
            cors: cors(),
            enable_json_parser: true,
            enable_urlencoded: true,
            serve_static: None,
            rate_limit: None,
        }
    }

    fn from_project(config: &'a ProjectConfig) -> Self {
        if !config.is_custom() {
            return Self::default_config();
        }

        Self {
            port: Some(config.port_or_default()),
            cors: cors(),
            enable_json_parser: config.json_parser_or_default(),
            enable_urlencoded: config.urlencoded_or_default(),
            serve_static: config.serve_static.as_deref(),
            rate_limit: config
                .rate_limit_or_default()
                .then_some(&RATE_LIMIT_POLICY),
        }
    }
}

/// Config file name for the project's language
pub fn file_name(language: Language) -> String {
    format!("destino.config.{}", language.extension())
}

/// The config object as JSON text
pub fn render_object(config: &ProjectConfig) -> Result<String> {
    to_pretty_json(&file_name(config.language), &AppConfig::from_project(config))
}

pub fn render(config: &ProjectConfig) -> Result<Artifact> {
    let object = render_object(config)?;
    let contents = match config.language {
        Language::TypeScript => format!(
            "import {{ Config }} from \"destino\";\n\nconst config: Config = {};\n\nexport default config;\n",
            object
        ),
        Language::JavaScript => format!(
            "const config = {};\n\nmodule.exports = config;\n",
            object
        ),
    };
    Ok(Artifact::new(file_name(config.language), contents))
}
