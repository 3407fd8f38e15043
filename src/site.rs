//! The configuration document that drives the whole page.
//!
//! The document is loaded once at startup and never mutated afterwards; the
//! user-editable texts live in [`crate::content::SiteText`].

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;

/// Location of the configuration document, relative to the page.
pub const CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub site: SiteMeta,
    pub styles: Styles,
    #[serde(default)]
    pub buttons: Vec<ButtonSpec>,
    #[serde(default)]
    pub social_links: Vec<SocialLinkSpec>,
    pub background: BackgroundSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMeta {
    pub title: String,
    pub subtitle: String,
    pub name: String,
    pub username: String,
    pub description: String,
    pub default_title: String,
    #[serde(default)]
    pub title_options: Vec<String>,
    #[serde(default)]
    pub subtitle_options: Vec<String>,
}

/// Percentages in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    pub overlay_opacity: f64,
    pub text_opacity: f64,
    pub button_border_opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ButtonKind {
    Link,
    Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    pub icon: String,
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Browsing context for links, e.g. `_blank`.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub modal_title: Option<String>,
    #[serde(default)]
    pub modal_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLinkSpec {
    pub url: String,
    pub icon: String,
    /// CSS colour class applied to the link.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSource {
    pub api_url: String,
    /// A CSS `background-image` value used when the API is unreachable.
    pub default_background: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not fetch configuration: {0}")]
    Fetch(String),
    #[error("configuration request returned HTTP {0}")]
    Status(u16),
    #[error("could not read configuration file: {0}")]
    Read(#[from] std::io::Error),
    #[error("configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("button `{id}` of type `{kind}` is missing `{field}`")]
    InvalidButton {
        id: String,
        kind: ButtonKind,
        field: &'static str,
    },
}

impl Configuration {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.check_buttons()?;
        Ok(config)
    }

    fn check_buttons(&self) -> Result<(), ConfigError> {
        for button in &self.buttons {
            let missing = match button.kind {
                ButtonKind::Link if button.url.is_none() => Some("url"),
                ButtonKind::Action if button.modal_title.is_none() => Some("modalTitle"),
                ButtonKind::Action if button.modal_content.is_none() => Some("modalContent"),
                _ => None,
            };
            if let Some(field) = missing {
                return Err(ConfigError::InvalidButton {
                    id: button.id.clone(),
                    kind: button.kind,
                    field,
                });
            }
        }
        Ok(())
    }

    /// The page title metadata for a given displayed title.
    pub fn document_title(&self, title: &str) -> String {
        format!("{} | {}", self.site.default_title, title)
    }
}

/// Fetch and parse the configuration document at an absolute URL.
#[cfg(target_family = "wasm")]
pub async fn fetch(url: &str) -> Result<Configuration, ConfigError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| ConfigError::Fetch(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ConfigError::Status(response.status().as_u16()));
    }
    let text = response
        .text()
        .await
        .map_err(|e| ConfigError::Fetch(e.to_string()))?;
    Configuration::parse(&text)
}

/// Load the configuration from a local file, or over HTTP when `source`
/// looks like a URL.
#[cfg(not(target_family = "wasm"))]
pub fn load(source: &str) -> Result<Configuration, ConfigError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let response =
            reqwest::blocking::get(source).map_err(|e| ConfigError::Fetch(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ConfigError::Status(response.status().as_u16()));
        }
        let text = response
            .text()
            .map_err(|e| ConfigError::Fetch(e.to_string()))?;
        return Configuration::parse(&text);
    }
    let text = std::fs::read_to_string(source)?;
    Configuration::parse(&text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"{
        "site": {
            "title": "Hello",
            "subtitle": "World",
            "name": "Jane",
            "username": "@jane",
            "description": "Writes code.",
            "defaultTitle": "Jane's Page",
            "titleOptions": ["A", "B", "C"],
            "subtitleOptions": ["a", "b", "c"]
        },
        "styles": {
            "overlayOpacity": 40,
            "textOpacity": 90,
            "buttonBorderOpacity": 50
        },
        "buttons": [
            { "id": "blog", "type": "link", "icon": "fas fa-blog", "text": "Blog",
              "url": "https://blog.example.com", "target": "_blank" },
            { "id": "about", "type": "action", "icon": "fas fa-user", "text": "About",
              "modalTitle": "About me", "modalContent": "<p>Hi</p>" }
        ],
        "socialLinks": [
            { "url": "https://github.com/jane", "icon": "fab fa-github", "color": "text-gray-200" }
        ],
        "background": {
            "apiUrl": "https://img.example.com/random",
            "defaultBackground": "linear-gradient(#000, #333)"
        }
    }"#;

    pub(crate) fn sample() -> Configuration {
        Configuration::parse(SAMPLE).expect("sample configuration should parse")
    }

    #[test]
    fn test_parse_sample() {
        let config = sample();
        assert_eq!(config.site.default_title, "Jane's Page");
        assert_eq!(config.styles.overlay_opacity, 40.0);
        assert_eq!(config.buttons.len(), 2);
        assert_eq!(config.buttons[0].kind, ButtonKind::Link);
        assert_eq!(config.buttons[0].target.as_deref(), Some("_blank"));
        assert_eq!(config.buttons[1].kind, ButtonKind::Action);
        assert_eq!(config.social_links[0].color, "text-gray-200");
        assert_eq!(config.background.api_url, "https://img.example.com/random");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Configuration::parse("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Configuration::parse(r#"{"site": {}}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_link_without_url_is_rejected() {
        let text = SAMPLE.replace(r#""url": "https://blog.example.com", "#, "");
        match Configuration::parse(&text) {
            Err(ConfigError::InvalidButton { id, field, .. }) => {
                assert_eq!(id, "blog");
                assert_eq!(field, "url");
            }
            other => panic!("expected InvalidButton, got {other:?}"),
        }
    }

    #[test]
    fn test_action_without_modal_fields_is_rejected() {
        let text = SAMPLE.replace(r#""modalContent": "<p>Hi</p>""#, r#""unused": true"#);
        match Configuration::parse(&text) {
            Err(ConfigError::InvalidButton { id, kind, field }) => {
                assert_eq!(id, "about");
                assert_eq!(kind, ButtonKind::Action);
                assert_eq!(field, "modalContent");
            }
            other => panic!("expected InvalidButton, got {other:?}"),
        }

        let text = SAMPLE.replace(r#""modalTitle": "About me", "#, "");
        assert!(matches!(
            Configuration::parse(&text),
            Err(ConfigError::InvalidButton { field: "modalTitle", .. })
        ));
    }

    #[test]
    fn test_document_title() {
        assert_eq!(sample().document_title("X"), "Jane's Page | X");
    }

    #[cfg(not(target_family = "wasm"))]
    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load("/definitely/not/here/config.json"),
            Err(ConfigError::Read(_))
        ));
    }
}
