//! Random background image with cached and static fallbacks.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;

use crate::cfg::{PreferenceKey, PreferenceStore, Preferences};

/// Delay between hiding a freshly loaded image and fading it in.
pub const FADE_IN_DELAY: Duration = Duration::from_millis(50);

pub const LOADING_TEXT: &str = "加载中...";
pub const FAILED_TEXT: &str = "加载失败，使用默认背景";
pub const CACHED_TEXT: &str = "使用上次的缓存背景";

/// What the image API answers with. Dimensions are any JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub url: String,
    pub width: f64,
    pub height: f64,
}

impl ImageDescriptor {
    pub fn decode(body: &str) -> Result<Self, FetchError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn dimensions_text(&self) -> String {
        format!("尺寸: {} × {}", self.width, self.height)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("image API returned HTTP {0}")]
    Status(u16),
    #[error("malformed image descriptor: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BackgroundPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundImage {
    /// Nothing applied yet; the page's stylesheet shows through.
    None,
    Url(String),
    /// A raw CSS `background-image` value.
    Css(String),
}

impl BackgroundImage {
    /// The value for the CSS `background-image` property.
    pub fn css_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Url(url) => Some(format!("url('{url}')")),
            Self::Css(css) => Some(css.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub phase: BackgroundPhase,
    pub image: BackgroundImage,
    pub info_text: String,
    pub opacity: f64,
    pub retry_enabled: bool,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            phase: BackgroundPhase::Idle,
            image: BackgroundImage::None,
            info_text: String::new(),
            opacity: 1.0,
            retry_enabled: true,
        }
    }
}

impl Background {
    pub fn begin(&mut self) {
        self.phase = BackgroundPhase::Loading;
        self.info_text = LOADING_TEXT.to_owned();
        self.retry_enabled = false;
    }

    /// Apply a fetched image. The caller is expected to call
    /// [`Background::fade_in`] after [`FADE_IN_DELAY`].
    pub fn succeed<S: PreferenceStore>(
        &mut self,
        descriptor: &ImageDescriptor,
        prefs: &mut Preferences<S>,
    ) {
        self.phase = BackgroundPhase::Success;
        self.image = BackgroundImage::Url(descriptor.url.clone());
        self.info_text = descriptor.dimensions_text();
        self.opacity = 0.0;
        self.retry_enabled = true;
        prefs.set(PreferenceKey::LastBackgroundUrl, &descriptor.url);
    }

    pub fn fail<S: PreferenceStore>(&mut self, default_background: &str, prefs: &Preferences<S>) {
        self.phase = BackgroundPhase::Failed;
        self.retry_enabled = true;
        match prefs.last_background_url() {
            Some(url) => {
                self.image = BackgroundImage::Url(url);
                self.info_text = CACHED_TEXT.to_owned();
            }
            None => {
                self.image = BackgroundImage::Css(default_background.to_owned());
                self.info_text = FAILED_TEXT.to_owned();
            }
        }
    }

    pub fn fade_in(&mut self) {
        self.opacity = 1.0;
    }
}

#[cfg(target_family = "wasm")]
pub async fn fetch(api_url: &str) -> Result<ImageDescriptor, FetchError> {
    let response = reqwest::get(api_url)
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    ImageDescriptor::decode(&body)
}

#[cfg(not(target_family = "wasm"))]
pub fn fetch_blocking(api_url: &str) -> Result<ImageDescriptor, FetchError> {
    let response =
        reqwest::blocking::get(api_url).map_err(|e| FetchError::Transport(e.to_string()))?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }
    let body = response
        .text()
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    ImageDescriptor::decode(&body)
}
