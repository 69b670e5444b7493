//! Site configuration: terms text, branding, metadata, and webhook target.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::media::file_name_from_url;

/// Singleton site configuration document (stored as `terms.json`).
///
/// Keys the server does not know about are preserved in [`extra`](Self::extra)
/// so the admin UI can add settings without a server change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl SiteConfig {
    /// Configuration written the first time the document is read.
    pub fn seeded() -> Self {
        Self {
            title: Some("Terms of Use and Notes".into()),
            content: Some(
                "Enter your terms of use and notes here.\n\n\
                 1. Recorded videos are used for screening purposes only.\n\
                 2. Please take the interview in a quiet environment.\n\
                 3. ..."
                    .into(),
            ),
            ..Self::default()
        }
    }

    /// Branding asset file names that may be served without a session.
    pub fn public_asset_names(&self) -> Vec<&str> {
        [&self.logo_url, &self.og_image_url, &self.favicon_url]
            .into_iter()
            .filter_map(|u| u.as_deref())
            .filter_map(file_name_from_url)
            .collect()
    }

    pub fn is_public_asset(&self, file_name: &str) -> bool {
        self.public_asset_names().contains(&file_name)
    }

    /// Configured webhook URL, ignoring blank values.
    pub fn webhook(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_round_trip() {
        let raw = serde_json::json!({ "title": "T", "brandColor": "#fff" });
        let cfg: SiteConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(cfg.extra["brandColor"], "#fff");
        assert_eq!(serde_json::to_value(&cfg).unwrap(), raw);
    }

    #[test]
    fn public_assets_match_by_file_name() {
        let cfg = SiteConfig {
            logo_url: Some("/api/files/logo-1.png".into()),
            favicon_url: Some("/api/files/fav.ico".into()),
            ..SiteConfig::default()
        };
        assert!(cfg.is_public_asset("logo-1.png"));
        assert!(cfg.is_public_asset("fav.ico"));
        assert!(!cfg.is_public_asset("answer.webm"));
    }

    #[test]
    fn blank_webhook_is_ignored() {
        let cfg = SiteConfig {
            webhook_url: Some("  ".into()),
            ..SiteConfig::default()
        };
        assert_eq!(cfg.webhook(), None);
    }
}
