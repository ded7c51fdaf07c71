use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Descriptive manifest for a post, as validated by the identity service and
/// committed to addressed storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub app_id: String,
    pub attributes: Vec<Attribute>,
    pub content: String,
    pub name: String,
    pub main_content_focus: MainContentFocus,
    pub media: Vec<MediaItem>,
    pub locale: String,
    /// Fresh per run. The remote schema spells this field in snake case.
    #[serde(rename = "metadata_id")]
    pub metadata_id: Uuid,
    pub tags: BTreeSet<String>,
    pub version: String,
}

impl Manifest {
    /// Manifest for a single transcoded video.
    ///
    /// Everything except `metadata_id` is derived from the inputs and `defaults`.
    pub fn for_video(defaults: &ManifestDefaults, content: &str, playback_url: &str) -> Self {
        Self {
            app_id: defaults.app_id.clone(),
            attributes: vec![Attribute {
                display_type: "string".to_string(),
                trait_type: defaults.attribute_trait.clone(),
                value: defaults.attribute_value.clone(),
            }],
            content: format!("{}{}", content, defaults.attribution),
            name: defaults.name.clone(),
            main_content_focus: MainContentFocus::Video,
            media: vec![MediaItem {
                item: playback_url.to_string(),
                mime_type: defaults.media_type.clone(),
                alt_tag: defaults.alt_tag.clone(),
                cover: defaults.cover.clone(),
            }],
            locale: defaults.locale.clone(),
            metadata_id: Uuid::new_v4(),
            tags: defaults.tags.clone(),
            version: defaults.version.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub display_type: String,
    pub trait_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub item: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub alt_tag: String,
    pub cover: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MainContentFocus {
    Video,
    Image,
    Audio,
    Article,
    TextOnly,
}

/// Fixed parts of every manifest this app publishes.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct ManifestDefaults {
    #[builder(default = String::from("lenster"), setter(into))]
    pub app_id: String,
    #[builder(default = String::from("Hello World"), setter(into))]
    pub name: String,
    /// Appended to the user's text.
    #[builder(default = String::from("\n via @safeupload.test "), setter(into))]
    pub attribution: String,
    #[builder(default = String::from("Created with"), setter(into))]
    pub attribute_trait: String,
    #[builder(default = String::from("LensClient SDK"), setter(into))]
    pub attribute_value: String,
    #[builder(default = String::from("video/mp4"), setter(into))]
    pub media_type: String,
    #[builder(default = String::from("A sample video media"), setter(into))]
    pub alt_tag: String,
    #[builder(default = String::from(DEFAULT_COVER_URL), setter(into))]
    pub cover: String,
    #[builder(default = String::from("en-US"), setter(into))]
    pub locale: String,
    #[builder(default = BTreeSet::from([String::from("lens-sdk")]))]
    pub tags: BTreeSet<String>,
    #[builder(default = String::from("2.0.0"), setter(into))]
    pub version: String,
}

impl Default for ManifestDefaults {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub const DEFAULT_COVER_URL: &str = "https://ik.imagekit.io/lens/media-snapshot/d5c5ea74cc7abc253c92ba1dc50583791ef2f761a289818ff9a849a757b3629c.png";

/// Remote validator verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataValidation {
    pub valid: bool,
    #[serde(default, alias = "reason", skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

impl MetadataValidation {
    pub fn valid() -> Self {
        Self {
            valid: true,
            diagnostics: None,
        }
    }

    pub fn invalid(diagnostics: impl Into<String>) -> Self {
        Self {
            valid: false,
            diagnostics: Some(diagnostics.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_serializes_remote_field_names() {
        let manifest = Manifest::for_video(&ManifestDefaults::default(), "hi", "https://x/v.m3u8");
        let json = serde_json::to_value(&manifest).unwrap();

        assert_eq!(json["appId"], "lenster");
        assert_eq!(json["mainContentFocus"], "VIDEO");
        assert_eq!(json["media"][0]["type"], "video/mp4");
        assert_eq!(json["media"][0]["altTag"], "A sample video media");
        assert_eq!(json["attributes"][0]["traitType"], "Created with");
        assert_eq!(json["metadata_id"], manifest.metadata_id.to_string());
        assert_eq!(json["tags"], serde_json::json!(["lens-sdk"]));
    }

    #[test]
    fn test_content_gets_attribution_suffix() {
        let manifest = Manifest::for_video(&ManifestDefaults::default(), "gm", "https://x/v.m3u8");
        assert_eq!(manifest.content, "gm\n via @safeupload.test ");
        assert_eq!(manifest.media.len(), 1);
        assert_eq!(manifest.media[0].item, "https://x/v.m3u8");
        assert_eq!(manifest.media[0].cover, DEFAULT_COVER_URL);
    }

    #[test]
    fn test_defaults_builder_overrides() {
        let defaults = ManifestDefaults::builder()
            .app_id("safeupload")
            .locale("fr-FR")
            .build();
        assert_eq!(defaults.app_id, "safeupload");
        assert_eq!(defaults.locale, "fr-FR");
        assert_eq!(defaults.version, "2.0.0");
    }

    #[test]
    fn test_validation_accepts_reason_alias() {
        let parsed: MetadataValidation =
            serde_json::from_value(serde_json::json!({"valid": false, "reason": "media missing"}))
                .unwrap();
        assert_eq!(parsed, MetadataValidation::invalid("media missing"));
    }
}
