//! Catalog of downloadable models, one tagged variant per model family.

use super::entities::{JobSnapshot, JobStatus};
use crate::core::model::JobId;
use serde::{Deserialize, Serialize};

/// Fields shared by every catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCommon {
    pub id: JobId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Human-readable download size (e.g. `"2.4 GB"`).
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub installed: bool,
    /// Last download status known to the server for this entry.
    #[serde(default, rename = "download_status")]
    pub download: Option<JobSnapshot>,
}

/// A text-generation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextModelEntry {
    #[serde(flatten)]
    pub common: CatalogCommon,
    #[serde(default)]
    pub params: Option<String>,
    #[serde(default)]
    pub ram: Option<String>,
    #[serde(default, rename = "supportsVision")]
    pub supports_vision: bool,
    #[serde(default, rename = "supportsThinking")]
    pub supports_thinking: bool,
    #[serde(default, rename = "supportsCode")]
    pub supports_code: bool,
}

/// An image-generation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageModelEntry {
    #[serde(flatten)]
    pub common: CatalogCommon,
    #[serde(default)]
    pub default_width: u32,
    #[serde(default)]
    pub default_height: u32,
    #[serde(default)]
    pub default_steps: u32,
}

/// One entry of the job catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogEntry {
    Text(TextModelEntry),
    Image(ImageModelEntry),
}

impl CatalogEntry {
    pub fn common(&self) -> &CatalogCommon {
        match self {
            CatalogEntry::Text(e) => &e.common,
            CatalogEntry::Image(e) => &e.common,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.common().id
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn is_installed(&self) -> bool {
        self.common().installed
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CatalogEntry::Text(_) => "text",
            CatalogEntry::Image(_) => "image",
        }
    }

    /// Download status if the server reports this entry as in flight.
    pub fn active_download(&self) -> Option<&JobSnapshot> {
        self.common()
            .download
            .as_ref()
            .filter(|s| s.status == JobStatus::Downloading)
    }

    /// Short capability labels for display.
    pub fn capabilities(&self) -> Vec<&'static str> {
        match self {
            CatalogEntry::Image(_) => vec!["image"],
            CatalogEntry::Text(e) => {
                let mut caps = Vec::new();
                if e.supports_vision {
                    caps.push("vision");
                }
                if e.supports_thinking {
                    caps.push("thinking");
                }
                if e.supports_code {
                    caps.push("code");
                }
                if caps.is_empty() {
                    caps.push("text");
                }
                caps
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> serde_json::Value {
        serde_json::json!([
            {
                "type": "text",
                "id": "qwen2.5-3b",
                "name": "Qwen 2.5 3B",
                "size": "2.0 GB",
                "params": "3B",
                "supportsCode": true,
                "installed": false,
                "download_status": {"status": "started", "progress": 3}
            },
            {
                "type": "image",
                "id": "sd-v1-5",
                "name": "Stable Diffusion v1.5",
                "filename": "stable-diffusion-v1-5-Q4_1.gguf",
                "default_width": 512,
                "default_height": 512,
                "default_steps": 20,
                "installed": true,
                "download_status": {"status": "idle", "progress": 0}
            }
        ])
    }

    #[test]
    fn deserializes_both_variants() {
        let entries: Vec<CatalogEntry> = serde_json::from_value(sample()).unwrap();
        assert_eq!(entries.len(), 2);

        let CatalogEntry::Text(text) = &entries[0] else {
            panic!("expected text entry");
        };
        assert!(text.supports_code);
        assert_eq!(text.params.as_deref(), Some("3B"));
        assert_eq!(entries[0].capabilities(), vec!["code"]);

        let CatalogEntry::Image(image) = &entries[1] else {
            panic!("expected image entry");
        };
        assert_eq!(image.default_width, 512);
        assert!(entries[1].is_installed());
        assert_eq!(entries[1].capabilities(), vec!["image"]);
    }

    #[test]
    fn active_download_only_for_in_flight_entries() {
        let entries: Vec<CatalogEntry> = serde_json::from_value(sample()).unwrap();
        assert!(entries[0].active_download().is_some());
        assert!(entries[1].active_download().is_none());
    }

    #[test]
    fn plain_text_model_reports_text_capability() {
        let entry: CatalogEntry = serde_json::from_value(serde_json::json!({
            "type": "text", "id": "tiny", "name": "Tiny"
        }))
        .unwrap();
        assert_eq!(entry.capabilities(), vec!["text"]);
        assert_eq!(entry.kind(), "text");
    }
}
