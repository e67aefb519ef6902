use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_bytes;

/// A tag attached to one or more images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// One image in the user's gallery, as returned by `GET /images`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    #[serde(rename = "originalFilename")]
    pub original_filename: String,
    #[serde(rename = "thumbnailPath", default)]
    pub thumbnail_path: Option<String>,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(rename = "uploadedAt", default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl ImageRecord {
    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    pub fn size_display(&self) -> String {
        match self.size {
            Some(bytes) => format_bytes(bytes),
            None => "-".to_string(),
        }
    }

    pub fn resolution_display(&self) -> &str {
        self.resolution.as_deref().unwrap_or("-")
    }

    pub fn uploaded_display(&self) -> String {
        match self.uploaded_at {
            Some(dt) => dt.format("%b %d, %Y").to_string(),
            None => "-".to_string(),
        }
    }

    pub fn tags_display(&self) -> String {
        if self.tags.is_empty() {
            "-".to_string()
        } else {
            self.tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_record() {
        let json = r#"{
            "id": 7,
            "originalFilename": "sunset.jpg",
            "thumbnailPath": "user_1/thumb_abc.jpg",
            "mimeType": "image/jpeg",
            "size": 2411724,
            "resolution": "4032x3024",
            "uploadedAt": "2025-06-14T09:30:00Z",
            "tags": [{"id": 3, "name": "2024-10"}]
        }"#;

        let image: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(image.id, 7);
        assert_eq!(image.original_filename, "sunset.jpg");
        assert_eq!(image.mime_type.as_deref(), Some("image/jpeg"));
        assert!(image.has_tag(3));
        assert!(!image.has_tag(4));
        assert_eq!(image.tags_display(), "2024-10");
        assert_eq!(image.uploaded_display(), "Jun 14, 2025");
    }

    #[test]
    fn test_parse_minimal_image_record() {
        // Older uploads may predate thumbnailing and EXIF extraction
        let json = r#"{"id": 1, "originalFilename": "old.png"}"#;
        let image: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(image.size_display(), "-");
        assert_eq!(image.resolution_display(), "-");
        assert_eq!(image.uploaded_display(), "-");
        assert_eq!(image.tags_display(), "-");
    }
}
