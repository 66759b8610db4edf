use serde::{Deserialize, Serialize};

/// Envelope wrapping every VK API response.
///
/// VK reports request failures in-band with an HTTP 200 status, so either
/// `response` or `error` is populated, never both.
#[derive(Debug, Deserialize)]
pub struct VkEnvelope<T> {
    pub response: Option<T>,
    pub error: Option<VkApiError>,
}

#[derive(Debug, Deserialize)]
pub struct VkApiError {
    pub error_code: i64,
    pub error_msg: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Likes {
    pub count: u64,
}

/// One available rendition of a photo at a given resolution class.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PhotoVariant {
    #[serde(rename = "type")]
    pub kind: String,
    pub width: u32,
    pub url: String,
}

/// A single photo as returned by `photos.get` with `extended=1` and
/// `photo_sizes=1`. The variant list carries no ordering guarantee.
#[derive(Clone, Debug, Deserialize)]
pub struct PhotoRecord {
    pub likes: Likes,
    pub date: i64,
    pub sizes: Vec<PhotoVariant>,
}

#[derive(Debug, Deserialize)]
pub struct PhotosPage {
    pub items: Vec<PhotoRecord>,
}

/// Response to a Yandex.Disk upload-URL request. The API also returns
/// `method` and `templated` fields, which we don't need.
#[derive(Debug, Deserialize)]
pub struct UploadTicket {
    pub href: Option<String>,
}

/// One manifest entry: a photo selected for backup and its assigned name.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NamedPhoto {
    pub url: String,
    pub file_name: String,
    pub size: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_get_response_parses() {
        let body = r#"{
            "response": [
                {"id": 612144641, "first_name": "Ivan", "last_name": "Petrov", "can_access_closed": true, "is_closed": false}
            ]
        }"#;

        let envelope: VkEnvelope<Vec<UserInfo>> = serde_json::from_str(body).unwrap();
        let users = envelope.response.unwrap();
        assert_eq!(users[0].first_name, "Ivan");
        assert_eq!(users[0].last_name, "Petrov");
        assert!(envelope.error.is_none());
    }

    #[test]
    fn photos_get_response_parses() {
        let body = r#"{
            "response": {
                "count": 2,
                "items": [
                    {
                        "album_id": -6,
                        "date": 1600000000,
                        "id": 457239017,
                        "owner_id": 612144641,
                        "likes": {"count": 3, "user_likes": 0},
                        "reposts": {"count": 0},
                        "sizes": [
                            {"height": 130, "type": "m", "width": 97, "url": "https://sun9-1.example/photo.jpg?size=97x130&quality=95"},
                            {"height": 1620, "type": "w", "width": 1215, "url": "https://sun9-1.example/photo.jpg?size=1215x1620&quality=95"}
                        ],
                        "text": ""
                    },
                    {
                        "album_id": -6,
                        "date": 1600000300,
                        "id": 457239018,
                        "owner_id": 612144641,
                        "likes": {"count": 5, "user_likes": 1},
                        "sizes": [
                            {"height": 86, "type": "s", "width": 75, "url": "https://sun9-2.example/photo.jpg?size=75x86"}
                        ],
                        "text": ""
                    }
                ]
            }
        }"#;

        let envelope: VkEnvelope<PhotosPage> = serde_json::from_str(body).unwrap();
        let page = envelope.response.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].likes.count, 3);
        assert_eq!(page.items[0].sizes[1].kind, "w");
        assert_eq!(page.items[1].date, 1600000300);
    }

    #[test]
    fn vk_error_envelope_parses() {
        let body = r#"{
            "error": {
                "error_code": 5,
                "error_msg": "User authorization failed: invalid access_token.",
                "request_params": []
            }
        }"#;

        let envelope: VkEnvelope<Vec<UserInfo>> = serde_json::from_str(body).unwrap();
        assert!(envelope.response.is_none());
        let error = envelope.error.unwrap();
        assert_eq!(error.error_code, 5);
        assert!(error.error_msg.contains("access_token"));
    }

    #[test]
    fn variant_missing_url_is_rejected() {
        let body = r#"{"type": "m", "width": 130}"#;
        assert!(serde_json::from_str::<PhotoVariant>(body).is_err());
    }

    #[test]
    fn upload_ticket_href_is_optional() {
        let with_href: UploadTicket =
            serde_json::from_str(r#"{"href": "https://uploader.example/upload", "method": "PUT", "templated": false}"#)
                .unwrap();
        assert_eq!(with_href.href.as_deref(), Some("https://uploader.example/upload"));

        let without_href: UploadTicket = serde_json::from_str(r#"{"method": "PUT"}"#).unwrap();
        assert!(without_href.href.is_none());
    }

    #[test]
    fn named_photo_round_trips_manifest_field_names() {
        let entry = NamedPhoto {
            url: "https://sun9-1.example/photo.jpg?size=1215x1620".to_string(),
            file_name: "3.jpg".to_string(),
            size: "w".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["file_name"], "3.jpg");
        assert_eq!(json["size"], "w");
    }
}
