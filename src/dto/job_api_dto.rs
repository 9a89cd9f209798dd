use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::Result;
use crate::models::job::{JobDraft, JobRecord};

pub const IMAGE_PART_NAME: &str = "image";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobListEnvelope {
    pub data: Option<JobListData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobListData {
    pub attributes: Vec<JobRecord>,
}

impl JobListEnvelope {
    pub fn into_jobs(self) -> Vec<JobRecord> {
        self.data.map(|data| data.attributes).unwrap_or_default()
    }
}

/// Body returned by the create endpoint. Only `imageUrl` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        file_name: String,
        content_type: String,
        bytes: Bytes,
    },
}

impl FormPart {
    pub fn is_file(&self) -> bool {
        matches!(self, FormPart::File { .. })
    }
}

/// Transport-agnostic description of the multipart create-job request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFormPayload {
    pub parts: Vec<FormPart>,
}

impl JobFormPayload {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if *n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn text_parts(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.parts.iter().filter_map(|part| match part {
            FormPart::Text { name, value } => Some((*name, value.as_str())),
            FormPart::File { .. } => None,
        })
    }

    pub fn file_parts(&self) -> impl Iterator<Item = &FormPart> + '_ {
        self.parts.iter().filter(|part| part.is_file())
    }

    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let part = Part::bytes(bytes.to_vec())
                        .file_name(file_name)
                        .mime_str(&content_type)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

impl From<&JobDraft> for JobFormPayload {
    fn from(draft: &JobDraft) -> Self {
        let mut parts: Vec<FormPart> = draft
            .fields()
            .map(|(field, value)| FormPart::Text {
                name: field.wire_name(),
                value: value.to_string(),
            })
            .collect();

        if let Some(image) = &draft.image {
            parts.push(FormPart::File {
                name: IMAGE_PART_NAME,
                file_name: image.file_name.clone(),
                content_type: image.content_type.clone(),
                bytes: image.bytes.clone(),
            });
        }

        Self { parts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{ImageAttachment, JobField};
    use serde_json::json;

    #[test]
    fn empty_draft_yields_one_text_part_per_field_and_no_file() {
        let payload = JobFormPayload::from(&JobDraft::default());

        assert_eq!(payload.parts.len(), JobField::ALL.len());
        assert_eq!(payload.file_parts().count(), 0);
        assert!(payload.text(IMAGE_PART_NAME).is_none());
        for field in JobField::ALL {
            assert_eq!(payload.text(field.wire_name()), Some(""));
        }
    }

    #[test]
    fn attachment_becomes_image_file_part() {
        let mut draft = JobDraft::default();
        draft.title = "Engineer".to_string();
        draft.image = Some(ImageAttachment::new("logo.png", "image/png", vec![1u8, 2, 3]));

        let payload = JobFormPayload::from(&draft);

        assert_eq!(payload.text("title"), Some("Engineer"));
        let files: Vec<_> = payload.file_parts().collect();
        assert_eq!(files.len(), 1);
        match files[0] {
            FormPart::File {
                name,
                file_name,
                bytes,
                ..
            } => {
                assert_eq!(*name, IMAGE_PART_NAME);
                assert_eq!(file_name, "logo.png");
                assert_eq!(bytes.as_ref(), &[1u8, 2, 3]);
            }
            FormPart::Text { .. } => panic!("expected a file part"),
        }
    }

    #[test]
    fn list_envelope_tolerates_missing_data() {
        let envelope: JobListEnvelope = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.into_jobs().is_empty());

        let envelope: JobListEnvelope = serde_json::from_value(json!({
            "data": { "attributes": [{ "_id": "a", "title": "One" }, { "_id": "b" }] }
        }))
        .unwrap();
        let jobs = envelope.into_jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "One");
    }
}
