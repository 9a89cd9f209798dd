use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::Error;
use crate::utils::validation::{
    validate_category, validate_employment_type, validate_experience_level,
    validate_expiration_date, validate_salary, validate_work_place,
};

pub const EMPLOYMENT_TYPES: &[&str] = &["Full Time", "Part Time"];
pub const CATEGORIES: &[&str] = &["Design", "Finance", "Legal", "Government", "Social", "ICT"];
pub const WORK_PLACES: &[&str] = &["On Site", "Remote"];
pub const EXPERIENCE_LEVELS: &[&str] = &["Senior", "Junior", "Internship", "Expert"];

/// Accepts strings, numbers and null for display fields the API is loose about.
fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Int(i) => i.to_string(),
            TextOrNumber::Float(f) => f.to_string(),
            TextOrNumber::Bool(b) => b.to_string(),
        }),
    )
}

fn deserialize_text_flexible<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?.unwrap_or_default())
}

/// A job posting as the jobs API returns it. Read-only on this side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "JobRecordWire")]
pub struct JobRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub category: String,
    pub salary: String,
    #[serde(rename = "experinceLavel")]
    pub experience_level: String,
    pub work_place: String,
    pub expiration_date: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub time_ago: Option<String>,
    pub requirements: Option<String>,
    pub experience: Option<String>,
    pub job_type: Option<String>,
}

/// Lenient shape of one record. Mongo-style documents may carry both `_id`
/// and a virtual `id`, and older records spell the experience key correctly.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JobRecordWire {
    #[serde(rename = "_id", deserialize_with = "deserialize_text_flexible")]
    mongo_id: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    id: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    title: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    company: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    location: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    employment_type: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    category: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    salary: String,
    #[serde(rename = "experinceLavel", deserialize_with = "deserialize_text_flexible")]
    experince_lavel: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    experience_level: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    work_place: String,
    #[serde(deserialize_with = "deserialize_text_flexible")]
    expiration_date: String,
    #[serde(deserialize_with = "deserialize_optional_text")]
    description: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_text")]
    image: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_text")]
    time_ago: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_text")]
    requirements: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_text")]
    experience: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_text")]
    job_type: Option<String>,
}

fn first_non_empty(preferred: String, fallback: String) -> String {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

impl From<JobRecordWire> for JobRecord {
    fn from(wire: JobRecordWire) -> Self {
        Self {
            id: first_non_empty(wire.mongo_id, wire.id),
            title: wire.title,
            company: wire.company,
            location: wire.location,
            employment_type: wire.employment_type,
            category: wire.category,
            salary: wire.salary,
            experience_level: first_non_empty(wire.experince_lavel, wire.experience_level),
            work_place: wire.work_place,
            expiration_date: wire.expiration_date,
            description: wire.description,
            image: wire.image,
            time_ago: wire.time_ago,
            requirements: wire.requirements,
            experience: wire.experience,
            job_type: wire.job_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobField {
    Title,
    Company,
    Location,
    EmploymentType,
    Category,
    Salary,
    ExperienceLevel,
    WorkPlace,
    ExpirationDate,
    Description,
}

impl JobField {
    pub const ALL: [JobField; 10] = [
        JobField::Title,
        JobField::Company,
        JobField::Location,
        JobField::EmploymentType,
        JobField::Category,
        JobField::Salary,
        JobField::ExperienceLevel,
        JobField::WorkPlace,
        JobField::ExpirationDate,
        JobField::Description,
    ];

    /// Form part name expected by the jobs API.
    pub fn wire_name(self) -> &'static str {
        match self {
            JobField::Title => "title",
            JobField::Company => "company",
            JobField::Location => "location",
            JobField::EmploymentType => "employmentType",
            JobField::Category => "category",
            JobField::Salary => "salary",
            JobField::ExperienceLevel => "experinceLavel",
            JobField::WorkPlace => "workPlace",
            JobField::ExpirationDate => "expirationDate",
            JobField::Description => "description",
        }
    }
}

impl fmt::Display for JobField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for JobField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "experienceLevel" | "experience_level" => return Ok(JobField::ExperienceLevel),
            "employment_type" => return Ok(JobField::EmploymentType),
            "work_place" => return Ok(JobField::WorkPlace),
            "expiration_date" => return Ok(JobField::ExpirationDate),
            _ => {}
        }
        JobField::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| Error::BadRequest(format!("Unknown job field: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageAttachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The create-job form state for one editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct JobDraft {
    #[validate(length(min = 1, message = "Job title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(custom(function = "validate_employment_type"))]
    pub employment_type: String,
    #[validate(custom(function = "validate_category"))]
    pub category: String,
    #[validate(custom(function = "validate_salary"))]
    pub salary: String,
    #[validate(custom(function = "validate_experience_level"))]
    pub experience_level: String,
    #[validate(custom(function = "validate_work_place"))]
    pub work_place: String,
    #[validate(custom(function = "validate_expiration_date"))]
    pub expiration_date: String,
    #[validate(length(min = 1, message = "Job description is required"))]
    pub description: String,
    pub image: Option<ImageAttachment>,
}

impl JobDraft {
    pub fn get(&self, field: JobField) -> &str {
        match field {
            JobField::Title => &self.title,
            JobField::Company => &self.company,
            JobField::Location => &self.location,
            JobField::EmploymentType => &self.employment_type,
            JobField::Category => &self.category,
            JobField::Salary => &self.salary,
            JobField::ExperienceLevel => &self.experience_level,
            JobField::WorkPlace => &self.work_place,
            JobField::ExpirationDate => &self.expiration_date,
            JobField::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: JobField, value: String) {
        let slot = match field {
            JobField::Title => &mut self.title,
            JobField::Company => &mut self.company,
            JobField::Location => &mut self.location,
            JobField::EmploymentType => &mut self.employment_type,
            JobField::Category => &mut self.category,
            JobField::Salary => &mut self.salary,
            JobField::ExperienceLevel => &mut self.experience_level,
            JobField::WorkPlace => &mut self.work_place,
            JobField::ExpirationDate => &mut self.expiration_date,
            JobField::Description => &mut self.description,
        };
        *slot = value;
    }

    pub fn fields(&self) -> impl Iterator<Item = (JobField, &str)> + '_ {
        JobField::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}
