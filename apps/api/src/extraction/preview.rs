use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::{flat_string, optional_string, string_list};
use super::{FieldPath, SchemaKind, ValidationError, Validator};

/// Display-oriented view of an improved resume.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumePreview {
    pub personal_info: PersonalInfo,
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub education: Vec<EducationItem>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ExperienceItem {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub years: String,
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct EducationItem {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub years: String,
    pub description: Option<String>,
}

impl ResumePreview {
    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let mut v = Validator::new(SchemaKind::ResumePreview);
        let Some(root) = v.root(raw) else {
            return Err(v.reject());
        };
        let top = FieldPath::root();

        let Some(info) = v.object(root, &top.key("personalInfo")) else {
            return Err(v.reject());
        };
        let personal_info = PersonalInfo {
            name: flat_string(info.get("name")),
            title: flat_string(info.get("title")),
            email: flat_string(info.get("email")),
            phone: flat_string(info.get("phone")),
            location: flat_string(info.get("location")),
            website: optional_string(info.get("website")),
            linkedin: optional_string(info.get("linkedin")),
            github: optional_string(info.get("github")),
        };

        let experience = v.objects(root, &top.key("experience"), false, |_, map, _| {
            ExperienceItem {
                id: flat_string(map.get("id")),
                title: flat_string(map.get("title")),
                company: flat_string(map.get("company")),
                location: optional_string(map.get("location")),
                years: flat_string(map.get("years")),
                description: string_list(map.get("description")),
            }
        });
        let education = v.objects(root, &top.key("education"), false, education_item);

        v.finish(Self {
            personal_info,
            summary: optional_string(root.get("summary")),
            experience,
            education,
            skills: string_list(root.get("skills")),
        })
    }
}

fn education_item(_: &mut Validator, map: &Map<String, Value>, _: &FieldPath) -> EducationItem {
    EducationItem {
        id: flat_string(map.get("id")),
        institution: flat_string(map.get("institution")),
        degree: flat_string(map.get("degree")),
        years: flat_string(map.get("years")),
        description: optional_string(map.get("description")),
    }
}
