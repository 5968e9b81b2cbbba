use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{FieldPath, SchemaKind, ValidationError, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct StructuredResume {
    #[serde(rename = "Personal Data")]
    pub personal_data: PersonalData,
    #[serde(rename = "Experiences")]
    pub experiences: Vec<Experience>,
    #[serde(rename = "Projects")]
    pub projects: Vec<Project>,
    #[serde(rename = "Skills")]
    pub skills: Vec<Skill>,
    #[serde(rename = "Research Work", default)]
    pub research_work: Vec<ResearchWork>,
    #[serde(rename = "Achievements", default)]
    pub achievements: Vec<String>,
    #[serde(rename = "Education")]
    pub education: Vec<Education>,
    #[serde(rename = "Extracted Keywords", default)]
    pub extracted_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Location {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Vec<String>,
    #[serde(default)]
    pub technologies_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_name: String,
    pub description: String,
    pub technologies_used: Vec<String>,
    pub link: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub category: String,
    pub skill_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
pub struct ResearchWork {
    pub title: Option<String>,
    pub publication: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub grade: Option<String>,
    pub description: Option<String>,
}

impl StructuredResume {
    /// Builds a resume from extractor output, collecting every failing field.
    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let mut v = Validator::new(SchemaKind::Resume);
        let Some(root) = v.root(raw) else {
            return Err(v.reject());
        };
        let top = FieldPath::root();

        let personal_path = top.key("Personal Data");
        let personal_data = v
            .object(root, &personal_path)
            .map(|map| PersonalData::build(&mut v, map, &personal_path));

        let experiences = v.objects(root, &top.key("Experiences"), true, Experience::build);
        let projects = v.objects(root, &top.key("Projects"), true, Project::build);
        let skills = v.objects(root, &top.key("Skills"), true, Skill::build);
        let research_work =
            v.objects(root, &top.key("Research Work"), false, ResearchWork::build);
        let achievements = v.string_array(root, &top.key("Achievements"), false);
        let education = v.objects(root, &top.key("Education"), true, Education::build);
        let extracted_keywords = v.string_array(root, &top.key("Extracted Keywords"), false);

        // personal_data is only None when an error was already recorded
        match personal_data {
            Some(personal_data) => v.finish(Self {
                personal_data,
                experiences,
                projects,
                skills,
                research_work,
                achievements,
                education,
                extracted_keywords,
            }),
            None => Err(v.reject()),
        }
    }
}

impl PersonalData {
    fn build(v: &mut Validator, map: &Map<String, Value>, path: &FieldPath) -> Self {
        let location_path = path.key("location");
        let location = match v.object(map, &location_path) {
            Some(loc) => Location {
                city: v.coerced_string(loc, &location_path.key("city")),
                country: v.coerced_string(loc, &location_path.key("country")),
            },
            None => Location {
                city: String::new(),
                country: String::new(),
            },
        };

        Self {
            first_name: v.string(map, &path.key("firstName")),
            last_name: v.nullable_string(map, &path.key("lastName")),
            email: v.string(map, &path.key("email")),
            phone: v.string(map, &path.key("phone")),
            linkedin: v.optional_string(map, &path.key("linkedin")),
            portfolio: v.optional_string(map, &path.key("portfolio")),
            location,
        }
    }
}

impl Experience {
    fn build(v: &mut Validator, map: &Map<String, Value>, path: &FieldPath) -> Self {
        Self {
            job_title: v.coerced_string(map, &path.key("jobTitle")),
            company: v.coerced_string(map, &path.key("company")),
            location: v.coerced_string(map, &path.key("location")),
            start_date: v.coerced_string(map, &path.key("startDate")),
            end_date: v.coerced_string(map, &path.key("endDate")),
            description: v.coerced_list(map, &path.key("description")),
            technologies_used: v.string_array(map, &path.key("technologiesUsed"), false),
        }
    }
}

impl Project {
    fn build(v: &mut Validator, map: &Map<String, Value>, path: &FieldPath) -> Self {
        Self {
            project_name: v.string(map, &path.key("projectName")),
            description: v.string(map, &path.key("description")),
            technologies_used: v.string_array(map, &path.key("technologiesUsed"), true),
            link: v.optional_string(map, &path.key("link")),
            start_date: v.optional_string(map, &path.key("startDate")),
            end_date: v.optional_string(map, &path.key("endDate")),
        }
    }
}

impl Skill {
    fn build(v: &mut Validator, map: &Map<String, Value>, path: &FieldPath) -> Self {
        Self {
            category: v.string(map, &path.key("category")),
            skill_name: v.string(map, &path.key("skillName")),
        }
    }
}

impl ResearchWork {
    fn build(v: &mut Validator, map: &Map<String, Value>, path: &FieldPath) -> Self {
        Self {
            title: v.optional_string(map, &path.key("title")),
            publication: v.optional_string(map, &path.key("publication")),
            date: v.optional_string(map, &path.key("date")),
            link: v.optional_string(map, &path.key("link")),
            description: v.optional_string(map, &path.key("description")),
        }
    }
}

impl Education {
    fn build(v: &mut Validator, map: &Map<String, Value>, path: &FieldPath) -> Self {
        Self {
            institution: v.string(map, &path.key("institution")),
            degree: v.string(map, &path.key("degree")),
            field_of_study: v.optional_string(map, &path.key("fieldOfStudy")),
            start_date: v.string(map, &path.key("startDate")),
            end_date: v.string(map, &path.key("endDate")),
            grade: v.optional_string(map, &path.key("grade")),
            description: v.optional_string(map, &path.key("description")),
        }
    }
}
