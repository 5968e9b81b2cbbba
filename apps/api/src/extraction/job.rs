use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::{optional_string, string_list, LenientEnum};
use super::{FieldPath, SchemaKind, ValidationError, Validator};

/// Every field is optional; a job posting is rarely complete.
#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructuredJob {
    pub job_title: Option<String>,
    pub company_profile: Option<CompanyProfile>,
    pub location: Option<JobLocation>,
    pub date_posted: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub job_summary: Option<String>,
    pub key_responsibilities: Option<Vec<String>>,
    pub qualifications: Option<Qualifications>,
    pub compensation_and_benefits: Option<CompensationAndBenefits>,
    pub application_info: Option<ApplicationInfo>,
    pub extracted_keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub remote_status: Option<RemoteStatus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
pub struct Qualifications {
    pub required: Option<Vec<String>>,
    pub preferred: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompensationAndBenefits {
    pub salary_range: Option<String>,
    pub benefits: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
    pub how_to_apply: Option<String>,
    pub apply_link: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
    Temporary,
    #[serde(rename = "Not Specified")]
    NotSpecified,
}

impl LenientEnum for EmploymentType {
    const ALL: &'static [Self] = &[
        Self::FullTime,
        Self::PartTime,
        Self::Contract,
        Self::Internship,
        Self::Temporary,
        Self::NotSpecified,
    ];
    const NOT_SPECIFIED: Self = Self::NotSpecified;

    fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
            Self::Temporary => "Temporary",
            Self::NotSpecified => "Not Specified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum RemoteStatus {
    #[serde(rename = "Fully Remote")]
    FullyRemote,
    Hybrid,
    #[serde(rename = "On-site")]
    OnSite,
    Remote,
    #[serde(rename = "Not Specified")]
    NotSpecified,
    #[serde(rename = "Multiple Locations")]
    MultipleLocations,
}

impl LenientEnum for RemoteStatus {
    const ALL: &'static [Self] = &[
        Self::FullyRemote,
        Self::Hybrid,
        Self::OnSite,
        Self::Remote,
        Self::NotSpecified,
        Self::MultipleLocations,
    ];
    const NOT_SPECIFIED: Self = Self::NotSpecified;

    fn label(self) -> &'static str {
        match self {
            Self::FullyRemote => "Fully Remote",
            Self::Hybrid => "Hybrid",
            Self::OnSite => "On-site",
            Self::Remote => "Remote",
            Self::NotSpecified => "Not Specified",
            Self::MultipleLocations => "Multiple Locations",
        }
    }
}

/// Absent/`null` stays `None`; anything else goes through the lenient match.
fn lenient<E: LenientEnum>(value: Option<&Value>) -> Option<E> {
    match value {
        None | Some(Value::Null) => None,
        some => Some(E::coerce(some)),
    }
}

fn optional_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value {
        None | Some(Value::Null) => None,
        some => Some(string_list(some)),
    }
}

impl StructuredJob {
    /// Scalars and lists coerce, so only a nested section of the wrong JSON
    /// type (or a non-object root) can fail.
    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let mut v = Validator::new(SchemaKind::Job);
        let Some(root) = v.root(raw) else {
            return Err(v.reject());
        };
        let top = FieldPath::root();

        let company_profile = v
            .optional_object(root, &top.key("companyProfile"))
            .map(CompanyProfile::build);
        let location = v
            .optional_object(root, &top.key("location"))
            .map(JobLocation::build);
        let qualifications = v
            .optional_object(root, &top.key("qualifications"))
            .map(|map| Qualifications {
                required: optional_list(map.get("required")),
                preferred: optional_list(map.get("preferred")),
            });
        let compensation_and_benefits = v
            .optional_object(root, &top.key("compensationAndBenefits"))
            .map(|map| CompensationAndBenefits {
                salary_range: optional_string(map.get("salaryRange")),
                benefits: optional_list(map.get("benefits")),
            });
        let application_info = v
            .optional_object(root, &top.key("applicationInfo"))
            .map(|map| ApplicationInfo {
                how_to_apply: optional_string(map.get("howToApply")),
                apply_link: optional_string(map.get("applyLink")),
                contact_email: optional_string(map.get("contactEmail")),
            });

        v.finish(Self {
            job_title: optional_string(root.get("jobTitle")),
            company_profile,
            location,
            date_posted: optional_string(root.get("datePosted")),
            employment_type: lenient(root.get("employmentType")),
            job_summary: optional_string(root.get("jobSummary")),
            key_responsibilities: optional_list(root.get("keyResponsibilities")),
            qualifications,
            compensation_and_benefits,
            application_info,
            extracted_keywords: optional_list(root.get("extractedKeywords")),
        })
    }
}

impl CompanyProfile {
    fn build(map: &Map<String, Value>) -> Self {
        Self {
            company_name: optional_string(map.get("companyName")),
            industry: optional_string(map.get("industry")),
            website: optional_string(map.get("website")),
            description: optional_string(map.get("description")),
        }
    }
}

impl JobLocation {
    fn build(map: &Map<String, Value>) -> Self {
        Self {
            city: optional_string(map.get("city")),
            state: optional_string(map.get("state")),
            country: optional_string(map.get("country")),
            remote_status: lenient(map.get("remoteStatus")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_is_a_valid_job() {
        let job = StructuredJob::from_value(&json!({})).unwrap();
        assert_eq!(job, StructuredJob::default());
    }

    #[test]
    fn test_enum_matching_is_case_insensitive() {
        let job = StructuredJob::from_value(&json!({
            "employmentType": "full-TIME",
            "location": {"remoteStatus": " hybrid "}
        }))
        .unwrap();
        assert_eq!(job.employment_type, Some(EmploymentType::FullTime));
        assert_eq!(job.location.unwrap().remote_status, Some(RemoteStatus::Hybrid));
    }

    #[test]
    fn test_unknown_enum_value_falls_back_to_not_specified() {
        let job = StructuredJob::from_value(&json!({
            "employmentType": "Gig",
            "location": {"remoteStatus": 3}
        }))
        .unwrap();
        assert_eq!(job.employment_type, Some(EmploymentType::NotSpecified));
        assert_eq!(
            job.location.unwrap().remote_status,
            Some(RemoteStatus::NotSpecified)
        );
    }

    #[test]
    fn test_lists_and_scalars_coerce() {
        let job = StructuredJob::from_value(&json!({
            "jobTitle": ["Backend", "Engineer"],
            "keyResponsibilities": "Own the API",
            "qualifications": {"required": ["Rust", 5], "preferred": null},
            "extractedKeywords": ["rust", "  ", "axum"]
        }))
        .unwrap();
        assert_eq!(job.job_title.as_deref(), Some(r#"["Backend","Engineer"]"#));
        assert_eq!(job.key_responsibilities, Some(vec!["Own the API".to_string()]));
        let quals = job.qualifications.unwrap();
        assert_eq!(quals.required, Some(vec!["Rust".to_string(), "5".to_string()]));
        assert_eq!(quals.preferred, None);
        assert_eq!(
            job.extracted_keywords,
            Some(vec!["rust".to_string(), "axum".to_string()])
        );
    }

    #[test]
    fn test_section_of_wrong_type_fails() {
        let err = StructuredJob::from_value(&json!({"companyProfile": "Acme"})).unwrap_err();
        assert_eq!(err.kind, SchemaKind::Job);
        assert_eq!(err.field_errors[0].path, "companyProfile");
    }

    #[test]
    fn test_enum_serializes_with_label() {
        let value = serde_json::to_value(EmploymentType::PartTime).unwrap();
        assert_eq!(value, json!("Part-time"));
        assert_eq!(EmploymentType::PartTime.label(), "Part-time");
    }
}
