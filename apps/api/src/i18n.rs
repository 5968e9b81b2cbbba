//! Localized user-facing messages. Every fatal error kind maps to exactly one
//! message per locale; English is the fallback.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

const SUPPORTED: &[(Locale, &str)] = &[(Locale::EnUs, "en-US"), (Locale::ZhCn, "zh-CN")];

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::ZhCn => "zh-CN",
        }
    }

    /// Exact tag match first (case-insensitive), then language prefix, else default.
    pub fn normalize(value: Option<&str>) -> Locale {
        let Some(candidate) = value.map(|v| v.trim().to_lowercase()) else {
            return Locale::default();
        };
        if candidate.is_empty() {
            return Locale::default();
        }

        if let Some((locale, _)) = SUPPORTED
            .iter()
            .find(|(_, tag)| tag.to_lowercase() == candidate)
        {
            return *locale;
        }

        let language = candidate.split(['-', '_']).next().unwrap_or_default();
        SUPPORTED
            .iter()
            .find(|(_, tag)| tag.split('-').next().unwrap_or_default().to_lowercase() == language)
            .map(|(locale, _)| *locale)
            .unwrap_or_default()
    }

    /// First language in an `Accept-Language` header, ignoring q-weights.
    pub fn from_accept_language(header: &str) -> Option<Locale> {
        header
            .split(',')
            .map(|segment| segment.split(';').next().unwrap_or_default().trim())
            .find(|language| !language.is_empty())
            .map(|language| Locale::normalize(Some(language)))
    }

    /// Language name the model is asked to write in.
    pub fn target_language(self) -> &'static str {
        match self {
            Locale::EnUs => "English",
            Locale::ZhCn => "简体中文",
        }
    }
}

pub mod messages {
    use super::Locale;

    pub fn resume_not_found(locale: Locale, resume_id: &str) -> String {
        match locale {
            Locale::EnUs => format!("Resume with ID {resume_id} was not found."),
            Locale::ZhCn => format!("未找到 ID 为 {resume_id} 的简历。"),
        }
    }

    pub fn resume_parsing_failed(locale: Locale, resume_id: &str) -> String {
        match locale {
            Locale::EnUs => format!("Failed to parse resume with ID {resume_id}."),
            Locale::ZhCn => format!("解析 ID 为 {resume_id} 的简历时发生错误。"),
        }
    }

    pub fn resume_keywords_missing(locale: Locale) -> String {
        match locale {
            Locale::EnUs => "Resume keywords are missing. Cannot continue improvement.",
            Locale::ZhCn => "无法提取简历关键词，无法继续优化。",
        }
        .to_string()
    }

    pub fn resume_validation_failed(locale: Locale, details: &str) -> String {
        match locale {
            Locale::EnUs => format!("Resume validation failed: {details}"),
            Locale::ZhCn => format!("简历验证失败：{details}"),
        }
    }

    pub fn resume_no_text(locale: Locale) -> String {
        match locale {
            Locale::EnUs => {
                "Unable to extract text from the document. Ensure it contains readable text."
            }
            Locale::ZhCn => "无法从文档中提取文本，请确认文件包含可解析的文本内容。",
        }
        .to_string()
    }

    pub fn job_not_found(locale: Locale, job_id: &str) -> String {
        match locale {
            Locale::EnUs => format!("Job with ID {job_id} was not found."),
            Locale::ZhCn => format!("未找到 ID 为 {job_id} 的职位。"),
        }
    }

    pub fn job_parsing_failed(locale: Locale, job_id: &str) -> String {
        match locale {
            Locale::EnUs => format!("Failed to parse job with ID {job_id}."),
            Locale::ZhCn => format!("解析 ID 为 {job_id} 的职位时发生错误。"),
        }
    }

    pub fn job_keywords_missing(locale: Locale) -> String {
        match locale {
            Locale::EnUs => "Job keywords are missing. Cannot continue improvement.",
            Locale::ZhCn => "无法提取职位关键词，无法继续优化。",
        }
        .to_string()
    }

    pub fn invalid_token(locale: Locale) -> String {
        match locale {
            Locale::EnUs => "Token for premium models is invalid, expired, or missing.",
            Locale::ZhCn => "高级模型的 Token 无效、过期或缺失。",
        }
        .to_string()
    }

    pub fn invalid_file_type(locale: Locale) -> String {
        match locale {
            Locale::EnUs => "Invalid file type. Only PDF files are allowed.",
            Locale::ZhCn => "文件类型不受支持。仅允许上传 PDF 文件。",
        }
        .to_string()
    }

    pub fn empty_file(locale: Locale) -> String {
        match locale {
            Locale::EnUs => "The uploaded file is empty. Please choose a valid file.",
            Locale::ZhCn => "上传的文件为空，请选择有效的文件。",
        }
        .to_string()
    }

    pub fn pdf_extract_failed(locale: Locale, error: &str) -> String {
        match locale {
            Locale::EnUs => format!("Failed to extract text from PDF file: {error}"),
            Locale::ZhCn => format!("PDF 文件解析失败：{error}"),
        }
    }

    pub fn analysis_fallback_details(locale: Locale) -> String {
        match locale {
            Locale::EnUs => "Analysis could not be generated.",
            Locale::ZhCn => "未能生成分析详情。",
        }
        .to_string()
    }

    pub fn resume_uploaded(locale: Locale) -> &'static str {
        match locale {
            Locale::EnUs => "Resume uploaded successfully.",
            Locale::ZhCn => "简历上传成功。",
        }
    }

    pub fn jobs_uploaded(locale: Locale) -> &'static str {
        match locale {
            Locale::EnUs => "Job descriptions processed successfully.",
            Locale::ZhCn => "职位描述上传成功。",
        }
    }

    pub fn token_generated(locale: Locale) -> &'static str {
        match locale {
            Locale::EnUs => "Token generated successfully.",
            Locale::ZhCn => "令牌生成成功。",
        }
    }

    pub fn stream_start(locale: Locale) -> &'static str {
        match locale {
            Locale::EnUs => "Analyzing resume and job description…",
            Locale::ZhCn => "正在分析简历与职位描述……",
        }
    }

    pub fn stream_complete(locale: Locale) -> &'static str {
        match locale {
            Locale::EnUs => "Analysis complete.",
            Locale::ZhCn => "分析完成。",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_exact_and_case_insensitive() {
        assert_eq!(Locale::normalize(Some("zh-CN")), Locale::ZhCn);
        assert_eq!(Locale::normalize(Some("ZH-cn")), Locale::ZhCn);
        assert_eq!(Locale::normalize(Some("en-us")), Locale::EnUs);
    }

    #[test]
    fn test_normalize_language_prefix() {
        assert_eq!(Locale::normalize(Some("zh-TW")), Locale::ZhCn);
        assert_eq!(Locale::normalize(Some("en_GB")), Locale::EnUs);
    }

    #[test]
    fn test_normalize_falls_back_to_default() {
        assert_eq!(Locale::normalize(None), Locale::EnUs);
        assert_eq!(Locale::normalize(Some("")), Locale::EnUs);
        assert_eq!(Locale::normalize(Some("fr-FR")), Locale::EnUs);
    }

    #[test]
    fn test_accept_language_uses_first_entry() {
        assert_eq!(
            Locale::from_accept_language("zh-CN,zh;q=0.9,en;q=0.8"),
            Some(Locale::ZhCn)
        );
        assert_eq!(Locale::from_accept_language(" , "), None);
    }

    #[test]
    fn test_messages_interpolate_ids() {
        assert!(messages::resume_not_found(Locale::EnUs, "abc").contains("abc"));
        assert!(messages::job_parsing_failed(Locale::ZhCn, "j-1").contains("j-1"));
        assert_eq!(Locale::ZhCn.target_language(), "简体中文");
    }
}
