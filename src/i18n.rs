use serde::{Deserialize, Serialize};

/// 目标语言类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "en")]
    #[default]
    English,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Chinese => write!(f, "zh"),
            TargetLanguage::English => write!(f, "en"),
            TargetLanguage::Japanese => write!(f, "ja"),
            TargetLanguage::German => write!(f, "de"),
            TargetLanguage::French => write!(f, "fr"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            "ja" | "japanese" | "日本語" | "日文" => Ok(TargetLanguage::Japanese),
            "de" | "german" | "deutsch" | "德文" => Ok(TargetLanguage::German),
            "fr" | "french" | "français" | "法文" => Ok(TargetLanguage::French),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "中文",
            TargetLanguage::English => "English",
            TargetLanguage::Japanese => "日本語",
            TargetLanguage::German => "Deutsch",
            TargetLanguage::French => "Français",
        }
    }

    /// 获取语言的提示词指令，追加在写作类Agent的系统提示词之后
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "请使用中文撰写，确保语言表达准确、专业、易于理解。",
            TargetLanguage::English => {
                "Please write in English, keeping the language accurate, professional and easy to follow."
            }
            TargetLanguage::Japanese => {
                "日本語で執筆してください。正確で専門的かつ分かりやすい表現を心がけてください。"
            }
            TargetLanguage::German => {
                "Bitte schreiben Sie auf Deutsch, präzise, professionell und leicht verständlich."
            }
            TargetLanguage::French => {
                "Veuillez rédiger en français, de manière précise, professionnelle et facile à comprendre."
            }
        }
    }

    /// 获取输出文件名
    pub fn get_output_filename(&self, doc_type: &str) -> String {
        match self {
            TargetLanguage::Chinese => match doc_type {
                "report" => "调研报告.md".to_string(),
                "interviews" => "访谈记录".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::English => match doc_type {
                "report" => "Research-Report.md".to_string(),
                "interviews" => "Interviews".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::Japanese => match doc_type {
                "report" => "調査レポート.md".to_string(),
                "interviews" => "インタビュー".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::German => match doc_type {
                "report" => "Forschungsbericht.md".to_string(),
                "interviews" => "Interviews".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::French => match doc_type {
                "report" => "Rapport-de-Recherche.md".to_string(),
                "interviews" => "Entretiens".to_string(),
                _ => format!("{}.md", doc_type),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_language_from_str() {
        assert_eq!("en".parse::<TargetLanguage>().unwrap(), TargetLanguage::English);
        assert_eq!("中文".parse::<TargetLanguage>().unwrap(), TargetLanguage::Chinese);
        assert_eq!("Deutsch".parse::<TargetLanguage>().unwrap(), TargetLanguage::German);
        assert!("klingon".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn test_output_filenames() {
        assert_eq!(
            TargetLanguage::English.get_output_filename("report"),
            "Research-Report.md"
        );
        assert_eq!(TargetLanguage::Chinese.get_output_filename("interviews"), "访谈记录");
        assert_eq!(TargetLanguage::French.get_output_filename("other"), "other.md");
    }
}
