use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for target-language handling
///
/// The pipeline accepts both human-readable language names ("Traditional
/// Chinese") and ISO codes ("zh-TW"). This module resolves either form to a
/// canonical code and answers script-family questions (CJK, RTL) that drive
/// sentence splitting and font selection.
/// Map of language names to ISO codes, mirroring the set of targets the
/// pipeline is asked for in practice. Codes not in this table fall through to
/// isolang-based resolution.
const LANG_CODE_MAP: &[(&str, &str)] = &[
    ("English", "en"),
    ("Traditional Chinese", "zh-TW"),
    ("Simplified Chinese", "zh-CN"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Vietnamese", "vi"),
    ("Thai", "th"),
    ("Indonesian", "id"),
    ("Malay", "ms"),
    ("Filipino", "fil"),
    ("Burmese", "my"),
    ("Khmer", "km"),
    ("Lao", "lo"),
    ("Hindi", "hi"),
    ("Bengali", "bn"),
    ("Tamil", "ta"),
    ("Telugu", "te"),
    ("Urdu", "ur"),
    ("French", "fr"),
    ("German", "de"),
    ("Spanish", "es"),
    ("Portuguese", "pt"),
    ("Italian", "it"),
    ("Dutch", "nl"),
    ("Swedish", "sv"),
    ("Norwegian", "no"),
    ("Danish", "da"),
    ("Finnish", "fi"),
    ("Russian", "ru"),
    ("Polish", "pl"),
    ("Ukrainian", "uk"),
    ("Czech", "cs"),
    ("Romanian", "ro"),
    ("Hungarian", "hu"),
    ("Greek", "el"),
    ("Turkish", "tr"),
    ("Arabic", "ar"),
    ("Hebrew", "he"),
    ("Persian", "fa"),
];

/// Resolve a language name or code to a canonical lowercase code.
///
/// Codes ("zh-TW", "ja") pass through lower-cased; known names resolve via
/// the name table; anything else is returned lower-cased as-is so an unknown
/// target still round-trips instead of failing the pipeline.
pub fn lang_code(lang: &str) -> String {
    let trimmed = lang.trim();

    // Already a code: contains a region subtag or is short
    if trimmed.contains('-') || trimmed.len() <= 3 {
        return trimmed.to_lowercase();
    }

    let lower = trimmed.to_lowercase();
    for (name, code) in LANG_CODE_MAP {
        if name.to_lowercase() == lower {
            return code.to_lowercase();
        }
    }

    lower
}

/// Look up the English display name for a language name or code.
pub fn language_name(lang: &str) -> Result<String> {
    let trimmed = lang.trim();
    for (name, code) in LANG_CODE_MAP {
        if name.eq_ignore_ascii_case(trimmed) || code.eq_ignore_ascii_case(trimmed) {
            return Ok((*name).to_string());
        }
    }

    // Strip any region subtag and try ISO lookup
    let base = trimmed.split('-').next().unwrap_or(trimmed).to_lowercase();
    if base.len() == 2 {
        if let Some(language) = Language::from_639_1(&base) {
            return Ok(language.to_name().to_string());
        }
    } else if base.len() == 3 {
        if let Some(language) = Language::from_639_3(&base) {
            return Ok(language.to_name().to_string());
        }
    }

    Err(anyhow!("Unknown language: {}", lang))
}

/// Check whether a language name or code denotes a CJK language.
pub fn is_cjk_language(lang: &str) -> bool {
    let lower = lang.to_lowercase();
    const CJK_INDICATORS: [&str; 8] = [
        "zh", "zh-cn", "zh-tw", "ja", "ko", "chinese", "japanese", "korean",
    ];
    CJK_INDICATORS
        .iter()
        .any(|indicator| lower.starts_with(indicator) || lower.contains(indicator))
}

/// Check whether a target denotes Traditional Chinese.
///
/// Traditional-Chinese output goes through an extra script normalization
/// because the model may emit simplified characters even when asked not to.
pub fn is_traditional_chinese(lang: &str) -> bool {
    let code = lang_code(lang);
    code == "zh-tw" || code == "zh-hant" || lang.to_lowercase().contains("traditional")
}

/// Check whether a language is written right-to-left.
pub fn is_rtl_language(lang: &str) -> bool {
    let code = lang_code(lang);
    let base = code.split('-').next().unwrap_or(&code);
    matches!(base, "ar" | "he" | "fa" | "ur")
}

/// Validate that a bare ISO code is a real 639-1 or 639-3 code.
pub fn validate_language_code(code: &str) -> Result<()> {
    let normalized = code.trim().to_lowercase();
    let base = normalized.split('-').next().unwrap_or(&normalized);

    let known = match base.len() {
        2 => Language::from_639_1(base).is_some(),
        3 => Language::from_639_3(base).is_some(),
        _ => false,
    };

    if known {
        Ok(())
    } else {
        Err(anyhow!("Invalid language code: {}", code))
    }
}
