/*!
 * Tests for language resolution utilities.
 */

use laytrans::language_utils::{
    is_cjk_language, is_rtl_language, is_traditional_chinese, lang_code, language_name,
};

#[test]
fn test_langCode_shouldResolveNamesAndCodes() {
    assert_eq!(lang_code("Traditional Chinese"), "zh-tw");
    assert_eq!(lang_code("Simplified Chinese"), "zh-cn");
    assert_eq!(lang_code("Vietnamese"), "vi");
    assert_eq!(lang_code("zh-TW"), "zh-tw");
    assert_eq!(lang_code("JA"), "ja");
}

#[test]
fn test_languageName_shouldResolveFromCodeOrName() {
    assert_eq!(language_name("fr").unwrap(), "French");
    assert_eq!(language_name("Thai").unwrap(), "Thai");
    assert_eq!(language_name("zh-TW").unwrap(), "Traditional Chinese");
}

#[test]
fn test_cjkAndRtlClassification_shouldDriveScriptHandling() {
    assert!(is_cjk_language("Japanese"));
    assert!(is_cjk_language("zh-CN"));
    assert!(!is_cjk_language("German"));

    assert!(is_rtl_language("Arabic"));
    assert!(is_rtl_language("Hebrew"));
    assert!(!is_rtl_language("Thai"));
}

#[test]
fn test_isTraditionalChinese_shouldGateScriptNormalization() {
    assert!(is_traditional_chinese("Traditional Chinese"));
    assert!(is_traditional_chinese("zh-TW"));
    assert!(!is_traditional_chinese("zh-CN"));
    assert!(!is_traditional_chinese("Japanese"));
}
