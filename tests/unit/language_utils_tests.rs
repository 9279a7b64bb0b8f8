/*!
 * Tests for language utility functions
 */

use yttranscript::language_utils::{
    get_language_name, language_codes_match, normalize_to_part1_or_part2t, normalize_to_part2t,
    preference_matches, primary_subtag, validate_language_code, validate_language_tag, LanguageCodeType,
};

/// Test validation of language codes
#[test]
fn test_validateLanguageCode_withValidCodes_shouldReturnCorrectType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("eng").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);
    assert_eq!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1);

    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("english").is_err());
}

#[test]
fn test_validateLanguageTag_withRegionalTags_shouldCheckPrimarySubtag() {
    assert!(validate_language_tag("en-GB").is_ok());
    assert!(validate_language_tag("pt_BR").is_ok());
    assert!(validate_language_tag("zh-Hans").is_ok());
    assert!(validate_language_tag("").is_err());
    assert!(validate_language_tag("-US").is_err());
    assert!(validate_language_tag("12-US").is_err());
}

#[test]
fn test_normalizeToPart2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("FRE").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert!(normalize_to_part2t("??").is_err());
}

#[test]
fn test_normalizeToPart1OrPart2t_shouldPreferTwoLetterCodes() {
    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
}

#[test]
fn test_primarySubtag_shouldLowercaseAndSplit() {
    assert_eq!(primary_subtag("EN-gb"), "en");
    assert_eq!(primary_subtag("pt_BR"), "pt");
    assert_eq!(primary_subtag("fr"), "fr");
}

#[test]
fn test_languageCodesMatch_acrossCodeTypes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fr", "fre"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "not-a-code"));
}

#[test]
fn test_preferenceMatches_withRegionlessPreference_shouldAcceptVariants() {
    assert!(preference_matches("en", "en"));
    assert!(preference_matches("EN", "en"));
    assert!(preference_matches("en", "en-GB"));
    assert!(preference_matches("en", "eng"));
    assert!(preference_matches("eng", "en-US"));
    assert!(!preference_matches("en", "fr"));
}

#[test]
fn test_preferenceMatches_withRegionalPreference_shouldRequireExactTag() {
    assert!(preference_matches("pt-BR", "pt-br"));
    assert!(!preference_matches("pt-BR", "pt"));
    assert!(!preference_matches("pt-BR", "pt-PT"));
}

#[test]
fn test_preferenceMatches_withUnknownCodes_shouldFallBackToExactComparison() {
    assert!(preference_matches("xx-custom", "XX-CUSTOM"));
    assert!(!preference_matches("xx", "yy"));
}

#[test]
fn test_getLanguageName_withTags_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fr-CA").unwrap(), "French");
    assert!(get_language_name("??").is_err());
}
