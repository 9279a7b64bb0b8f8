/*!
 * Tests for video identifier validation
 */

use yttranscript::errors::ErrorKind;
use yttranscript::video_id::VideoId;

#[test]
fn test_parse_withCanonicalId_shouldAccept() {
    let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
    assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    assert_eq!(id.to_string(), "dQw4w9WgXcQ");
}

#[test]
fn test_parse_withTenCharacterId_shouldAccept() {
    let id = VideoId::parse("abc123XYZ9").unwrap();
    assert_eq!(id.as_ref(), "abc123XYZ9");
}

#[test]
fn test_parse_withDashAndUnderscore_shouldAccept() {
    assert!(VideoId::parse("a-b_c-d_e-f").is_ok());
}

#[test]
fn test_parse_withEmptyInput_shouldRejectAsInvalidIdentifier() {
    for input in ["", "   ", "\n\t"] {
        let error = VideoId::parse(input).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidIdentifier);
    }
}

#[test]
fn test_parse_withWrongLength_shouldReject() {
    assert!(VideoId::parse("abc").is_err());
    assert!(VideoId::parse("abc123XYZ").is_err());
    assert!(VideoId::parse("dQw4w9WgXcQQ").is_err());
}

#[test]
fn test_parse_withDisallowedCharacters_shouldReject() {
    for input in ["dQw4w9WgXc!", "dQw4w9 WgXc", "dQw4w9WgXc/", "dQw4w9WgXcé", "../../etc/p"] {
        let error = VideoId::parse(input).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidIdentifier, "input: {}", input);
    }
}

#[test]
fn test_fromStr_shouldMatchParse() {
    let id: VideoId = "dQw4w9WgXcQ".parse().unwrap();
    assert_eq!(id, VideoId::parse("dQw4w9WgXcQ").unwrap());
}

#[test]
fn test_fromUrlOrId_withSupportedUrlShapes_shouldExtractId() {
    let inputs = [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42",
        "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ?t=10",
        "https://www.youtube.com/embed/dQw4w9WgXcQ",
        "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        "www.youtube.com/watch?v=dQw4w9WgXcQ",
        "youtu.be/dQw4w9WgXcQ",
    ];

    for input in inputs {
        let id = VideoId::from_url_or_id(input).unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ", "input: {}", input);
    }
}

#[test]
fn test_fromUrlOrId_withBareId_shouldBehaveLikeParse() {
    assert_eq!(VideoId::from_url_or_id(" dQw4w9WgXcQ ").unwrap().as_str(), "dQw4w9WgXcQ");
    assert!(VideoId::from_url_or_id("not an id").is_err());
}

#[test]
fn test_fromUrlOrId_withForeignOrIncompleteUrl_shouldReject() {
    for input in [
        "https://example.com/watch?v=dQw4w9WgXcQ",
        "https://www.youtube.com/",
        "https://www.youtube.com/watch?v=short",
    ] {
        let error = VideoId::from_url_or_id(input).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidIdentifier, "input: {}", input);
    }
}

#[test]
fn test_serde_shouldValidateOnDeserialize() {
    let id: VideoId = serde_json::from_str("\"dQw4w9WgXcQ\"").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"dQw4w9WgXcQ\"");
    assert!(serde_json::from_str::<VideoId>("\"bad id\"").is_err());
}
