/*!
 * Tests for request/response bodies and error messages
 */

use scriptvox::errors::{ProcessingError, ProviderError, RequestError};
use scriptvox::pipeline::ProcessingResult;
use scriptvox::{FormattedLine, LineAlign, LineStyle, ProcessingMode, RequestBody, ResponseBody};

fn sample_result() -> ProcessingResult {
    ProcessingResult {
        lines: vec![
            FormattedLine::new("CUCINA", LineStyle::AllCaps, LineAlign::Center),
            FormattedLine::blank(),
            FormattedLine::new("un sogno", LineStyle::Italic, LineAlign::Left),
        ],
        audio_text: "CUCINA|||un sogno".to_string(),
        word_count: 3,
        token_count: 3,
        est_seconds: 0.04,
        est_minutes: 0.04 / 60.0,
    }
}

/// Every wire field of a success body is present
#[test]
fn test_successResponse_shouldCarryAllFields() {
    let response: ResponseBody = Ok::<_, ProcessingError>(sample_result()).into();
    let value: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();

    assert!(response.is_success());
    assert_eq!(value["result"].as_array().unwrap().len(), 3);
    assert_eq!(value["result"][0]["style"], "allcaps");
    assert_eq!(value["result"][0]["align"], "center");
    assert_eq!(value["result"][1]["text"], "");
    assert_eq!(value["result"][2]["style"], "italic");
    assert_eq!(value["audio_text"], "CUCINA|||un sogno");
    assert_eq!(value["word_count"], 3);
    assert_eq!(value["token_count"], 3);
    assert!(value["est_seconds"].is_number());
    assert!(value["est_minutes"].is_number());
    assert!(value.get("error").is_none());
}

/// Engine failures keep their message inside the failure body
#[test]
fn test_failureResponse_withEngineError_shouldCarryCause() {
    let error = ProcessingError::from(ProviderError::ConnectionError("refused".to_string()));
    let response: ResponseBody = Err(error).into();

    assert!(!response.is_success());
    let value: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();
    assert_eq!(value["error"], "Processing failed: Connection error: refused");
    assert!(value.get("result").is_none());
}

#[test]
fn test_processingError_withMissingField_shouldNameField() {
    let error = ProcessingError::from(RequestError::MissingField("mode"));
    assert_eq!(error.to_string(), "Processing failed: Missing required field: mode");
}

/// Both body shapes parse back from JSON
#[test]
fn test_responseBody_fromJson_shouldDistinguishVariants() {
    let failure: ResponseBody = serde_json::from_str(r#"{"error": "Processing failed: boom"}"#).unwrap();
    assert!(!failure.is_success());

    let success: ResponseBody = serde_json::from_str(&ResponseBody::from(Ok::<_, ProcessingError>(sample_result())).to_json()).unwrap();
    assert!(success.is_success());
}

#[test]
fn test_requestBody_withUnknownMode_shouldFail() {
    let body = RequestBody::from_json(r#"{"text": "Hi", "mode": "paraphrase"}"#).unwrap();
    assert_eq!(body.into_request(), Err(RequestError::UnknownMode("paraphrase".to_string())));
}

#[test]
fn test_requestBody_withUppercaseMode_shouldParse() {
    let body = RequestBody::from_json(r#"{"text": "Hi", "mode": "SUMMARIZE", "lang": " fr "}"#).unwrap();
    let request = body.into_request().unwrap();

    assert_eq!(request.mode, ProcessingMode::Summarize);
    assert_eq!(request.target_lang, "fr");
}

#[test]
fn test_requestBody_withEmptyLang_shouldDefaultToItalian() {
    let body = RequestBody::from_json(r#"{"text": "Hi", "mode": "translate", "lang": ""}"#).unwrap();
    assert_eq!(body.into_request().unwrap().target_lang, "it");
}

/// Unknown fields are ignored
#[test]
fn test_requestBody_withExtraFields_shouldIgnoreThem() {
    let body = RequestBody::from_json(r#"{"text": "Hi", "mode": "translate", "voice": "alto"}"#).unwrap();
    assert!(body.into_request().is_ok());
}
