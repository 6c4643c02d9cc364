use classroom_assistant::application::ports::RecognitionError;
use classroom_assistant::infrastructure::audio::parse_recognize_response;

#[test]
fn given_single_result_when_parsing_then_returns_top_alternative() {
    let body = br#"{
        "results": [
            {"alternatives": [
                {"transcript": "the mitochondria is the powerhouse", "confidence": 0.93},
                {"transcript": "the mitochondria is the power house", "confidence": 0.41}
            ]}
        ]
    }"#;

    let text = parse_recognize_response(body).unwrap();

    assert_eq!(text, "the mitochondria is the powerhouse");
}

#[test]
fn given_several_results_when_parsing_then_joins_them_in_order() {
    let body = br#"{"results": [
        {"alternatives": [{"transcript": "first sentence "}]},
        {"alternatives": [{"transcript": " second sentence"}]}
    ]}"#;

    assert_eq!(
        parse_recognize_response(body).unwrap(),
        "first sentence second sentence"
    );
}

#[test]
fn given_empty_object_when_parsing_then_not_understood() {
    let err = parse_recognize_response(b"{}").unwrap_err();

    assert!(matches!(err, RecognitionError::NotUnderstood));
}

#[test]
fn given_results_without_alternatives_when_parsing_then_not_understood() {
    let body = br#"{"results": [{"alternatives": []}], "totalBilledTime": "1s"}"#;

    assert!(matches!(
        parse_recognize_response(body),
        Err(RecognitionError::NotUnderstood)
    ));
}

#[test]
fn given_non_json_body_when_parsing_then_request_failed() {
    let err = parse_recognize_response(b"<html>502</html>").unwrap_err();

    assert!(matches!(err, RecognitionError::RequestFailed(_)));
}
