use super::*;

#[test]
fn test_mapper_error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = MapperError::from(io_err);

    match err {
        MapperError::Io(msg) => assert!(msg.contains("denied")),
        _ => panic!("Expected MapperError::Io"),
    }
}

#[test]
fn test_mapper_error_serialization() {
    let err = MapperError::RuleLoad("duplicate rule id: case_adopt".to_string());

    // MapperError serializes as just its Display string
    let serialized = serde_json::to_string(&err).unwrap();
    assert_eq!(
        serialized,
        "\"Rule load error: duplicate rule id: case_adopt\""
    );
}
