use sales_forecast::SalesError;
use sales_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let sales_error = SalesError::from(io_error);
    assert!(matches!(sales_error, SalesError::IoError(_)));

    // Test math error conversion
    let math_error = MathError::InsufficientData("need 2 points".to_string());
    let sales_error = SalesError::from(math_error);
    assert!(matches!(sales_error, SalesError::MathError(_)));

    // Test JSON error conversion
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let sales_error = SalesError::from(json_error);
    assert!(matches!(sales_error, SalesError::SerializationError(_)));
}

#[test]
fn test_error_display() {
    let error = SalesError::DataFormatError("1 row(s) have dates not matching".to_string());
    let error_string = format!("{}", error);
    assert!(error_string.starts_with("Data format error"));
    assert!(error_string.contains("dates not matching"));

    let error = SalesError::SchemaError("Required column 'Week' is missing".to_string());
    assert!(error.to_string().contains("'Week'"));

    // Test with source error
    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error = SalesError::from(io_error);
    let error_string = format!("{}", error);

    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_error_creation() {
    let format_error = SalesError::DataFormatError("bad date".to_string());
    let schema_error = SalesError::SchemaError("no Week".to_string());
    let insufficient = SalesError::InsufficientDataError("one month".to_string());

    assert!(matches!(format_error, SalesError::DataFormatError(_)));
    assert!(matches!(schema_error, SalesError::SchemaError(_)));
    assert!(matches!(insufficient, SalesError::InsufficientDataError(_)));

    if let SalesError::InsufficientDataError(msg) = insufficient {
        assert_eq!(msg, "one month");
    } else {
        panic!("Wrong error variant");
    }
}
