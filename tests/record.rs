use serialscope::{ParseError, Sample, Schema};

#[test]
fn parses_timestamp_and_values() {
    let schema = Schema::new(2).unwrap();
    let sample = schema.parse_record("10,1.5,2.5").unwrap();
    assert_eq!(
        sample,
        Sample {
            timestamp: 10.0,
            values: vec![1.5, 2.5],
        }
    );
}

#[test]
fn rejects_field_count_mismatch() {
    let schema = Schema::new(2).unwrap();
    assert_eq!(
        schema.parse_record("10,1.5"),
        Err(ParseError::FieldCount {
            expected: 2,
            got: 2
        })
    );
    assert!(matches!(
        schema.parse_record("10,1.5,2.5,3.5"),
        Err(ParseError::FieldCount { .. })
    ));
}

#[test]
fn rejects_bad_timestamp_token() {
    let schema = Schema::new(2).unwrap();
    assert!(matches!(
        schema.parse_record("x,1.5,2.5"),
        Err(ParseError::BadTimestamp { .. })
    ));
}

#[test]
fn rejects_whole_record_on_any_bad_value() {
    // Strict rejection: a malformed token never plots as 0.0.
    let schema = Schema::new(3).unwrap();
    let err = schema.parse_record("10,1.0,oops,3.0").unwrap_err();
    assert_eq!(
        err,
        ParseError::BadValue {
            field: 1,
            token: "oops".to_string()
        }
    );
}

#[test]
fn rejects_non_finite_numbers() {
    let schema = Schema::new(1).unwrap();
    assert!(schema.parse_record("10,inf").is_err());
    assert!(schema.parse_record("10,NaN").is_err());
    assert!(schema.parse_record("nan,1.0").is_err());
}

#[test]
fn tolerates_whitespace_around_tokens() {
    let schema = Schema::new(2).unwrap();
    let sample = schema.parse_record(" 10 , 1.5 ,\t2.5").unwrap();
    assert_eq!(sample.timestamp, 10.0);
    assert_eq!(sample.values, vec![1.5, 2.5]);
}

#[test]
fn accepts_integer_and_float_timestamps() {
    let schema = Schema::new(1).unwrap();
    assert_eq!(schema.parse_record("1000,5").unwrap().timestamp, 1000.0);
    assert_eq!(schema.parse_record("1000.25,5").unwrap().timestamp, 1000.25);
}

#[test]
fn schema_bounds_are_enforced() {
    assert!(Schema::new(0).is_err());
    assert!(Schema::new(9).is_err());
    assert!(Schema::new(1).is_ok());
    assert!(Schema::new(8).is_ok());
}
