use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MorphError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MorphError::dimension_mismatch("x")
            .to_string()
            .contains("dimension mismatch:")
    );
    assert!(MorphError::encoder("x").to_string().contains("encoder error:"));
    assert!(MorphError::storage("x").to_string().contains("storage error:"));
    assert_eq!(MorphError::Cancelled.to_string(), "run cancelled");
}

#[test]
fn decode_error_names_the_file() {
    let err = MorphError::decode(Path::new("shots/b.jpg"), "truncated");
    let msg = err.to_string();
    assert!(msg.contains("shots/b.jpg"));
    assert!(msg.contains("truncated"));
}

#[test]
fn empty_input_names_the_directory() {
    let err = MorphError::EmptyInput(PathBuf::from("holiday"));
    assert!(err.to_string().contains("'holiday'"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MorphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
