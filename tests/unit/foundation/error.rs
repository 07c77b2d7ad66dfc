use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CanopyError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CanopyError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        CanopyError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CanopyError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
