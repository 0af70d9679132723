use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BasvidError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(BasvidError::decode("x").to_string().contains("decode error:"));
    assert!(BasvidError::trace("x").to_string().contains("trace error:"));
    assert!(BasvidError::parse("x").to_string().contains("parse error:"));
    assert!(BasvidError::io("x").to_string().contains("io error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BasvidError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
