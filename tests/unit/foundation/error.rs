use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CmdentError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CmdentError::config("x").to_string().contains("config error:"));
    assert!(CmdentError::asset("x").to_string().contains("asset error:"));
    assert!(
        CmdentError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(CmdentError::io("x").to_string().contains("io error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CmdentError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
