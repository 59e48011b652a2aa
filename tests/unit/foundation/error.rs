use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(ShowError::header("x").to_string().contains("header error:"));
    assert!(ShowError::load("x").to_string().contains("load error:"));
    assert!(
        ShowError::structure("x")
            .to_string()
            .contains("structure error:")
    );
    assert!(
        ShowError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ShowError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ShowError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_kind() {
    let err: ShowError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ShowError::Serde(_)));
}
