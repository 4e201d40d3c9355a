use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SceneprintError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SceneprintError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        SceneprintError::degenerate_bounds("x")
            .to_string()
            .contains("degenerate bounds:")
    );
    assert!(
        SceneprintError::rasterization_blocked("x")
            .to_string()
            .contains("rasterization blocked:")
    );
    assert!(
        SceneprintError::surface_creation("x")
            .to_string()
            .contains("surface creation failed:")
    );
    assert!(
        SceneprintError::export_unavailable("x")
            .to_string()
            .contains("export unavailable:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SceneprintError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
