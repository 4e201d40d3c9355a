use super::*;

use crate::export::encode::RasterFormat;

/// Tier set that fails a scripted number of attempts before succeeding.
struct ScriptedTiers {
    failures: usize,
    calls: Vec<FallbackStage>,
}

impl ScriptedTiers {
    fn failing(failures: usize) -> Self {
        Self {
            failures,
            calls: Vec::new(),
        }
    }
}

impl ExportTiers for ScriptedTiers {
    fn attempt(&mut self, stage: FallbackStage) -> SceneprintResult<RasterResult> {
        self.calls.push(stage);
        if self.calls.len() <= self.failures {
            return Err(SceneprintError::surface_creation("scripted failure"));
        }
        Ok(RasterResult {
            bytes: vec![1, 2, 3],
            format: RasterFormat::Png,
            width: 1,
            height: 1,
        })
    }
}

#[test]
fn stage_transitions_are_strictly_ordered() {
    assert_eq!(FallbackStage::Primary.next(), Some(FallbackStage::Secondary));
    assert_eq!(
        FallbackStage::Secondary.next(),
        Some(FallbackStage::Tertiary)
    );
    assert_eq!(FallbackStage::Tertiary.next(), None);
}

#[test]
fn primary_success_attempts_nothing_else() {
    let mut tiers = ScriptedTiers::failing(0);
    run_export_chain(&mut tiers).unwrap();
    assert_eq!(tiers.calls, vec![FallbackStage::Primary]);
}

#[test]
fn primary_failure_degrades_to_secondary() {
    let mut tiers = ScriptedTiers::failing(1);
    run_export_chain(&mut tiers).unwrap();
    assert_eq!(
        tiers.calls,
        vec![FallbackStage::Primary, FallbackStage::Secondary]
    );
}

#[test]
fn secondary_failure_degrades_to_tertiary() {
    let mut tiers = ScriptedTiers::failing(2);
    run_export_chain(&mut tiers).unwrap();
    assert_eq!(
        tiers.calls,
        vec![
            FallbackStage::Primary,
            FallbackStage::Secondary,
            FallbackStage::Tertiary,
        ]
    );
}

#[test]
fn tertiary_failure_is_terminal() {
    let mut tiers = ScriptedTiers::failing(3);
    let err = run_export_chain(&mut tiers).unwrap_err();
    assert!(matches!(err, SceneprintError::ExportUnavailable(_)));
    assert!(err.to_string().contains("scripted failure"));
    assert_eq!(tiers.calls.len(), 3);
}
