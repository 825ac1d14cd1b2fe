//! Plan-tier branding decorator
//!
//! Pure post-processing over a compiled specification: free-tier plans get
//! a watermark graphic in the lower-right corner. The input specification is
//! never mutated.

use shared_types::spec::{ChartSpec, WatermarkSpec};
use shared_types::PlanTier;

const WATERMARK_TEXT: &str = "Made with Grid Charts";

pub fn apply_branding(spec: &ChartSpec, tier: PlanTier) -> ChartSpec {
    let mut decorated = spec.clone();
    decorated.graphic = if tier.shows_branding() {
        Some(WatermarkSpec {
            text: WATERMARK_TEXT.to_string(),
            right: "8".to_string(),
            bottom: "8".to_string(),
            opacity: 0.35,
        })
    } else {
        None
    };
    decorated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use config_system::WidgetConfig;
    use shared_types::ChartKind;

    #[test]
    fn test_free_tier_gets_watermark() {
        let spec = compile(ChartKind::Bar, &WidgetConfig::default(), None);
        let branded = apply_branding(&spec, PlanTier::Free);
        assert!(branded.graphic.is_some());
    }

    #[test]
    fn test_paid_tiers_are_clean() {
        let spec = compile(ChartKind::Bar, &WidgetConfig::default(), None);
        assert!(apply_branding(&spec, PlanTier::Pro).graphic.is_none());
        assert!(apply_branding(&spec, PlanTier::Enterprise).graphic.is_none());
    }

    #[test]
    fn test_decorator_does_not_mutate_input() {
        let spec = compile(ChartKind::Pie, &WidgetConfig::default(), None);
        let before = spec.clone();
        let _ = apply_branding(&spec, PlanTier::Free);
        assert_eq!(spec, before);
    }
}
