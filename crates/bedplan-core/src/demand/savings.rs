use super::BedDemandCalculator;
use crate::models::{CycleClass, Plan, Savings, SavingsLine};

impl BedDemandCalculator {
    /// Rough estimate of beds saved by growing fast fillers in the idle
    /// windows of long host crops.
    ///
    /// Every host bed counts as one filler window. Each filler with a
    /// configured cap may claim that share of the windows, bounded by its
    /// own bed count. Fillers are not matched against each other, so the
    /// result is an upper bound rather than a feasible allocation.
    pub fn estimate_intercropping_savings(&self, plans: &[Plan]) -> Savings {
        let host_windows: u32 = plans
            .iter()
            .filter(|plan| plan.sizing.cycle_class == CycleClass::Long)
            .map(Plan::beds_needed)
            .sum();

        let lines: Vec<SavingsLine> = plans
            .iter()
            .filter(|plan| plan.sizing.cycle_class == CycleClass::Fast)
            .filter_map(|plan| {
                let cap = *self.config.savings.filler_caps.get(&plan.crop_id)?;
                let claimable = (f64::from(host_windows) * cap).floor().max(0.0) as u32;
                let beds_saved = claimable.min(plan.beds_needed());
                (beds_saved > 0).then(|| SavingsLine {
                    crop_id: plan.crop_id.clone(),
                    cap_fraction: cap,
                    beds_saved,
                    description: format!(
                        "{} fits under up to {:.0}% of {host_windows} host beds: {beds_saved} of its {} beds saved",
                        plan.crop_name,
                        cap * 100.0,
                        plan.beds_needed()
                    ),
                })
            })
            .collect();

        Savings {
            host_windows,
            total_beds_saved: lines.iter().map(|line| line.beds_saved).sum(),
            lines,
        }
    }
}
