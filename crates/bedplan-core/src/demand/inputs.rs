use super::BedDemandCalculator;
use crate::models::{CropProfile, InputEstimate, Series};

impl BedDemandCalculator {
    /// Seeds, substrate and trays for `series`, from the crop's per-series
    /// constants. Direct-sown crops need no trays.
    pub fn estimate_inputs(&self, crop: &CropProfile, series: &[Series]) -> InputEstimate {
        let profile = &crop.inputs;
        let seed_count = series.len() as u32 * profile.seeds_per_series;
        let seed_weight_g = f64::from(seed_count) * profile.thousand_seed_weight_g / 1000.0;

        let tray_count = if crop.is_nursery_raised() {
            seed_count.div_ceil(profile.cells_per_tray.max(1))
        } else {
            0
        };
        let substrate_litres = f64::from(tray_count) * profile.substrate_litres_per_tray;

        let cost = f64::from(seed_count) / 1000.0 * profile.seed_cost_per_thousand
            + substrate_litres * self.config.inputs.substrate_cost_per_litre;

        InputEstimate {
            seed_count,
            seed_weight_g,
            substrate_litres,
            tray_count,
            cost: (cost * 100.0).round() / 100.0,
        }
    }
}
