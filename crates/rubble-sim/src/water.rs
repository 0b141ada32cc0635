//! Water surface: a 1-D mass-spring chain reacting to explosion impulses.

use rubble_core::constants::*;
use rubble_core::state::WaterView;

#[derive(Debug, Clone, Copy, Default)]
struct Column {
    /// Offset from the rest height (positive = pushed down).
    offset: f64,
    velocity: f64,
}

#[derive(Debug)]
pub struct WaterState {
    pub start_x: f64,
    pub end_x: f64,
    pub surface_y: f64,
    columns: Vec<Column>,
}

impl WaterState {
    pub fn new(start_x: f64, end_x: f64, surface_y: f64) -> Self {
        let count = (((end_x - start_x) / WATER_COLUMN_SPACING) as usize).max(2);
        Self {
            start_x,
            end_x,
            surface_y,
            columns: vec![Column::default(); count],
        }
    }

    /// Whether an explosion at (x, y) is close enough to disturb the water.
    pub fn in_splash_range(&self, x: f64, y: f64) -> bool {
        x >= self.start_x - WATER_SPLASH_REACH
            && x <= self.end_x + WATER_SPLASH_REACH
            && (y - self.surface_y).abs() < 220.0
    }

    /// Shove the nearest column downward.
    pub fn splash(&mut self, x: f64, impulse: f64) {
        let idx = ((x - self.start_x) / WATER_COLUMN_SPACING) as isize;
        let idx = idx.clamp(0, self.columns.len() as isize - 1) as usize;
        self.columns[idx].velocity += impulse;
    }

    /// One tick: spring toward rest, damp, then spread to neighbors.
    pub fn update(&mut self) {
        for col in &mut self.columns {
            col.velocity += -WATER_SPRING_K * col.offset;
            col.velocity *= WATER_DAMPING;
            col.offset += col.velocity;
        }

        let n = self.columns.len();
        let mut left_deltas = vec![0.0; n];
        let mut right_deltas = vec![0.0; n];
        for _ in 0..WATER_SPREAD_PASSES {
            for i in 0..n {
                if i > 0 {
                    left_deltas[i] =
                        WATER_SPREAD * (self.columns[i].offset - self.columns[i - 1].offset);
                    self.columns[i - 1].velocity += left_deltas[i];
                }
                if i + 1 < n {
                    right_deltas[i] =
                        WATER_SPREAD * (self.columns[i].offset - self.columns[i + 1].offset);
                    self.columns[i + 1].velocity += right_deltas[i];
                }
            }
            for i in 0..n {
                if i > 0 {
                    self.columns[i - 1].offset += left_deltas[i];
                }
                if i + 1 < n {
                    self.columns[i + 1].offset += right_deltas[i];
                }
            }
        }
    }

    /// Peak |offset| across the surface (tests and HUD).
    pub fn max_disturbance(&self) -> f64 {
        self.columns
            .iter()
            .map(|c| c.offset.abs())
            .fold(0.0, f64::max)
    }

    pub fn view(&self) -> WaterView {
        WaterView {
            start_x: self.start_x,
            column_spacing: WATER_COLUMN_SPACING,
            heights: self
                .columns
                .iter()
                .map(|c| self.surface_y + c.offset)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splash_propagates_to_neighbors() {
        let mut water = WaterState::new(0.0, 600.0, 500.0);
        water.splash(300.0, 40.0);

        for _ in 0..30 {
            water.update();
        }

        // The disturbance has spread beyond the struck column.
        let disturbed = water
            .view()
            .heights
            .iter()
            .filter(|&&h| (h - 500.0).abs() > 0.5)
            .count();
        assert!(disturbed > 3, "wave should spread, got {disturbed} columns");
    }

    #[test]
    fn test_surface_settles_back_to_rest() {
        let mut water = WaterState::new(0.0, 600.0, 500.0);
        water.splash(150.0, 60.0);

        for _ in 0..4000 {
            water.update();
        }
        assert!(
            water.max_disturbance() < 0.5,
            "surface should damp back to rest, still {}",
            water.max_disturbance()
        );
    }

    #[test]
    fn test_splash_range() {
        let water = WaterState::new(700.0, 1700.0, 616.0);
        assert!(water.in_splash_range(1000.0, 600.0));
        assert!(water.in_splash_range(650.0, 616.0)); // within reach margin
        assert!(!water.in_splash_range(100.0, 616.0));
        assert!(!water.in_splash_range(1000.0, 100.0)); // far above the surface
    }
}
