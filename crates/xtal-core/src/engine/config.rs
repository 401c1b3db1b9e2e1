use crate::core::models::reagent::Reagent;
use crate::core::units::value::SignedValue;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// One free axis of the screening grid: the reagent to vary, how many wells
/// to vary it across, the concentration delta per well, and the stock
/// solution it is pipetted from.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub reagent: Reagent,
    pub wells: usize,
    pub step: SignedValue,
    pub stock: SignedValue,
}

/// Configuration of one grid generation call.
///
/// Constructed through [`GridConfigBuilder`]; structural validation beyond
/// presence of parameters happens inside the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub x: AxisSpec,
    pub y: AxisSpec,
    /// Reagents applied uniformly to every well at their configured
    /// concentration. Each must carry a stock concentration.
    pub constants: Vec<Reagent>,
    /// Total liquid capacity of one well.
    pub well_volume: SignedValue,
}

#[derive(Debug, Default)]
pub struct GridConfigBuilder {
    x_reagent: Option<Reagent>,
    x_wells: Option<usize>,
    x_step: Option<SignedValue>,
    x_stock: Option<SignedValue>,
    y_reagent: Option<Reagent>,
    y_wells: Option<usize>,
    y_step: Option<SignedValue>,
    y_stock: Option<SignedValue>,
    constants: Vec<Reagent>,
    well_volume: Option<SignedValue>,
}

impl GridConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x_reagent(mut self, reagent: Reagent) -> Self {
        self.x_reagent = Some(reagent);
        self
    }
    pub fn x_wells(mut self, wells: usize) -> Self {
        self.x_wells = Some(wells);
        self
    }
    pub fn x_step(mut self, step: SignedValue) -> Self {
        self.x_step = Some(step);
        self
    }
    pub fn x_stock(mut self, stock: SignedValue) -> Self {
        self.x_stock = Some(stock);
        self
    }
    pub fn y_reagent(mut self, reagent: Reagent) -> Self {
        self.y_reagent = Some(reagent);
        self
    }
    pub fn y_wells(mut self, wells: usize) -> Self {
        self.y_wells = Some(wells);
        self
    }
    pub fn y_step(mut self, step: SignedValue) -> Self {
        self.y_step = Some(step);
        self
    }
    pub fn y_stock(mut self, stock: SignedValue) -> Self {
        self.y_stock = Some(stock);
        self
    }
    pub fn constant(mut self, reagent: Reagent) -> Self {
        self.constants.push(reagent);
        self
    }
    pub fn well_volume(mut self, volume: SignedValue) -> Self {
        self.well_volume = Some(volume);
        self
    }

    pub fn build(self) -> Result<GridConfig, ConfigError> {
        let x = AxisSpec {
            reagent: self
                .x_reagent
                .ok_or(ConfigError::MissingParameter("x_reagent"))?,
            wells: self.x_wells.ok_or(ConfigError::MissingParameter("x_wells"))?,
            step: self.x_step.ok_or(ConfigError::MissingParameter("x_step"))?,
            stock: self.x_stock.ok_or(ConfigError::MissingParameter("x_stock"))?,
        };
        let y = AxisSpec {
            reagent: self
                .y_reagent
                .ok_or(ConfigError::MissingParameter("y_reagent"))?,
            wells: self.y_wells.ok_or(ConfigError::MissingParameter("y_wells"))?,
            step: self.y_step.ok_or(ConfigError::MissingParameter("y_step"))?,
            stock: self.y_stock.ok_or(ConfigError::MissingParameter("y_stock"))?,
        };
        Ok(GridConfig {
            x,
            y,
            constants: self.constants,
            well_volume: self
                .well_volume
                .ok_or(ConfigError::MissingParameter("well_volume"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> SignedValue {
        SignedValue::parse(text).unwrap()
    }

    #[test]
    fn builder_requires_all_axis_parameters() {
        let result = GridConfigBuilder::new()
            .x_reagent(Reagent::new("Sodium chloride", value("100 mM")))
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("x_wells")));
    }

    #[test]
    fn builder_assembles_a_complete_config() {
        let config = GridConfigBuilder::new()
            .x_reagent(Reagent::new("Sodium chloride", value("100 mM")))
            .x_wells(6)
            .x_step(value("+5 mM"))
            .x_stock(value("1 M"))
            .y_reagent(Reagent::new("PEG 3350", value("25 % w/v")))
            .y_wells(4)
            .y_step(value("-2 % w/v"))
            .y_stock(value("50 % w/v"))
            .constant(Reagent::new("Tris", value("50 mM")))
            .well_volume(value("100 uL"))
            .build()
            .unwrap();

        assert_eq!(config.x.wells, 6);
        assert_eq!(config.y.wells, 4);
        assert_eq!(config.constants.len(), 1);
        assert_eq!(config.well_volume, value("100 uL"));
    }
}
