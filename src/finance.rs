//! General functions related to finance.
use crate::units::{Dimensionless, Energy, Money, MoneyPerEnergy};

/// The discount rate applied to all technologies
pub const DISCOUNT_RATE: Dimensionless = Dimensionless::new(0.08);

/// The factor by which costs and generation in the given year are divided when discounting
pub fn discount_factor(year: u32, discount_rate: Dimensionless) -> Dimensionless {
    (Dimensionless(1.0) + discount_rate).powf(f64::from(year))
}

/// The cash flows of a system over its life.
///
/// All investment happens in year 0, which has no generation. Every following year up to and
/// including `lifetime` has the same generation and O&M cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlows {
    /// Up-front investment cost
    pub investment: Money,
    /// Annual operation and maintenance cost
    pub annual_om: Money,
    /// Fuel (or purchase) cost per unit of generation
    pub fuel_cost: MoneyPerEnergy,
    /// Annual generation
    pub annual_generation: Energy,
    /// System life in years
    pub lifetime: u32,
}

/// Calculates the levelised cost of the given cash flows.
///
/// This is the sum of discounted costs divided by the sum of discounted generation.
pub fn levelised_cost(flows: &CashFlows, discount_rate: Dimensionless) -> MoneyPerEnergy {
    let mut discounted_costs = flows.investment;
    let mut discounted_generation = Energy(0.0);
    let annual_cost = flows.annual_om + flows.fuel_cost * flows.annual_generation;
    for year in 1..=flows.lifetime {
        let factor = discount_factor(year, discount_rate);
        discounted_costs = discounted_costs + annual_cost / factor;
        discounted_generation = discounted_generation + flows.annual_generation / factor;
    }

    discounted_costs / discounted_generation
}
