use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::params::ParameterSnapshot;
use crate::scenarios::ScenarioMultipliers;
use crate::types::{Currency, Money, Multiple};

/// Currency exposure of the rent stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeExposure {
    pub rent_currency: Currency,
    pub base_rate: Decimal,
    pub multiplier: Multiple,
    /// Rate implied by the scenario FX stress
    pub scenario_rate: Decimal,
    /// Total rent expressed in the rent currency
    pub total_rent_in_rent_currency: Money,
    /// Rent that one volatility move would wipe out
    pub rent_at_risk: Money,
}

pub fn calculate_exchange(
    p: &ParameterSnapshot,
    m: &ScenarioMultipliers,
    total_rent: Money,
) -> ExchangeExposure {
    let base_rate = p.fx.exchange_rate;
    let total_rent_in_rent_currency = if base_rate > Decimal::ZERO {
        total_rent.checked_div(base_rate).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    ExchangeExposure {
        rent_currency: p.fx.rent_currency.clone(),
        base_rate,
        multiplier: m.exchange,
        scenario_rate: base_rate * m.exchange,
        total_rent_in_rent_currency,
        rent_at_risk: total_rent * p.fx.exchange_volatility,
    }
}
