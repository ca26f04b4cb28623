use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::params::{InsuranceBase, ParameterSnapshot};
use crate::scenarios::ScenarioMultipliers;
use crate::types::{ratio_or_zero, Money, Rate};

/// Cross-border logistics cost for all units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportBreakdown {
    pub domestic_freight: Money,
    pub international_freight: Money,
    pub port_charges: Money,
    pub insurance_base: Money,
    pub insurance: Money,
    pub total: Money,
    /// Transport total relative to the purchase total
    pub transport_ratio: Rate,
}

pub fn calculate_transport(
    p: &ParameterSnapshot,
    m: &ScenarioMultipliers,
    purchase_total: Money,
) -> TransportBreakdown {
    let qty = Decimal::from(p.equipment.quantity);
    let c = &p.crossborder;

    let domestic_freight = c.domestic_freight * qty * m.freight;
    let international_freight = c.international_freight * qty * m.freight;
    let port_charges = c.port_charges * qty;

    let insurance_base = match c.insurance_base {
        InsuranceBase::EquipmentValue => purchase_total,
        InsuranceBase::CifValue => purchase_total + international_freight,
    };
    let insurance = insurance_base * c.insurance_rate;

    let total = domestic_freight + international_freight + port_charges + insurance;

    TransportBreakdown {
        domestic_freight,
        international_freight,
        port_charges,
        insurance_base,
        insurance,
        total,
        transport_ratio: ratio_or_zero(total, purchase_total),
    }
}
