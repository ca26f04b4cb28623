use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::scenarios::multipliers::ScenarioName;
use crate::types::{Currency, Money, Rate};

// ---------------------------------------------------------------------------
// Enumerated choices
// ---------------------------------------------------------------------------

/// Customs valuation basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxBasis {
    /// Cost, insurance and freight: international freight and insurance
    /// may be added to the dutiable value
    #[default]
    Cif,
    /// Free on board: equipment value only
    Fob,
}

/// Value the cargo insurance premium is charged on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsuranceBase {
    #[default]
    EquipmentValue,
    /// Equipment value plus international freight
    CifValue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    /// Own funds, partly advanced and carried at a capital cost
    #[default]
    Full,
    /// Down payment plus a financed balance
    Financing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentMethod {
    /// Level monthly installments
    #[default]
    Equal,
    /// Principal and all interest in one payment at maturity
    Bullet,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessMode {
    #[default]
    Lease,
    /// Lease for the term, then sell the equipment to the lessee
    LeaseToSell,
}

// ---------------------------------------------------------------------------
// Parameter groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentParams {
    pub quantity: u32,
    /// Unit purchase price in settlement currency
    pub purchase_price: Money,
    /// Economic life in years, used for straight-line depreciation
    pub economic_life: u32,
    pub residual_value_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueParams {
    /// Per unit, per month
    pub monthly_rent: Money,
    /// Per unit, charged once at delivery
    pub installation_fee: Money,
    /// Per unit, per year
    pub maintenance_service_fee: Money,
    /// Lease term in months
    pub lease_term: u32,
    /// Per unit sale price at the end of a lease-to-sell deal
    pub end_sale_price: Money,
    pub disposal_fee_rate: Rate,
}

/// Cross-border logistics costs. Amounts are per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossborderParams {
    pub domestic_freight: Money,
    pub international_freight: Money,
    pub port_charges: Money,
    pub insurance_rate: Rate,
    pub insurance_base: InsuranceBase,
    pub customs_agent_fee: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxParams {
    pub tax_basis: TaxBasis,
    pub tariff_rate: Rate,
    pub vat_rate: Rate,
    pub tariff_exempt: bool,
    pub vat_deductible: bool,
    /// Share of import VAT recoverable as input credit
    pub vat_deduct_rate: Rate,
    pub include_freight_in_dutiable: bool,
    pub include_insurance_in_dutiable: bool,
}

/// Annual operating costs per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingParams {
    pub annual_maintenance: Money,
    pub local_parts: Money,
    pub local_service_fee: Money,
    pub other_operating_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingParams {
    pub payment_mode: PaymentMode,
    /// Full mode: share of the purchase funded by advanced capital
    pub purchase_advance_rate: Rate,
    /// Full mode: share of freight and taxes funded by advanced capital
    pub freight_tax_advance_rate: Rate,
    /// Full mode: months the advanced capital is outstanding
    pub advance_period: u32,
    /// Full mode: annual cost of the advanced capital
    pub capital_cost_rate: Rate,
    pub down_payment_rate: Rate,
    /// Financing mode: annual interest rate
    pub financing_rate: Rate,
    /// Financing mode: term in months
    pub financing_term: u32,
    pub repayment_method: RepaymentMethod,
    pub handling_fee_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxParams {
    /// Settlement-currency units per unit of rent currency
    pub exchange_rate: Decimal,
    pub exchange_volatility: Rate,
    pub rent_currency: Currency,
}

/// Fully-defaulted, unit-normalized deal parameters. All `Rate` fields are
/// fractions (0.05 = 5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub equipment: EquipmentParams,
    pub revenue: RevenueParams,
    pub crossborder: CrossborderParams,
    pub tax: TaxParams,
    pub operating: OperatingParams,
    pub financing: FinancingParams,
    pub fx: FxParams,
    pub business_mode: BusinessMode,
    pub scenario: ScenarioName,
    /// First month of the lease; enables calendar labels on cash-flow rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_start: Option<NaiveDate>,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        ParameterSnapshot {
            equipment: EquipmentParams {
                quantity: 1,
                purchase_price: dec!(800000),
                economic_life: 10,
                residual_value_rate: dec!(0.10),
            },
            revenue: RevenueParams {
                monthly_rent: dec!(50000),
                installation_fee: Decimal::ZERO,
                maintenance_service_fee: Decimal::ZERO,
                lease_term: 12,
                end_sale_price: Decimal::ZERO,
                disposal_fee_rate: dec!(0.02),
            },
            crossborder: CrossborderParams {
                domestic_freight: dec!(15000),
                international_freight: dec!(25000),
                port_charges: dec!(8000),
                insurance_rate: dec!(0.008),
                insurance_base: InsuranceBase::EquipmentValue,
                customs_agent_fee: dec!(3000),
            },
            tax: TaxParams {
                tax_basis: TaxBasis::Cif,
                tariff_rate: dec!(0.05),
                vat_rate: dec!(0.12),
                tariff_exempt: false,
                vat_deductible: false,
                vat_deduct_rate: Decimal::ONE,
                include_freight_in_dutiable: true,
                include_insurance_in_dutiable: true,
            },
            operating: OperatingParams {
                annual_maintenance: Decimal::ZERO,
                local_parts: Decimal::ZERO,
                local_service_fee: Decimal::ZERO,
                other_operating_cost: Decimal::ZERO,
            },
            financing: FinancingParams {
                payment_mode: PaymentMode::Full,
                purchase_advance_rate: dec!(0.30),
                freight_tax_advance_rate: Decimal::ONE,
                advance_period: 6,
                capital_cost_rate: dec!(0.08),
                down_payment_rate: dec!(0.30),
                financing_rate: dec!(0.06),
                financing_term: 12,
                repayment_method: RepaymentMethod::Equal,
                handling_fee_rate: dec!(0.01),
            },
            fx: FxParams {
                exchange_rate: Decimal::ONE,
                exchange_volatility: dec!(0.05),
                rent_currency: Currency::USD,
            },
            business_mode: BusinessMode::Lease,
            scenario: ScenarioName::Baseline,
            lease_start: None,
        }
    }
}

impl ParameterSnapshot {
    /// Copy of this snapshot evaluated under another scenario.
    pub fn with_scenario(&self, scenario: ScenarioName) -> Self {
        ParameterSnapshot {
            scenario,
            ..self.clone()
        }
    }

    pub fn is_financed(&self) -> bool {
        self.financing.payment_mode == PaymentMode::Financing
    }

    pub fn is_lease_to_sell(&self) -> bool {
        self.business_mode == BusinessMode::LeaseToSell
    }
}
