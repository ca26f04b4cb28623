//! Margin and profit figures derived from a [`DealBreakdown`](crate::calculators::DealBreakdown).

pub mod margins;
pub mod profit;

pub use margins::{calculate_gross_margins, CostBase, GrossMargins};
pub use profit::{
    calculate_cost_structure, calculate_profit, CostCategory, CostShare, ProfitSummary,
};
