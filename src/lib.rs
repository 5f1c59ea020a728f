//! Fixed-rate amortizing loan schedules.
//!
//! Level monthly payment, remaining balance, scheduled principal and a full
//! month-by-month amortization table with a stub-period interest adjustment
//! for loans whose closing date differs from the first pay date.

pub mod calendar;
pub mod error;
pub mod loan;

pub use error::{AmortizationError, Result};
pub use loan::{
    amortization_schedule, loan_payment, remaining_balance, scheduled_principal,
    AmortizationTable, LoanTerms, ScheduleRow, MAX_TERM_YEARS,
};
