use chrono::NaiveDate;
use log::{info, trace};
use std::fmt;

use crate::calendar::{add_months, end_of_month, roll_forward};
use crate::error::{AmortizationError, Result};

/// Longest term accepted by [`LoanTerms::new`].
pub const MAX_TERM_YEARS: u32 = 100;

/// Immutable inputs shared by every calculation.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLoanTerms"))]
pub struct LoanTerms {
    principal: f64,   // original balance
    annual_rate: f64, // annual interest rate as a percent (i.e., 7.5)
    term_years: u32,
}

impl LoanTerms {
    /// Validates the terms. A zero rate is accepted and amortizes linearly.
    pub fn new(principal: f64, annual_rate: f64, term_years: u32) -> Result<Self> {
        if !principal.is_finite() || principal <= 0. {
            return Err(AmortizationError::invalid(
                "principal",
                format!("must be a positive amount, got {}", principal),
            ));
        }
        if !annual_rate.is_finite() || annual_rate < 0. {
            return Err(AmortizationError::invalid(
                "annual_rate",
                format!("must be a non-negative percent, got {}", annual_rate),
            ));
        }
        if term_years == 0 {
            return Err(AmortizationError::invalid(
                "term_years",
                "must be at least one year",
            ));
        }
        if term_years > MAX_TERM_YEARS {
            return Err(AmortizationError::invalid(
                "term_years",
                format!("{} years is longer than {}", term_years, MAX_TERM_YEARS),
            ));
        }
        let terms = Self {
            principal,
            annual_rate,
            term_years,
        };
        if !terms.growth(terms.months()).is_finite() || !terms.payment().is_finite() {
            return Err(AmortizationError::invalid(
                "annual_rate",
                format!(
                    "{}% compounded over {} months is out of range",
                    annual_rate,
                    terms.months()
                ),
            ));
        }
        Ok(terms)
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn monthly_rate(&self) -> f64 {
        (self.annual_rate * 0.01) / 12.
    }

    /// Number of monthly payments.
    pub fn months(&self) -> u32 {
        self.term_years * 12
    }

    // ln(1 + r), exact for rates too small to survive 1 + r
    fn log_growth(&self) -> f64 {
        self.monthly_rate().ln_1p()
    }

    // (1 + r)^t
    fn growth(&self, month: u32) -> f64 {
        (month as f64 * self.log_growth()).exp()
    }

    // (1 + r)^t - 1
    fn growth_m1(&self, month: u32) -> f64 {
        (month as f64 * self.log_growth()).exp_m1()
    }

    fn discount_factor(&self) -> f64 {
        self.growth_m1(self.months())
    }

    fn is_zero_rate(&self) -> bool {
        self.monthly_rate() == 0.
    }

    /// Level monthly payment, unrounded.
    pub fn payment(&self) -> f64 {
        let dur = self.months() as f64;
        if self.is_zero_rate() {
            return self.principal / dur;
        }
        let rate = self.monthly_rate();
        self.principal * ((rate * self.growth(self.months())) / self.discount_factor())
    }

    /// Balance outstanding after `month` payments, `0 <= month <= months()`.
    pub fn remaining_balance(&self, month: u32) -> Result<f64> {
        let dur = self.months();
        if month > dur {
            return Err(AmortizationError::invalid(
                "month",
                format!("{} is past the last payment ({})", month, dur),
            ));
        }
        if self.is_zero_rate() {
            return Ok(self.principal * (dur - month) as f64 / dur as f64);
        }
        // (1+r)^D - (1+r)^t == (1+r)^t * ((1+r)^(D-t) - 1)
        Ok(self.principal
            * ((self.growth(month) * self.growth_m1(dur - month)) / self.discount_factor()))
    }

    /// Principal repaid by payment number `month`, `1 <= month <= months()`.
    pub fn scheduled_principal(&self, month: u32) -> Result<f64> {
        let dur = self.months();
        if month == 0 || month > dur {
            return Err(AmortizationError::invalid(
                "month",
                format!("{} is outside payments 1..={}", month, dur),
            ));
        }
        if self.is_zero_rate() {
            return Ok(self.principal / dur as f64);
        }
        let rate = self.monthly_rate();
        Ok(self.principal * (rate * self.growth(month - 1)) / self.discount_factor())
    }

    /// Extra interest owed for the days between `closing_date` and the end
    /// of its month, on an actual/365 basis.
    pub fn stub_interest(&self, closing_date: NaiveDate) -> Result<f64> {
        let days = end_of_month(closing_date)?
            .signed_duration_since(closing_date)
            .num_days();
        Ok(self.principal * (self.annual_rate * 0.01) * days as f64 / 365.)
    }

    /// Builds the month-by-month table.
    ///
    /// Due dates fall on the closing date's day of month, one month apart,
    /// rolled forward off weekends. `pay_date` does not move the due dates:
    /// it is only compared with `closing_date`, and when the two differ the
    /// first row carries the stub-period interest.
    pub fn schedule(&self, pay_date: NaiveDate, closing_date: NaiveDate) -> Result<AmortizationTable> {
        let level_payment = round(self.payment(), 2);
        let dur = self.months();
        let rate = self.monthly_rate();

        let stub_interest = if pay_date != closing_date {
            self.stub_interest(closing_date)?
        } else {
            0.
        };
        trace!(
            "pay date {}, closing date {}, stub interest {}",
            pay_date,
            closing_date,
            stub_interest
        );

        let mut rows: Vec<ScheduleRow> = Vec::with_capacity(dur as usize);
        for month in 1..=dur {
            let beginning_balance = self.remaining_balance(month - 1)?;
            let principal_payment = self.scheduled_principal(month)?;
            let mut interest = beginning_balance * rate;
            let ending_balance = beginning_balance - principal_payment;
            let mut due_payment = level_payment;
            if month == 1 {
                interest += stub_interest;
                due_payment += stub_interest;
            }
            let due_date = roll_forward(add_months(closing_date, month)?)?;
            trace!(
                "Pmt # {}, due date {}, interest {}, end bal {}",
                month,
                due_date,
                interest,
                ending_balance
            );

            rows.push(ScheduleRow {
                due_date,
                beginning_balance,
                interest,
                principal_payment,
                ending_balance,
                due_payment,
            });
        }

        info!(
            "The monthly payment for a loan with original balance of {}, an interest rate of {}% and duration of {} years is: {:.2}",
            self.principal, self.annual_rate, self.term_years, level_payment
        );

        Ok(AmortizationTable {
            terms: *self,
            level_payment,
            stub_interest,
            rows,
        })
    }
}

/// One month of the amortization table.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleRow {
    pub due_date: NaiveDate,
    pub beginning_balance: f64,
    pub interest: f64,
    pub principal_payment: f64,
    pub ending_balance: f64,
    pub due_payment: f64,
}

impl fmt::Display for ScheduleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "due date {}, beginning balance ${:.2}, interest ${:.2}, principal ${:.2}, ending balance ${:.2}, due payment ${:.2}",
            self.due_date,
            self.beginning_balance,
            self.interest,
            self.principal_payment,
            self.ending_balance,
            self.due_payment
        )
    }
}

/// Rows ordered by strictly increasing due date.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmortizationTable {
    terms: LoanTerms,
    level_payment: f64,
    stub_interest: f64,
    rows: Vec<ScheduleRow>,
}

impl AmortizationTable {
    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// Monthly payment rounded to cents.
    pub fn level_payment(&self) -> f64 {
        self.level_payment
    }

    /// Interest added to the first row, zero when there is no stub period.
    pub fn stub_interest(&self) -> f64 {
        self.stub_interest
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for payment number `month`, counting from 1.
    pub fn row(&self, month: usize) -> Option<&ScheduleRow> {
        month.checked_sub(1).and_then(|idx| self.rows.get(idx))
    }

    pub fn row_for(&self, due_date: NaiveDate) -> Option<&ScheduleRow> {
        self.rows
            .binary_search_by_key(&due_date, |row| row.due_date)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    pub fn total_interest(&self) -> f64 {
        self.rows.iter().map(|row| row.interest).sum()
    }

    pub fn total_principal(&self) -> f64 {
        self.rows.iter().map(|row| row.principal_payment).sum()
    }

    pub fn total_due(&self) -> f64 {
        self.rows.iter().map(|row| row.due_payment).sum()
    }
}

impl<'a> IntoIterator for &'a AmortizationTable {
    type Item = &'a ScheduleRow;
    type IntoIter = std::slice::Iter<'a, ScheduleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for AmortizationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12}{:>20}{:>14}{:>20}{:>18}{:>14}",
            "Due Date", "Beginning Balance", "Interest", "Principal Payment", "Ending Balance", "Due Payment"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<12}{:>20.2}{:>14.2}{:>20.2}{:>18.2}{:>14.2}",
                row.due_date.to_string(),
                row.beginning_balance,
                row.interest,
                row.principal_payment,
                row.ending_balance,
                row.due_payment
            )?;
        }
        Ok(())
    }
}

/// Level monthly payment for `principal` at `annual_rate` percent over
/// `term_years` years.
pub fn loan_payment(principal: f64, annual_rate: f64, term_years: u32) -> Result<f64> {
    Ok(LoanTerms::new(principal, annual_rate, term_years)?.payment())
}

/// Balance remaining after `month` payments.
pub fn remaining_balance(principal: f64, annual_rate: f64, term_years: u32, month: u32) -> Result<f64> {
    LoanTerms::new(principal, annual_rate, term_years)?.remaining_balance(month)
}

/// Principal portion of payment number `month`.
pub fn scheduled_principal(principal: f64, annual_rate: f64, term_years: u32, month: u32) -> Result<f64> {
    LoanTerms::new(principal, annual_rate, term_years)?.scheduled_principal(month)
}

pub fn amortization_schedule(
    principal: f64,
    annual_rate: f64,
    term_years: u32,
    pay_date: NaiveDate,
    closing_date: NaiveDate,
) -> Result<AmortizationTable> {
    LoanTerms::new(principal, annual_rate, term_years)?.schedule(pay_date, closing_date)
}

fn round(amt: f64, dec: u32) -> f64 {
    let scale = 10_f64.powi(dec as i32);
    (amt * scale).round() / scale
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLoanTerms {
    principal: f64,
    annual_rate: f64,
    term_years: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLoanTerms> for LoanTerms {
    type Error = AmortizationError;

    fn try_from(raw: RawLoanTerms) -> Result<Self> {
        LoanTerms::new(raw.principal, raw.annual_rate, raw.term_years)
    }
}
