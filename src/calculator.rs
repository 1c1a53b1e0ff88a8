//! Monthly payment computation.
//!
//! Everything in here is a pure function of its inputs: the form hands over
//! the raw strings it collected, gets back either a [`MonthlyPayment`] or a
//! [`ValidationError`], and renders whichever it got.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only message a user ever sees for rejected input.
pub const VALIDATION_MESSAGE: &str = "Please fill out all fields with valid values.";

/// Percentage points added to the base rate for adjustable mortgages.
const ADJUSTABLE_RATE_BUMP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MortgageType {
    #[default]
    Fixed,
    Adjustable,
    InterestOnly,
}

impl MortgageType {
    pub const ALL: [MortgageType; 3] = [
        MortgageType::Fixed,
        MortgageType::Adjustable,
        MortgageType::InterestOnly,
    ];

    /// Parses the value a type selector submits (`fixed`, `adjustable`,
    /// `interestOnly`).
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "fixed" => Some(MortgageType::Fixed),
            "adjustable" => Some(MortgageType::Adjustable),
            "interestOnly" => Some(MortgageType::InterestOnly),
            _ => None,
        }
    }

    pub fn form_value(self) -> &'static str {
        match self {
            MortgageType::Fixed => "fixed",
            MortgageType::Adjustable => "adjustable",
            MortgageType::InterestOnly => "interestOnly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MortgageType::Fixed => "Fixed Rate",
            MortgageType::Adjustable => "Adjustable Rate",
            MortgageType::InterestOnly => "Interest-Only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanField {
    HomePrice,
    DownPayment,
    LoanTerm,
    InterestRate,
    MortgageType,
}

impl LoanField {
    pub fn label(self) -> &'static str {
        match self {
            LoanField::HomePrice => "Home price",
            LoanField::DownPayment => "Down payment",
            LoanField::LoanTerm => "Loan term (years)",
            LoanField::InterestRate => "Interest rate (%)",
            LoanField::MortgageType => "Mortgage Type",
        }
    }
}

impl fmt::Display for LoanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Missing,
    NotANumber,
    NotPositive,
    UnknownMortgageType,
}

/// Rejected input. Always displays as [`VALIDATION_MESSAGE`]; `field` and
/// `reason` exist for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", VALIDATION_MESSAGE)]
pub struct ValidationError {
    pub field: LoanField,
    pub reason: InvalidReason,
}

impl ValidationError {
    fn new(field: LoanField, reason: InvalidReason) -> Self {
        Self { field, reason }
    }
}

pub type PaymentResult = Result<MonthlyPayment, ValidationError>;

/// Form fields exactly as typed.
///
/// `mortgage_type` is `None` when the form has no type selector at all, which
/// means fixed-rate. `Some("")` means the selector was left on its
/// placeholder and is treated as a missing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLoanFields<'a> {
    pub home_price: &'a str,
    pub down_payment: &'a str,
    pub loan_term: &'a str,
    pub interest_rate: &'a str,
    pub mortgage_type: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub home_price: f64,
    pub down_payment: f64,
    pub term_years: f64,
    pub annual_rate_percent: f64,
    #[serde(default)]
    pub mortgage_type: MortgageType,
}

impl LoanInput {
    /// Validates raw form strings and converts them into a `LoanInput`.
    ///
    /// The down payment is only required to be present and numeric; it may be
    /// negative or larger than the home price.
    pub fn from_fields(fields: &RawLoanFields<'_>) -> Result<Self, ValidationError> {
        let home_price = parse_number(LoanField::HomePrice, fields.home_price)?;
        let down_payment = parse_number(LoanField::DownPayment, fields.down_payment)?;
        let term_years = parse_number(LoanField::LoanTerm, fields.loan_term)?;
        let annual_rate_percent = parse_number(LoanField::InterestRate, fields.interest_rate)?;
        let mortgage_type = match fields.mortgage_type.map(str::trim) {
            None => MortgageType::Fixed,
            Some("") => {
                return Err(ValidationError::new(
                    LoanField::MortgageType,
                    InvalidReason::Missing,
                ))
            }
            Some(value) => MortgageType::from_form_value(value).ok_or(ValidationError::new(
                LoanField::MortgageType,
                InvalidReason::UnknownMortgageType,
            ))?,
        };

        let input = LoanInput {
            home_price,
            down_payment,
            term_years,
            annual_rate_percent,
            mortgage_type,
        };
        input.validate()?;
        Ok(input)
    }

    /// Numeric rules: every field finite, and home price, term and rate
    /// strictly positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            (LoanField::HomePrice, self.home_price, true),
            (LoanField::DownPayment, self.down_payment, false),
            (LoanField::LoanTerm, self.term_years, true),
            (LoanField::InterestRate, self.annual_rate_percent, true),
        ];
        for (field, value, must_be_positive) in checks {
            if !value.is_finite() {
                return Err(ValidationError::new(field, InvalidReason::NotANumber));
            }
            if must_be_positive && value <= 0.0 {
                return Err(ValidationError::new(field, InvalidReason::NotPositive));
            }
        }
        Ok(())
    }

    pub fn loan_amount(&self) -> f64 {
        self.home_price - self.down_payment
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    pub fn number_of_payments(&self) -> f64 {
        self.term_years * 12.0
    }
}

fn parse_number(field: LoanField, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, InvalidReason::Missing));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ValidationError::new(field, InvalidReason::NotANumber))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyPayment {
    amount: f64,
    mortgage_type: MortgageType,
}

impl MonthlyPayment {
    /// Unrounded amount. May be negative or non-finite.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn rounded(&self) -> f64 {
        round_cents(self.amount)
    }

    pub fn mortgage_type(&self) -> MortgageType {
        self.mortgage_type
    }

    pub fn is_finite(&self) -> bool {
        self.amount.is_finite()
    }
}

impl fmt::Display for MonthlyPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(self.amount))
    }
}

/// Validates raw form fields and computes the payment in one step.
pub fn calculate(fields: &RawLoanFields<'_>) -> PaymentResult {
    let input = LoanInput::from_fields(fields)?;
    compute_monthly_payment(&input)
}

pub fn compute_monthly_payment(input: &LoanInput) -> PaymentResult {
    input.validate()?;

    let loan_amount = input.loan_amount();
    let number_of_payments = input.number_of_payments();

    let amount = match input.mortgage_type {
        MortgageType::InterestOnly => loan_amount * input.monthly_rate(),
        MortgageType::Adjustable => {
            let adjusted_rate = (input.annual_rate_percent + ADJUSTABLE_RATE_BUMP) / 100.0 / 12.0;
            annuity_payment(loan_amount, adjusted_rate, number_of_payments)
        }
        MortgageType::Fixed => {
            annuity_payment(loan_amount, input.monthly_rate(), number_of_payments)
        }
    };

    Ok(MonthlyPayment {
        amount,
        mortgage_type: input.mortgage_type,
    })
}

// Not guarded against a zero rate: (1 + 0)^-n == 1 makes the denominator 0.
fn annuity_payment(principal: f64, rate: f64, periods: f64) -> f64 {
    principal * rate / (1.0 - (1.0 + rate).powf(-periods))
}

/// Rounds half away from zero to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    // Past 2^52 an f64 has no fractional part, and scaling by 100 can overflow.
    if !amount.is_finite() || amount.abs() >= 4_503_599_627_370_496.0 {
        return amount;
    }
    let rounded = (amount * 100.0).round() / 100.0;
    // -0.004 rounds to -0.0, which would print as "-0.00".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Formats an amount as `$` followed by exactly two decimals.
///
/// Non-finite amounts render as `$NaN`, `$Infinity` and `$-Infinity`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "$NaN".to_string();
    }
    if amount.is_infinite() {
        return if amount > 0.0 {
            "$Infinity".to_string()
        } else {
            "$-Infinity".to_string()
        };
    }
    format!("${:.2}", round_cents(amount))
}
