use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculator::{self, LoanField, MortgageType, RawLoanFields};
use crate::config::FormDefaults;

pub const INTEREST_ONLY_NOTE: &str = "This estimate reflects interest-only payments.";

/// Which of the two form layouts is shown.
///
/// `Typed` has the mortgage type selector and prefixes the answer with
/// "Monthly Payment: ". `Simple` is fixed-rate only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    #[default]
    Typed,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(LoanField),
    Submit,
}

const TYPED_ORDER: [Focus; 6] = [
    Focus::Field(LoanField::HomePrice),
    Focus::Field(LoanField::DownPayment),
    Focus::Field(LoanField::LoanTerm),
    Focus::Field(LoanField::InterestRate),
    Focus::Field(LoanField::MortgageType),
    Focus::Submit,
];

const SIMPLE_ORDER: [Focus; 5] = [
    Focus::Field(LoanField::HomePrice),
    Focus::Field(LoanField::DownPayment),
    Focus::Field(LoanField::LoanTerm),
    Focus::Field(LoanField::InterestRate),
    Focus::Submit,
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MortgageInputs {
    pub home_price: String,
    pub down_payment: String,
    pub loan_term: String,
    pub interest_rate: String,
    /// `None` is the "Select type" placeholder.
    pub mortgage_type: Option<MortgageType>,
}

impl From<FormDefaults> for MortgageInputs {
    fn from(defaults: FormDefaults) -> Self {
        Self {
            home_price: defaults.home_price,
            down_payment: defaults.down_payment,
            loan_term: defaults.loan_term,
            interest_rate: defaults.interest_rate,
            mortgage_type: defaults.mortgage_type,
        }
    }
}

impl MortgageInputs {
    fn text_mut(&mut self, field: LoanField) -> Option<&mut String> {
        match field {
            LoanField::HomePrice => Some(&mut self.home_price),
            LoanField::DownPayment => Some(&mut self.down_payment),
            LoanField::LoanTerm => Some(&mut self.loan_term),
            LoanField::InterestRate => Some(&mut self.interest_rate),
            LoanField::MortgageType => None,
        }
    }

    pub fn text(&self, field: LoanField) -> Option<&str> {
        match field {
            LoanField::HomePrice => Some(&self.home_price),
            LoanField::DownPayment => Some(&self.down_payment),
            LoanField::LoanTerm => Some(&self.loan_term),
            LoanField::InterestRate => Some(&self.interest_rate),
            LoanField::MortgageType => None,
        }
    }
}

pub struct App {
    pub variant: FormVariant,
    pub inputs: MortgageInputs,
    pub focus: Focus,
    /// Text shown in the breakdown pane after the last submission.
    pub answer: Option<String>,
    defaults: MortgageInputs,
}

impl App {
    pub fn new(variant: FormVariant, defaults: MortgageInputs) -> Self {
        Self {
            variant,
            inputs: defaults.clone(),
            focus: Focus::Field(LoanField::HomePrice),
            answer: None,
            defaults,
        }
    }

    pub fn focus_order(&self) -> &'static [Focus] {
        match self.variant {
            FormVariant::Typed => &TYPED_ORDER,
            FormVariant::Simple => &SIMPLE_ORDER,
        }
    }

    pub fn raw_fields(&self) -> RawLoanFields<'_> {
        let mortgage_type = match self.variant {
            FormVariant::Typed => Some(self.inputs.mortgage_type.map_or("", MortgageType::form_value)),
            FormVariant::Simple => None,
        };
        RawLoanFields {
            home_price: &self.inputs.home_price,
            down_payment: &self.inputs.down_payment,
            loan_term: &self.inputs.loan_term,
            interest_rate: &self.inputs.interest_rate,
            mortgage_type,
        }
    }

    /// Follows the live selector, not the last submission.
    pub fn shows_interest_only_note(&self) -> bool {
        self.variant == FormVariant::Typed
            && self.inputs.mortgage_type == Some(MortgageType::InterestOnly)
    }

    pub fn submit(&mut self) {
        let fields = self.raw_fields();
        debug!(
            home_price = fields.home_price,
            down_payment = fields.down_payment,
            loan_term = fields.loan_term,
            interest_rate = fields.interest_rate,
            mortgage_type = ?fields.mortgage_type,
            "submitting loan form"
        );

        let answer = match calculator::calculate(&fields) {
            Ok(payment) => {
                if !payment.is_finite() {
                    warn!(amount = payment.amount(), "monthly payment is not finite");
                }
                match self.variant {
                    FormVariant::Typed => format!("Monthly Payment: {payment}"),
                    FormVariant::Simple => payment.to_string(),
                }
            }
            Err(err) => {
                debug!(field = %err.field, reason = ?err.reason, "rejected loan form");
                err.to_string()
            }
        };
        self.answer = Some(answer);
    }

    pub fn reset(&mut self) {
        self.inputs = self.defaults.clone();
        self.focus = Focus::Field(LoanField::HomePrice);
        self.answer = None;
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn cycle_mortgage_type(&mut self, forward: bool) {
        // Placeholder sits at index 0, ahead of the three types.
        let options = MortgageType::ALL.len() + 1;
        let current = self
            .inputs
            .mortgage_type
            .and_then(|t| MortgageType::ALL.iter().position(|o| *o == t))
            .map_or(0, |i| i + 1);
        let next = if forward {
            (current + 1) % options
        } else {
            (current + options - 1) % options
        };
        self.inputs.mortgage_type = next.checked_sub(1).map(|i| MortgageType::ALL[i]);
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return true,
                KeyCode::Char('r') => self.reset(),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Enter => match self.focus {
                Focus::Submit => self.submit(),
                Focus::Field(_) => self.move_focus(true),
            },
            _ => match self.focus {
                Focus::Field(LoanField::MortgageType) => self.handle_selector_key(key),
                Focus::Field(field) => self.handle_text_key(field, key),
                Focus::Submit => {
                    if key.code == KeyCode::Char(' ') {
                        self.submit();
                    }
                }
            },
        }
        false
    }

    fn handle_selector_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.cycle_mortgage_type(true),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_mortgage_type(false),
            KeyCode::Backspace => self.inputs.mortgage_type = None,
            _ => {}
        }
    }

    fn handle_text_key(&mut self, field: LoanField, key: KeyEvent) {
        let Some(text) = self.inputs.text_mut(field) else {
            return;
        };
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => text.push(c),
            KeyCode::Char('-') if field == LoanField::DownPayment && text.is_empty() => {
                text.push('-')
            }
            KeyCode::Backspace => {
                text.pop();
            }
            _ => {}
        }
    }
}
