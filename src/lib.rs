//! Terminal mortgage calculator.
//!
//! [`calculator`] holds the payment math and input validation. The rest is
//! the form that feeds it: key handling in [`form`], drawing in [`ui`].

pub mod calculator;
pub mod config;
pub mod form;
pub mod logging;
pub mod ui;
