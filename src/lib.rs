//! Canadian Payroll Engine
//!
//! This crate calculates one pay period for an employee: gross pay, CPP
//! contributions, EI premiums, income tax withholding, WSIB premiums, vacation
//! pay, net pay, and the updated year-to-date balances. Year-to-date figures
//! are rebuilt from payroll history, and every result carries an audit trace
//! of the steps that produced it.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
