//! loanprep: Loan Data Preparation Library
//!
//! Turns a raw loan-application extract into out-of-time training and test
//! partitions plus the list of numeric features for credit-risk modelling.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
