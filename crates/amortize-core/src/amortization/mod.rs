pub mod loan;

pub use loan::{amortize_loan, calculate_loan, AmortizationYear, LoanInput, LoanResult};
