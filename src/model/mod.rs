pub mod aggregate;
pub mod date;
pub mod department;
pub mod employee;
pub mod ledger;
pub mod marking;
