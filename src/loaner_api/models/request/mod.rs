pub mod loan_request;
