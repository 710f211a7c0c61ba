pub mod request;

pub mod borrow_reason;
pub mod device;
