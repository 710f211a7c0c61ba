pub mod loaner_client;
pub mod models;
