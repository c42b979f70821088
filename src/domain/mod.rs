pub mod forms;
pub mod models;
pub mod risk;
pub mod scenario;
pub mod session;
