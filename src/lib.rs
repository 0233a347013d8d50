pub mod analysis;
pub mod config;
pub mod frame;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
