pub mod auth;
pub mod error;
pub mod intake;
pub mod middleware;
pub mod review;
pub mod router;
pub mod state;
pub mod submissions;
