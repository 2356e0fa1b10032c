//! Session credentials used to authenticate the realtime socket.

pub mod credentials;

pub use credentials::{Credentials, CredentialsManager, DashboardRole};
