//! Device and push-token registration.

pub mod registrar;

pub use registrar::DeviceRegistrar;
