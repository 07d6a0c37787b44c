//! Session orchestration over the credential services

mod service;

#[cfg(test)]
mod tests;

pub use service::SessionService;
