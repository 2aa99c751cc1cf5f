pub mod decrypt;
pub mod encrypt;
pub mod inspect;
pub mod recipients;
pub mod session;
