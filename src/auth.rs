//! Auth-domain models: bearer credentials and the Facebook identity record.

pub mod token;
pub mod user;

pub use token::{secret::*, *};
pub use user::*;
