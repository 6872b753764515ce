mod jobs;
mod oauth;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::reminder::dtos::*;
}

pub use crate::jobs::api::*;
pub use crate::oauth::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
