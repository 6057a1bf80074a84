//! Smartsheet API service implementations.

mod attachments;
mod columns;
mod discussions;
mod rows;
mod server_info;
mod shares;
mod sheets;
mod users;
mod webhooks;

pub use attachments::*;
pub use columns::*;
pub use discussions::*;
pub use rows::*;
pub use server_info::*;
pub use shares::*;
pub use sheets::*;
pub use users::*;
pub use webhooks::*;
