//! CLI command implementations.

pub mod export;
pub mod manage;
pub mod refresh;
pub mod submit;

pub use export::ExportCommand;
pub use manage::ManageCommand;
pub use refresh::RefreshPriceCommand;
pub use submit::SubmitLinkCommand;
