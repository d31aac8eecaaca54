pub mod bookmark;
pub mod config;
pub mod defaults;
pub mod denormalize;
pub mod encoding;
pub mod extract;
pub mod filters;
pub mod logging;
pub mod output;
pub mod places;
pub mod table;
