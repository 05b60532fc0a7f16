pub mod elem;
pub mod errors;
pub mod logging;
