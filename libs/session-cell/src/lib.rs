pub mod directory;
pub mod handlers;
pub mod router;

pub use directory::UserDirectory;
pub use router::session_routes;
