pub mod error;
pub mod handlers;
pub mod playlist;
pub mod routes;
pub mod target;
pub mod torrents;

pub use routes::create_router;
