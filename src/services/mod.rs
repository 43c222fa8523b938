pub mod build;
pub mod server;

pub use build::BuildService;
pub use server::ServerService;
