pub use self::{app::Application, settings::Settings};

pub mod app;
pub mod domain;
pub mod queue;
pub mod routes;
pub mod schema;
pub mod settings;
pub mod trace;
