mod app;
pub use app::App;

mod router;
pub use router::Router;

mod confirmation;
pub use confirmation::Confirmation;

mod config;
pub use config::Config;

mod parser;
pub use parser::Parser;
