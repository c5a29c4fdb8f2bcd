pub mod app;

pub use app::{make_test_app, request, send};
