pub mod js_executor;
pub mod render_session;

pub use js_executor::JsExecutor;
pub use render_session::RenderSession;
