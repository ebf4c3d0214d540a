pub mod driver;
pub mod headless;

pub use driver::{FrameRef, PageDriver};
pub use headless::ChromeDriver;
