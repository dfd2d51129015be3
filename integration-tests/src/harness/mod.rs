pub mod fixtures;
pub mod session;
pub mod tracing;

pub use fixtures::{fixture_path, load_fixture};
pub use session::{RawHttpRequest, RawHttpResponse, TestSession};
pub use tracing::{CapturedEvent, EventCapture};
