//! Testing utilities and harness for rowmux
//!
//! Executors here run nothing until told to, so tests decide exactly when
//! background diffs and page loads happen.

pub mod executor;
pub mod surface;
pub mod view;

mod delegate;
mod harness;

pub use delegate::{DelegateCall, RecordingDelegate};
pub use executor::{CountingScheduler, ManualExecutor};
pub use harness::ListHarness;
pub use surface::{RecordingSurface, SurfaceEvent};
pub use view::{TestContainer, TestView};

pub mod prelude {
    pub use crate::delegate::{DelegateCall, RecordingDelegate};
    pub use crate::executor::{CountingScheduler, ManualExecutor};
    pub use crate::harness::ListHarness;
    pub use crate::surface::{RecordingSurface, SurfaceEvent};
    pub use crate::view::{TestContainer, TestView};
}
