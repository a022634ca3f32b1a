//! Backend errors.

use crate::bringup::Stage;
use crate::heartbeat::HeartbeatError;

#[derive(Debug)]
pub enum FbDevError<E> {
    /// A bring-up step failed.
    BringUp { stage: Stage, source: E },
    /// SysTick cannot produce the heartbeat rate.
    Heartbeat(HeartbeatError),
    /// The compositor refused to create a screen.
    ScreenCreate,
    /// Clearing the screen after bring-up failed.
    Draw,
}

impl<E: core::fmt::Debug> core::fmt::Display for FbDevError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FbDevError::BringUp { stage, source } => {
                write!(f, "{stage:?} bring-up failed: {source:?}")
            }
            FbDevError::Heartbeat(e) => write!(f, "Heartbeat: {e}"),
            FbDevError::ScreenCreate => write!(f, "Screen creation failed"),
            FbDevError::Draw => write!(f, "Initial screen clear failed"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for FbDevError<E> {}
