//! Per-asset lifecycle across the house and buffer models.
//!
//! `Uninitialized -> Initialized -> Initialized -> ... -> Failed`; `Failed` is terminal.

use core::fmt;

use crate::buffer::BufferState;
use crate::error::{ThermalError, ThermalResult};
use crate::house::HouseState;

/// Dynamic state of one asset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalState {
    pub house: HouseState,
    pub buffer: BufferState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecyclePhase {
    Uninitialized,
    Initialized,
    Failed,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecyclePhase::Uninitialized => "uninitialized",
            LifecyclePhase::Initialized => "initialized",
            LifecyclePhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum AssetLifecycle {
    #[default]
    Uninitialized,
    Initialized(ThermalState),
    /// Terminal. Holds the error that ended the asset.
    Failed(ThermalError),
}

impl AssetLifecycle {
    pub fn phase(&self) -> LifecyclePhase {
        match self {
            AssetLifecycle::Uninitialized => LifecyclePhase::Uninitialized,
            AssetLifecycle::Initialized(_) => LifecyclePhase::Initialized,
            AssetLifecycle::Failed(_) => LifecyclePhase::Failed,
        }
    }

    pub fn state(&self) -> Option<&ThermalState> {
        match self {
            AssetLifecycle::Initialized(state) => Some(state),
            _ => None,
        }
    }

    /// `Uninitialized -> Initialized`, or the self-loop after a successful step.
    pub fn advance(&mut self, state: ThermalState) -> ThermalResult<()> {
        if let AssetLifecycle::Failed(_) = self {
            return Err(ThermalError::InvalidArg {
                what: "asset has failed and cannot be advanced",
            });
        }
        *self = AssetLifecycle::Initialized(state);
        Ok(())
    }

    /// Move to the terminal `Failed` phase. The first failure is kept.
    pub fn fail(&mut self, error: ThermalError) {
        if !matches!(self, AssetLifecycle::Failed(_)) {
            *self = AssetLifecycle::Failed(error);
        }
    }
}
