use std::sync::atomic::{AtomicU32, Ordering};

/// Rotation of the cloud, taken directly from the palm position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

/// Values the gesture tick writes and the render tick reads.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlState {
    /// Morph factor between source (0.0) and target (1.0). Always in [0, 1].
    pub transition: f32,
    pub rotation: Rotation,
}

/// Lock-free holder for [`ControlState`].
///
/// Each scalar is its own atomic. A reader may observe a new transition with
/// the previous rotation; every field is meaningful on its own.
#[derive(Debug, Default)]
pub struct SharedControl {
    transition: AtomicU32,
    yaw: AtomicU32,
    pitch: AtomicU32,
}

impl SharedControl {
    pub fn new(initial: ControlState) -> Self {
        let shared = Self::default();
        shared.store(initial);
        shared
    }

    pub fn load(&self) -> ControlState {
        ControlState {
            transition: f32::from_bits(self.transition.load(Ordering::Acquire)),
            rotation: Rotation {
                yaw: f32::from_bits(self.yaw.load(Ordering::Acquire)),
                pitch: f32::from_bits(self.pitch.load(Ordering::Acquire)),
            },
        }
    }

    pub fn store(&self, state: ControlState) {
        self.transition
            .store(state.transition.clamp(0.0, 1.0).to_bits(), Ordering::Release);
        self.yaw.store(state.rotation.yaw.to_bits(), Ordering::Release);
        self.pitch.store(state.rotation.pitch.to_bits(), Ordering::Release);
    }

    pub fn transition(&self) -> f32 {
        f32::from_bits(self.transition.load(Ordering::Acquire))
    }

    pub fn rotation(&self) -> Rotation {
        self.load().rotation
    }
}
