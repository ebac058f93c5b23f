mod door;
mod force;
mod spectrum;
mod tween;

pub use door::{DoorAnimator, DoorState, DoorTween, HingedDoor, DOOR_DURATION, DOOR_SWING};
pub use force::{
    DagMode, ForceLink, ForceSimulation, ALPHA_MIN, CHARGE_STRENGTH, LINK_DISTANCE, SETTLE_TICKS,
};
pub use spectrum::{
    apply_bar_scale, bar_scale, FrequencySource, SpectrumAnalyser, BIN_COUNT, FFT_SIZE,
};
pub use tween::{Lerp, Tween};
