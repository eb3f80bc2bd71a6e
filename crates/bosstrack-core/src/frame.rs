/// Timing of the call a module is receiving.
///
/// `tick` is the index of the fixed step being executed (0-based, monotonic).
/// `fixed_steps` counts fixed steps run so far in the current wall-clock frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub frame_index: u64,
    pub tick: u64,
    pub dt: f32,
    pub fixed_dt: f32,
    pub fixed_steps: u32,
}
