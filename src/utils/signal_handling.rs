use std::sync::atomic::{AtomicBool, Ordering};

static RECEIVED_CTRL_C: AtomicBool = AtomicBool::new(false);

/// Installs the SIGINT/SIGTERM handler. Call once at process start; the
/// driver loops in [`crate::algorithm`] poll [`received_ctrl_c`] between
/// solver steps, so cancellation is cooperative and never interrupts a step.
pub fn initialize() {
    ctrlc::set_handler(|| RECEIVED_CTRL_C.store(true, Ordering::SeqCst))
        .expect("cannot install termination handler");
}

pub fn received_ctrl_c() -> bool {
    RECEIVED_CTRL_C.load(Ordering::SeqCst)
}
