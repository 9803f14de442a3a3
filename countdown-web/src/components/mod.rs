pub mod circular_progress;
pub mod countdown_timer;
pub mod flip_number;

pub use circular_progress::CircularProgress;
pub use countdown_timer::CountdownTimer;
pub use flip_number::FlipNumber;
