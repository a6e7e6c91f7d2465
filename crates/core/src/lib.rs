pub mod behavior;
pub mod content;
pub mod difficulty;
pub mod hallucination;
pub mod journal;
pub mod journal_file;
pub mod mode;
pub mod movement;
pub mod replay;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod types;
pub mod worldgen;

pub use difficulty::{
    DifficultyContext, EmotionalImpulse, EmotionalModifiers, EmotionalSink, NullEmotionalSink,
    SignalFrame, TemporalModifiers,
};
pub use journal::{FrameRecord, SessionJournal};
pub use mode::{ModeSession, ModeTag};
pub use replay::{ReplayOutcome, ReplayResult, replay_to_end};
pub use session::{DEFAULT_GRID_SIZE, SimulationSession};
pub use snapshot::SessionSnapshot;
pub use state::{Enemy, Grid, Hallucination, Player};
pub use types::*;
