pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod ingest;
pub mod resume;
pub mod storage;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::VitaeConfig;
pub use entity::{Education, Experience, Links, ParsedEntity, Project, NOT_SPECIFIED};
pub use error::{Error, Result};
pub use events::{ChannelPublisher, Event, EventPublisher, NoopPublisher, TracingPublisher};
pub use resume::{FileType, ParseStatus, Resume, ResumeMetadata};
pub use storage::{ResumePage, ResumeQuery, ResumeStore, Storage};
