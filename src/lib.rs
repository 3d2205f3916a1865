pub mod config;
pub mod domain_utils;
pub mod features;
pub mod harvest;
pub mod message;
pub mod scorer;
pub mod transport;

pub use config::{ByteOrder, Config, ScoringTables, TransportConfig};
pub use features::link_analyzer::SuspiciousLink;
pub use message::{EmailMessage, HeaderValue, Link};
pub use scorer::{PhishingScorer, RiskLevel, ScoreResult};
pub use transport::{FrameError, FrameReader, FrameWriter, NativeMessagingHost};
