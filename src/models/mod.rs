pub mod driver;
pub mod lap;
pub mod session;
pub mod session_kind;
pub mod telemetry;

pub use driver::DriverInfo;
pub use lap::{Lap, LapRecord};
pub use session::{Session, SessionInfo, SessionRequest};
pub use session_kind::SessionKind;
pub use telemetry::{TelemetryChannel, TelemetrySample, TelemetryTrace};
