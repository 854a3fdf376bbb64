use chrono::{DateTime, Utc};

/// Clock abstraction. The dispatch job reads `now` from here and hands it
/// to the pure due-computation, which keeps that computation deterministic
/// and lets tests pin the clock.
pub trait ISys: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct RealSys {}

impl ISys for RealSys {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
