use serde::Serialize;

/// Startup readiness report emitted once the store is constructed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub status: &'static str,
    pub entities: u64,
}

impl Readiness {
    pub fn ready(entities: u64) -> Self {
        Self { status: "ready", entities }
    }
}
