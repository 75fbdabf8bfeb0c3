//! Agent loop state management
//!
//! Tracks how many tool round-trips an agent run has made against its bound.

/// State of one agent run's request / tool-execution loop
#[derive(Debug, Clone)]
pub struct AgentLoopState {
    /// Tool round-trips completed so far
    pub round_trips: usize,
    /// Maximum allowed round-trips
    pub max_round_trips: usize,
    /// Tool calls executed across all round-trips
    pub tool_calls: usize,
}

impl AgentLoopState {
    /// Create a new loop state with the given bound
    pub fn new(max_round_trips: usize) -> Self {
        Self {
            round_trips: 0,
            max_round_trips,
            tool_calls: 0,
        }
    }

    /// Check if another round of tool execution is allowed
    pub fn should_continue(&self) -> bool {
        self.round_trips < self.max_round_trips
    }

    /// Record a completed round of `calls` tool executions
    pub fn record_round_trip(&mut self, calls: usize) {
        self.round_trips += 1;
        self.tool_calls += calls;
    }
}
