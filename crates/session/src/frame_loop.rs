use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    /// Waiting for capture to settle.
    Uninitialized,
    Running,
    /// Terminal.
    Stopped,
}

/// Frame loop state machine: `Uninitialized -> Running -> Stopped`.
#[derive(Debug, Clone, Copy)]
pub struct FrameLoop {
    state: LoopState,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Uninitialized,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Enter `Running`. Only valid from `Uninitialized`; returns whether the
    /// transition happened.
    pub fn start(&mut self) -> bool {
        if self.state != LoopState::Uninitialized {
            return false;
        }
        self.state = LoopState::Running;
        true
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    /// Count one frame and return its 1-based number.
    pub(crate) fn advance(&mut self) -> u64 {
        self.frames += 1;
        self.frames
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
