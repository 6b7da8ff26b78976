use std::fmt;

/// Action requested through the path segment after the task name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Explicit `on`.
    Start,
    /// Explicit `off`.
    Stop,
    /// No action segment, or one that is neither `on` nor `off`. Treated as start.
    Unspecified,
}

impl Action {
    /// Parse an already lower-cased path segment.
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "on" => Action::Start,
            "off" => Action::Stop,
            _ => Action::Unspecified,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Start => "on",
            Action::Stop => "off",
            Action::Unspecified => "default",
        };
        f.write_str(s)
    }
}
