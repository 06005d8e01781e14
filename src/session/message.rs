use crate::visualizer::frame::BarFrame;

/// Transport commands, applied only on the UI-owning thread.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    PlayPause,
    Next,
    Previous,
    /// Absolute position in seconds
    Seek(f64),
    /// Position as a percentage of the track
    SeekPercent(f64),
    SetVolume(f32),
    ToggleShuffle,
    ToggleRepeat,
    Quit,
}

impl Command {
    /// Parse one line of user input (`p`, `n`, `b`, `s 30`, `%50`, `v 0.5`,
    /// `shuffle`, `repeat`, `q`).
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Some(pct) = line.strip_prefix('%') {
            return pct.trim().parse().ok().map(Command::SeekPercent);
        }
        let mut parts = line.split_whitespace();
        let cmd = parts.next()?;
        let arg = parts.next();
        match cmd {
            "p" | "play" | "pause" => Some(Command::PlayPause),
            "n" | "next" => Some(Command::Next),
            "b" | "prev" | "previous" => Some(Command::Previous),
            "s" | "seek" => arg?.parse().ok().map(Command::Seek),
            "v" | "volume" => arg?.parse().ok().map(Command::SetVolume),
            "shuffle" => Some(Command::ToggleShuffle),
            "repeat" => Some(Command::ToggleRepeat),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Everything the UI thread consumes. Background loops only enqueue these.
#[derive(Clone, Debug)]
pub enum UiMessage {
    Frame(BarFrame),
    Position { position: f64, duration: f64 },
    Command(Command),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transport_commands() {
        assert_eq!(Command::parse("p"), Some(Command::PlayPause));
        assert_eq!(Command::parse(" next "), Some(Command::Next));
        assert_eq!(Command::parse("b"), Some(Command::Previous));
        assert_eq!(Command::parse("s 42.5"), Some(Command::Seek(42.5)));
        assert_eq!(Command::parse("%75"), Some(Command::SeekPercent(75.0)));
        assert_eq!(Command::parse("v 0.3"), Some(Command::SetVolume(0.3)));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("s"), None);
        assert_eq!(Command::parse("s abc"), None);
        assert_eq!(Command::parse("dance"), None);
    }
}
