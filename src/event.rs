use std::io::{BufRead, BufReader};
use std::sync::mpsc;
use std::thread;

pub enum AppEvent {
    Line(String),
    Eof,
}

/// Reads input on its own thread so the game loop only ever blocks on the
/// channel. The game itself stays on the main thread.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(std::io::stdin()))
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for line in reader.lines() {
                let Ok(line) = line else {
                    break;
                };
                if tx.send(AppEvent::Line(line.trim().to_string())).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::Eof);
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_lines_then_eof() {
        let handler = EventHandler::from_reader(Cursor::new("1\n  q \n"));
        assert!(matches!(handler.next().unwrap(), AppEvent::Line(l) if l == "1"));
        assert!(matches!(handler.next().unwrap(), AppEvent::Line(l) if l == "q"));
        assert!(matches!(handler.next().unwrap(), AppEvent::Eof));
    }
}
