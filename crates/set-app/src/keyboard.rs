use set_core::game::{KeyPad, Terminator};
use set_core::model::Slot;
use std::collections::HashMap;
use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

pub const QUIT_COMMAND: &str = "quit";

/// What one line of keyboard input amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Quit,
    Pressed { accepted: usize, ignored: usize },
}

/// Routes typed characters to the human players' keypads.
pub struct Keyboard {
    bindings: HashMap<char, (usize, Slot)>,
    pads: Vec<KeyPad>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            pads: Vec::new(),
        }
    }

    /// Maps the `i`-th character of `keys` to slot `i` on `pad`.
    pub fn bind(&mut self, pad: KeyPad, keys: &str) {
        let index = self.pads.len();
        for (slot, key) in keys.chars().enumerate() {
            self.bindings.insert(key, (index, slot));
        }
        self.pads.push(pad);
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    pub fn handle_line(&self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.eq_ignore_ascii_case(QUIT_COMMAND) {
            return LineOutcome::Quit;
        }
        let mut accepted = 0;
        let mut ignored = 0;
        for key in line.chars().filter(|c| !c.is_whitespace()) {
            match self.bindings.get(&key) {
                Some(&(index, slot)) if self.pads[index].key_pressed(slot) => accepted += 1,
                _ => ignored += 1,
            }
        }
        LineOutcome::Pressed { accepted, ignored }
    }

    /// Feeds lines from `reader` until `quit`, end of input, or every bound
    /// player has stopped. Requests termination on `quit` and end of input.
    pub fn run<R: BufRead>(&self, reader: R, terminator: &Terminator) {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %err, "keyboard input failed");
                    break;
                }
            };
            match self.handle_line(&line) {
                LineOutcome::Quit => {
                    info!("quit requested from keyboard");
                    terminator.request();
                    return;
                }
                LineOutcome::Pressed { accepted, ignored } => {
                    debug!(accepted, ignored, "keyboard line");
                }
            }
            if terminator.is_requested() || self.pads.iter().all(|pad| !pad.is_active()) {
                return;
            }
        }
        debug!("keyboard input closed");
        terminator.request();
    }

    /// Reads stdin on a detached thread; the thread ends with the input.
    pub fn spawn_stdin(self, terminator: Terminator) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("keyboard".to_string())
            .spawn(move || self.run(io::stdin().lock(), &terminator))
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Keyboard, LineOutcome};
    use set_core::config::GameConfig;
    use set_core::game::Dealer;
    use set_core::model::PlayerId;
    use set_core::oracle::FeatureOracle;
    use set_core::view::NullView;
    use std::io::Cursor;
    use std::sync::Arc;

    fn dealer() -> Dealer {
        let config = GameConfig {
            human: vec![true, true],
            ..GameConfig::default()
        };
        Dealer::new(
            config,
            Arc::new(FeatureOracle::standard()),
            Arc::new(NullView),
        )
        .unwrap()
    }

    fn keyboard(dealer: &Dealer) -> Keyboard {
        let mut keyboard = Keyboard::new();
        keyboard.bind(dealer.keypad(PlayerId::new(0)).unwrap(), "qwerasdfzxcv");
        keyboard.bind(dealer.keypad(PlayerId::new(1)).unwrap(), "uiopjkl;m,./");
        keyboard
    }

    #[test]
    fn keys_map_to_player_and_slot() {
        let dealer = dealer();
        let keyboard = keyboard(&dealer);
        let player_of = |key: char| {
            keyboard
                .bindings
                .get(&key)
                .map(|&(index, slot)| (keyboard.pads[index].player(), slot))
        };
        assert_eq!(player_of('q'), Some((PlayerId::new(0), 0)));
        assert_eq!(player_of('v'), Some((PlayerId::new(0), 11)));
        assert_eq!(player_of(';'), Some((PlayerId::new(1), 7)));
        assert_eq!(player_of('!'), None);
    }

    #[test]
    fn presses_before_the_table_opens_are_ignored() {
        let dealer = dealer();
        let keyboard = keyboard(&dealer);
        assert_eq!(
            keyboard.handle_line(" q u ! "),
            LineOutcome::Pressed {
                accepted: 0,
                ignored: 3
            }
        );
        assert_eq!(keyboard.handle_line("QUIT"), LineOutcome::Quit);
    }

    #[test]
    fn quit_and_end_of_input_request_termination() {
        let first = dealer();
        let terminator = first.terminator();
        keyboard(&first).run(Cursor::new("qwe\nquit\nasd\n"), &terminator);
        assert!(terminator.is_requested());

        let second = dealer();
        let terminator = second.terminator();
        keyboard(&second).run(Cursor::new(""), &terminator);
        assert!(terminator.is_requested());
    }
}
