//! Typewriter animation for the page title.
//!
//! Pure stepping logic; the browser layer owns the timer and feeds `step()` back
//! into itself after the returned delay.

/// One frame of the animation: the text to show and how long to wait before the
/// next `step()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    pub delay_ms: u32,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
    char_delay_ms: u32,
    pause_ms: u32,
}

impl Typewriter {
    pub fn new(text: &str, char_delay_ms: u32, pause_ms: u32) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
            char_delay_ms,
            pause_ms,
        }
    }

    /// Back to an empty title.
    pub fn restart(&mut self) {
        self.shown = 0;
    }

    /// Reveal one more character. The frame that completes the title holds it for
    /// the pause; the step after that starts over with the first character.
    pub fn step(&mut self) -> Frame {
        if self.chars.is_empty() {
            return Frame {
                text: String::new(),
                delay_ms: self.char_delay_ms,
            };
        }
        if self.shown >= self.chars.len() {
            self.shown = 0;
        }
        self.shown += 1;
        let text: String = self.chars[..self.shown].iter().collect();
        let delay_ms = if self.shown == self.chars.len() {
            self.pause_ms
        } else {
            self.char_delay_ms
        };
        Frame { text, delay_ms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_one_char_per_step_then_pauses_and_loops() {
        let mut tw = Typewriter::new("JOKENPÔ", 150, 3000);
        let frames: Vec<Frame> = (0..9).map(|_| tw.step()).collect();
        assert_eq!(frames[0], Frame { text: "J".into(), delay_ms: 150 });
        assert_eq!(frames[5].text, "JOKENP");
        assert_eq!(frames[6], Frame { text: "JOKENPÔ".into(), delay_ms: 3000 });
        assert_eq!(frames[7], Frame { text: "J".into(), delay_ms: 150 });
        assert_eq!(frames[8].text, "JO");
    }

    #[test]
    fn loop_restart_never_shows_an_empty_title() {
        let mut tw = Typewriter::new("AB", 150, 3000);
        let frames: Vec<Frame> = (0..5).map(|_| tw.step()).collect();
        assert_eq!(frames[1], Frame { text: "AB".into(), delay_ms: 3000 });
        assert_eq!(frames[2], Frame { text: "A".into(), delay_ms: 150 });
        assert!(frames.iter().all(|f| !f.text.is_empty()));
    }

    #[test]
    fn restart_clears_progress() {
        let mut tw = Typewriter::new("AB", 10, 20);
        tw.step();
        tw.restart();
        assert_eq!(tw.step().text, "A");
    }

    #[test]
    fn empty_title_just_idles() {
        let mut tw = Typewriter::new("", 10, 20);
        assert_eq!(tw.step(), Frame { text: String::new(), delay_ms: 10 });
        assert_eq!(tw.step(), Frame { text: String::new(), delay_ms: 10 });
    }
}
