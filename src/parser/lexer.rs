//! Line-oriented code scanner
//!
//! Not a tokenizer: it only knows enough about Kotlin/Java lexical structure
//! to tell code characters apart from comments and literals, so that braces
//! and parentheses inside `"..."`, `'...'`, `"""..."""`, `// ...` and
//! `/* ... */` are not counted.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Mode {
    #[default]
    Code,
    BlockComment,
    RawString,
}

/// Carries block comment and raw string state from one line to the next
#[derive(Debug, Default, Clone)]
pub struct CodeScanner {
    mode: Mode,
}

impl CodeScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `visit` with every code character of `line`, in order
    pub fn scan_line(&mut self, line: &str, mut visit: impl FnMut(char)) {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            match self.mode {
                Mode::BlockComment => {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        self.mode = Mode::Code;
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                Mode::RawString => {
                    if is_triple_quote(&chars, i) {
                        self.mode = Mode::Code;
                        i += 3;
                    } else {
                        i += 1;
                    }
                }
                Mode::Code => {
                    let c = chars[i];
                    let next = chars.get(i + 1).copied();

                    if c == '/' && next == Some('/') {
                        return;
                    }
                    if c == '/' && next == Some('*') {
                        self.mode = Mode::BlockComment;
                        i += 2;
                        continue;
                    }
                    if is_triple_quote(&chars, i) {
                        self.mode = Mode::RawString;
                        i += 3;
                        continue;
                    }
                    if c == '"' || c == '\'' {
                        i = skip_quoted(&chars, i, c);
                        continue;
                    }

                    visit(c);
                    i += 1;
                }
            }
        }
    }

    /// Count code-level `{` and `}` on a line
    pub fn braces(&mut self, line: &str) -> (usize, usize) {
        let mut opens = 0;
        let mut closes = 0;
        self.scan_line(line, |c| match c {
            '{' => opens += 1,
            '}' => closes += 1,
            _ => {}
        });
        (opens, closes)
    }
}

fn is_triple_quote(chars: &[char], i: usize) -> bool {
    chars.len() >= i + 3 && chars[i..i + 3] == ['"', '"', '"']
}

/// Index just past the closing quote, or the end of the line when unterminated
fn skip_quoted(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}
