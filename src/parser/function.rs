use super::lexer::CodeScanner;
use regex::Regex;
use std::sync::OnceLock;

/// How a function body is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// `{ ... }`
    Block,
    /// `= expression`
    Expression,
    /// Abstract or interface declaration
    Bodyless,
}

/// A function declaration found by line scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDeclaration {
    pub name: String,
    /// First line of the declaration (0-based)
    pub start_line: usize,
    /// Last line of the declaration, inclusive (0-based)
    pub end_line: usize,
    pub body: BodyKind,
}

fn declaration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:(?:@\w+(?:\([^)]*\))?|public|private|protected|internal|static|final|open|abstract|external|native|default|suspend|inline|synchronized|operator|infix|tailrec)\s+)*(?:fun|void)\s+(?:<[^>]*>\s*)?([A-Za-z0-9_]+)\s*\(",
        )
        .expect("declaration pattern is valid")
    })
}

/// Split text into lines, keeping each line's terminator
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// A line without its `\n` / `\r\n` terminator
pub fn strip_eol(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// Finds removable function declarations in Kotlin/Java text
pub struct FunctionScanner<'a> {
    excluded: &'a [String],
}

impl<'a> FunctionScanner<'a> {
    pub fn new(excluded: &'a [String]) -> Self {
        Self { excluded }
    }

    /// Every non-override, non-excluded declaration with its span.
    /// Declarations nested inside other declarations are reported too.
    pub fn scan(&self, text: &str) -> Vec<FunctionDeclaration> {
        let lines: Vec<&str> = split_lines(text).into_iter().map(strip_eol).collect();
        let mut declarations = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if is_override(trimmed) || follows_override_annotation(&lines, i) {
                continue;
            }

            let Some(caps) = declaration_pattern().captures(trimmed) else {
                continue;
            };
            let name = caps[1].to_string();
            if self.excluded.iter().any(|e| *e == name) {
                continue;
            }

            // The match ends on the `(` that opens this function's own parameters
            let indent = line.len() - line.trim_start().len();
            let params_at = indent + caps[0].len() - 1;

            let (end_line, body) = locate_span(&lines, i, params_at);
            declarations.push(FunctionDeclaration {
                name,
                start_line: i,
                end_line,
                body,
            });
        }

        declarations
    }
}

fn is_override(trimmed: &str) -> bool {
    trimmed.contains("override") || trimmed.contains("@Override")
}

/// Java usually puts `@Override` on its own line above the signature
fn follows_override_annotation(lines: &[&str], index: usize) -> bool {
    lines[..index]
        .iter()
        .rev()
        .map(|l| l.trim())
        .take_while(|l| l.starts_with('@'))
        .any(|l| l.starts_with("@Override"))
}

/// End line and body kind of the declaration starting at `start`, whose
/// parameter list opens at byte `params_at` of that line
pub fn locate_span(lines: &[&str], start: usize, params_at: usize) -> (usize, BodyKind) {
    match signature_shape(lines, start, params_at) {
        Shape::Block => (block_end(lines, start), BodyKind::Block),
        Shape::Expression(end) => (end, BodyKind::Expression),
        Shape::Bodyless(end) => (end, BodyKind::Bodyless),
    }
}

/// Brace-balance matcher: the first line at or after `start` where the running
/// count of `{` minus `}` is <= 0 and the line closes a brace.
pub fn block_end(lines: &[&str], start: usize) -> usize {
    let mut scanner = CodeScanner::new();
    let mut count: i64 = 0;

    for (j, line) in lines.iter().enumerate().skip(start) {
        let (opens, closes) = scanner.braces(line);
        count += opens as i64 - closes as i64;
        if count <= 0 && closes > 0 {
            return j;
        }
    }

    lines.len().saturating_sub(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Block,
    Expression(usize),
    Bodyless(usize),
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Params { depth: i32 },
    Tail,
    Expression { depth: i32, seen_token: bool },
}

struct SignatureWalker {
    phase: Phase,
    line: usize,
    tail_line: usize,
    outcome: Option<Shape>,
}

impl SignatureWalker {
    fn feed(&mut self, c: char) {
        if self.outcome.is_some() {
            return;
        }

        match self.phase {
            Phase::Params { depth } => match c {
                '(' => self.phase = Phase::Params { depth: depth + 1 },
                ')' if depth <= 1 => {
                    self.phase = Phase::Tail;
                    self.tail_line = self.line;
                }
                ')' => self.phase = Phase::Params { depth: depth - 1 },
                _ => {}
            },
            Phase::Tail => match c {
                '{' => self.outcome = Some(Shape::Block),
                '=' => {
                    self.phase = Phase::Expression {
                        depth: 0,
                        seen_token: false,
                    }
                }
                ';' | '}' => self.outcome = Some(Shape::Bodyless(self.line)),
                c if c.is_whitespace() => {}
                _ => self.tail_line = self.line,
            },
            Phase::Expression { depth, seen_token } => {
                let depth = match c {
                    '(' | '[' | '{' => depth + 1,
                    ')' | ']' | '}' => depth - 1,
                    _ => depth,
                };
                self.phase = Phase::Expression {
                    depth,
                    seen_token: seen_token || !c.is_whitespace(),
                };
            }
        }
    }
}

fn continues_signature(trimmed: &str) -> bool {
    ["{", "=", ":", "throws", "where"]
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

/// Classify the declaration by the first code token after its parameter list
fn signature_shape(lines: &[&str], start: usize, params_at: usize) -> Shape {
    let mut scanner = CodeScanner::new();
    let mut walker = SignatureWalker {
        phase: Phase::Params { depth: 0 },
        line: start,
        tail_line: start,
        outcome: None,
    };

    for (j, line) in lines.iter().enumerate().skip(start) {
        walker.line = j;

        if j > start && matches!(walker.phase, Phase::Tail) {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            if !continues_signature(trimmed) {
                return Shape::Bodyless(walker.tail_line);
            }
        }

        // Annotation arguments before the parameter list are not parameters
        let code = if j == start {
            line.get(params_at..).unwrap_or(line)
        } else {
            line
        };
        scanner.scan_line(code, |c| walker.feed(c));

        if let Some(shape) = walker.outcome {
            return shape;
        }
        if let Phase::Expression {
            depth,
            seen_token: true,
        } = walker.phase
        {
            if depth <= 0 {
                return Shape::Expression(j);
            }
        }
    }

    match walker.phase {
        Phase::Params { .. } => Shape::Bodyless(start),
        Phase::Tail => Shape::Bodyless(walker.tail_line),
        Phase::Expression { .. } => Shape::Expression(lines.len().saturating_sub(1)),
    }
}
