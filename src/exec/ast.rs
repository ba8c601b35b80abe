// Command tree consumed by the executor

#[derive(Debug, Clone, PartialEq)]
pub enum WordPart {
    Literal(String),
    // $NAME, resolved against the process environment
    Variable(String),
}

/// A string that may need expansion: its parts are concatenated in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Word(pub Vec<WordPart>);

impl Word {
    pub fn literal(s: &str) -> Self {
        Word(vec![WordPart::Literal(s.to_string())])
    }

    pub fn push(&mut self, part: WordPart) {
        // Merge adjacent literals so "a""b" stays a single part
        if let (WordPart::Literal(new), Some(WordPart::Literal(last))) =
            (&part, self.0.last_mut())
        {
            last.push_str(new);
            return;
        }
        self.0.push(part);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub target: Word,
    pub append: bool, // >> instead of >; ignored for input
}

impl Redirect {
    pub fn truncate(target: Word) -> Self {
        Self { target, append: false }
    }

    pub fn append(target: Word) -> Self {
        Self { target, append: true }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleCommand {
    pub verb: Option<Word>,
    pub params: Vec<Word>,
    pub input: Option<Redirect>,
    pub output: Option<Redirect>,
    pub error: Option<Redirect>,
}

impl SimpleCommand {
    pub fn new(verb: &str, params: &[&str]) -> Self {
        Self {
            verb: Some(Word::literal(verb)),
            params: params.iter().map(|p| Word::literal(p)).collect(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, redirect: Redirect) -> Self {
        self.input = Some(redirect);
        self
    }

    pub fn with_output(mut self, redirect: Redirect) -> Self {
        self.output = Some(redirect);
        self
    }

    pub fn with_error(mut self, redirect: Redirect) -> Self {
        self.error = Some(redirect);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    None,           // leaf
    Sequential,     // a ; b
    Parallel,       // a & b
    Pipe,           // a | b
    CondOnZero,     // a && b
    CondOnNonZero,  // a || b
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Simple(SimpleCommand),
    Binary {
        op: Operator,
        left: Box<Command>,
        right: Box<Command>,
    },
}

impl Command {
    pub fn simple(verb: &str, params: &[&str]) -> Self {
        Command::Simple(SimpleCommand::new(verb, params))
    }

    pub fn binary(op: Operator, left: Command, right: Command) -> Self {
        Command::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn op(&self) -> Operator {
        match self {
            Command::Simple(_) => Operator::None,
            Command::Binary { op, .. } => *op,
        }
    }
}

impl From<SimpleCommand> for Command {
    fn from(cmd: SimpleCommand) -> Self {
        Command::Simple(cmd)
    }
}
