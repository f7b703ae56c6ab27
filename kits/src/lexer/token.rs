//! Token definitions

use logos::Logos;

use crate::interp::Value;

/// Resolve the character after a backslash in a char or string literal
fn unescape(ch: char) -> Option<char> {
    match ch {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        '0' => Some('\0'),
        _ => None,
    }
}

/// Strip the quotes from a literal slice and resolve its escapes.
/// `None` on an unknown escape sequence.
fn unquote(slice: &str) -> Option<String> {
    let inner = &slice[1..slice.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            result.push(unescape(chars.next()?)?);
        } else {
            result.push(c);
        }
    }
    Some(result)
}

/// kits token
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // Declaration keywords
    #[token("let")]
    Let,
    #[token("subr")]
    Subr,
    #[token("struct")]
    Struct,
    #[token("enum")]
    Enum,
    #[token("union")]
    Union,
    #[token("tool")]
    Tool,
    #[token("kit")]
    Kit,

    // Statement keywords
    #[token("check")]
    Check,
    #[token("recheck")]
    Recheck,
    #[token("on")]
    On,
    #[token("only")]
    Only,
    #[token("case")]
    Case,
    #[token("then")]
    Then,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("return")]
    Return,

    // Lexed but not part of the grammar
    #[token("const")]
    Const,
    #[token("import")]
    Import,
    #[token("typeof")]
    Typeof,
    #[token("sizeof")]
    Sizeof,

    // Type keywords
    #[token("int")]
    TyInt,
    #[token("short")]
    TyShort,
    #[token("long")]
    TyLong,
    #[token("float")]
    TyFloat,
    #[token("double")]
    TyDouble,
    #[token("bool")]
    TyBool,
    #[token("char")]
    TyChar,
    #[token("string")]
    TyString,
    #[token("void")]
    TyVoid,

    // Literals
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f32>().ok(), priority = 3)]
    FloatLit(f32),

    // out-of-range literals fail here and surface as a lexical error
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i32>().ok(), priority = 2)]
    IntLit(i32),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    StringLit(String),

    #[regex(r"'([^'\\]|\\.)'", |lex| {
        let text = unquote(lex.slice())?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    })]
    CharLit(char),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    // Operators
    #[token("++")]
    PlusPlus,
    #[token("+=")]
    PlusEq,
    #[token("+")]
    Plus,
    #[token("--")]
    MinusMinus,
    #[token("-=")]
    MinusEq,
    #[token("-")]
    Minus,
    #[token("**")]
    StarStar,
    #[token("*=")]
    StarEq,
    #[token("*")]
    Star,
    #[token("/=")]
    SlashEq,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&&")]
    AmpAmp,
    #[token("&=")]
    AmpEq,
    #[token("&")]
    Amp,
    #[token("||")]
    PipePipe,
    #[token("|=")]
    PipeEq,
    #[token("|")]
    Pipe,
    #[token("^=")]
    CaretEq,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("!")]
    Bang,

    // Access operators
    #[token("->")]
    Arrow,
    #[token(".")]
    Dot,
    #[token("?.")]
    QuestionDot,
    #[token("?")]
    Question,
    #[token("::")]
    ColonColon,
    #[token("$")]
    Dollar,
    #[token(":")]
    Colon,

    // Delimiters
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
}

impl Token {
    /// The value a literal token carries
    pub fn literal_value(&self) -> Option<Value> {
        match self {
            Token::IntLit(n) => Some(Value::Int(*n)),
            Token::FloatLit(x) => Some(Value::Float(*x)),
            Token::CharLit(c) => Some(Value::Char(*c)),
            Token::StringLit(s) => Some(Value::Str(s.clone())),
            Token::True => Some(Value::Bool(true)),
            Token::False => Some(Value::Bool(false)),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        self.literal_value().is_some()
    }

    /// Symbolic kind name, used in diagnostics and the token trace
    pub fn name(&self) -> &'static str {
        match self {
            Token::Let => "Let",
            Token::Subr => "Subr",
            Token::Struct => "Struct",
            Token::Enum => "Enum",
            Token::Union => "Union",
            Token::Tool => "Tool",
            Token::Kit => "Kit",
            Token::Check => "Check",
            Token::Recheck => "Recheck",
            Token::On => "On",
            Token::Only => "Only",
            Token::Case => "Case",
            Token::Then => "Then",
            Token::If => "If",
            Token::Else => "Else",
            Token::While => "While",
            Token::For => "For",
            Token::Return => "Return",
            Token::Const => "Const",
            Token::Import => "Import",
            Token::Typeof => "Typeof",
            Token::Sizeof => "Sizeof",
            Token::TyInt
            | Token::TyShort
            | Token::TyLong
            | Token::TyFloat
            | Token::TyDouble
            | Token::TyBool
            | Token::TyChar
            | Token::TyString
            | Token::TyVoid => "KwType",
            Token::True | Token::False => "BoolLit",
            Token::FloatLit(_) => "FloatLit",
            Token::IntLit(_) => "IntLit",
            Token::StringLit(_) => "StringLit",
            Token::CharLit(_) => "CharLit",
            Token::Ident(_) => "Ident",
            Token::PlusPlus => "PlusPlus",
            Token::PlusEq => "PlusEq",
            Token::Plus => "Plus",
            Token::MinusMinus => "MinusMinus",
            Token::MinusEq => "MinusEq",
            Token::Minus => "Minus",
            Token::StarStar => "StarStar",
            Token::StarEq => "StarEq",
            Token::Star => "Star",
            Token::SlashEq => "SlashEq",
            Token::Slash => "Slash",
            Token::Percent => "Percent",
            Token::AmpAmp => "AmpAmp",
            Token::AmpEq => "AmpEq",
            Token::Amp => "Amp",
            Token::PipePipe => "PipePipe",
            Token::PipeEq => "PipeEq",
            Token::Pipe => "Pipe",
            Token::CaretEq => "CaretEq",
            Token::Caret => "Caret",
            Token::Tilde => "Tilde",
            Token::LtEq => "LtEq",
            Token::Lt => "Lt",
            Token::GtEq => "GtEq",
            Token::Gt => "Gt",
            Token::EqEq => "EqEq",
            Token::Eq => "Eq",
            Token::NotEq => "NotEq",
            Token::Bang => "Bang",
            Token::Arrow => "Arrow",
            Token::Dot => "Dot",
            Token::QuestionDot => "QuestionDot",
            Token::Question => "Question",
            Token::ColonColon => "ColonColon",
            Token::Dollar => "Dollar",
            Token::Colon => "Colon",
            Token::Semi => "Semi",
            Token::Comma => "Comma",
            Token::LParen => "LParen",
            Token::RParen => "RParen",
            Token::LBrace => "LBrace",
            Token::RBrace => "RBrace",
        }
    }

    /// Name of the built-in type a type keyword denotes
    pub fn type_keyword(&self) -> Option<&'static str> {
        match self {
            Token::TyInt => Some("int"),
            Token::TyShort => Some("short"),
            Token::TyLong => Some("long"),
            Token::TyFloat => Some("float"),
            Token::TyDouble => Some("double"),
            Token::TyBool => Some("bool"),
            Token::TyChar => Some("char"),
            Token::TyString => Some("string"),
            Token::TyVoid => Some("void"),
            _ => None,
        }
    }

    /// True for the keywords that open a declaration
    pub fn starts_declaration(&self) -> bool {
        matches!(
            self,
            Token::Let
                | Token::Subr
                | Token::Struct
                | Token::Enum
                | Token::Union
                | Token::Tool
                | Token::Kit
        )
    }
}
