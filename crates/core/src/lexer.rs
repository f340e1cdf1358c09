use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifiers, command names and keyword-like commands alike
    Ident,
    /// Decimal, exponent or hex (`0x`, `$`) literal
    Number,
    /// Quoted string literal, quotes included in the token text
    Str,
    /// `=`
    Assign,
    Semicolon,
    Comma,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    /// Symbolic operators: `== != >= <= && || >> > < ! + - * / % ^ # :`
    Operator,
    /// Anything the lexer could not make sense of; reported by the parser
    Invalid,
    Eof,
}

impl TokenKind {
    /// Human readable name used in syntax error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::Assign => "'='",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Operator => "operator",
            TokenKind::Invalid => "invalid input",
            TokenKind::Eof => "end of input",
        }
    }
}

/// Source range of a token. Lines and columns are 1-based; the end column
/// is the column of the last character (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub begin_line: u32,
    pub begin_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Span {
    pub fn new(begin_line: u32, begin_column: u32, end_line: u32, end_column: u32) -> Self {
        Span {
            begin_line,
            begin_column,
            end_line,
            end_column,
        }
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            begin_line: self.begin_line,
            begin_column: self.begin_column,
            end_line: other.end_line,
            end_column: other.end_column,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Raw comment text, delimiters included
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// Comment directly preceding this token, if any
    pub comment: Option<Comment>,
}

impl Token {
    /// Case-folded identifier used as the key for every lookup table.
    pub fn identifier(&self) -> String {
        self.text.to_ascii_lowercase()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Content of a string literal with the quotes removed and doubled
    /// quotes collapsed. `None` for any other token kind.
    pub fn string_value(&self) -> Option<String> {
        if self.kind != TokenKind::Str || self.text.len() < 2 {
            return None;
        }
        let quote = &self.text[..1];
        let inner = &self.text[1..self.text.len() - 1];
        Some(inner.replace(&format!("{quote}{quote}"), quote))
    }

    /// Why an `Invalid` token was produced.
    pub fn invalid_reason(&self) -> String {
        if self.text.starts_with('"') || self.text.starts_with('\'') {
            "unterminated string literal".to_string()
        } else if self.text.starts_with("/*") {
            "unterminated block comment".to_string()
        } else {
            format!("unexpected character '{}'", self.text)
        }
    }
}

const TWO_CHAR_OPERATORS: [&str; 7] = ["==", "!=", ">=", "<=", "&&", "||", ">>"];
const ONE_CHAR_OPERATORS: &str = "><!+-*/%^#:";

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    /// Line/column of the most recently consumed character
    last: (u32, u32),
    pending_comment: Option<Comment>,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(src: &str) -> Self {
        Lexer {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            last: (1, 0),
            pending_comment: None,
            tokens: Vec::new(),
        }
    }

    fn at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.at(0)?;
        self.last = (self.line, self.column);
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn text_from(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn span_from(&self, begin: (u32, u32)) -> Span {
        Span::new(begin.0, begin.1, self.last.0, self.last.1)
    }

    fn push(&mut self, kind: TokenKind, start: usize, begin: (u32, u32)) {
        let token = Token {
            kind,
            text: self.text_from(start),
            span: self.span_from(begin),
            comment: self.pending_comment.take(),
        };
        self.tokens.push(token);
    }

    /// Only the first comment of a run is kept for the next token.
    fn note_comment(&mut self, start: usize, begin: (u32, u32)) {
        if self.pending_comment.is_none() {
            self.pending_comment = Some(Comment {
                text: self.text_from(start),
                span: self.span_from(begin),
            });
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.at(0) {
            let start = self.pos;
            let begin = (self.line, self.column);

            if c.is_whitespace() {
                self.bump();
                continue;
            }

            // Line comment
            if c == '/' && self.at(1) == Some('/') {
                while self.at(0).is_some_and(|c| c != '\n') {
                    self.bump();
                }
                self.note_comment(start, begin);
                continue;
            }

            // Block comment
            if c == '/' && self.at(1) == Some('*') {
                self.bump();
                self.bump();
                let mut closed = false;
                while let Some(c) = self.bump() {
                    if c == '*' && self.at(0) == Some('/') {
                        self.bump();
                        closed = true;
                        break;
                    }
                }
                if closed {
                    self.note_comment(start, begin);
                } else {
                    self.push(TokenKind::Invalid, start, begin);
                }
                continue;
            }

            if c == '"' || c == '\'' {
                self.string(c, start, begin);
                continue;
            }

            if self.starts_number() {
                self.number(start, begin);
                continue;
            }

            if c.is_ascii_alphabetic() || c == '_' {
                while self
                    .at(0)
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    self.bump();
                }
                self.push(TokenKind::Ident, start, begin);
                continue;
            }

            if let Some(next) = self.at(1) {
                let pair: String = [c, next].iter().collect();
                if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
                    self.bump();
                    self.bump();
                    self.push(TokenKind::Operator, start, begin);
                    continue;
                }
            }

            let kind = match c {
                '=' => TokenKind::Assign,
                ';' => TokenKind::Semicolon,
                ',' => TokenKind::Comma,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                c if ONE_CHAR_OPERATORS.contains(c) => TokenKind::Operator,
                _ => TokenKind::Invalid,
            };
            self.bump();
            self.push(kind, start, begin);
        }

        let eof_span = Span::new(self.line, self.column, self.line, self.column);
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span: eof_span,
            comment: self.pending_comment.take(),
        });
        self.tokens
    }

    fn starts_number(&self) -> bool {
        match (self.at(0), self.at(1)) {
            (Some(c), _) if c.is_ascii_digit() => true,
            (Some('$'), Some(n)) => n.is_ascii_hexdigit(),
            (Some('.'), Some(n)) => n.is_ascii_digit(),
            _ => false,
        }
    }

    fn number(&mut self, start: usize, begin: (u32, u32)) {
        let hex = (self.at(0) == Some('0') && matches!(self.at(1), Some('x') | Some('X')))
            || self.at(0) == Some('$');
        if hex {
            if self.at(0) == Some('$') {
                self.bump();
            } else {
                self.bump();
                self.bump();
            }
            while self.at(0).is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            self.push(TokenKind::Number, start, begin);
            return;
        }

        while self.at(0).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.at(0) == Some('.') && self.at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            while self.at(0).is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.at(0), Some('e') | Some('E')) {
            let digit_at = if matches!(self.at(1), Some('+') | Some('-')) {
                2
            } else {
                1
            };
            if self.at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.bump();
                }
                while self.at(0).is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            }
        }
        self.push(TokenKind::Number, start, begin);
    }

    /// Strings may span lines; a doubled quote is an escaped quote.
    fn string(&mut self, quote: char, start: usize, begin: (u32, u32)) {
        self.bump();
        loop {
            match self.bump() {
                None => {
                    self.push(TokenKind::Invalid, start, begin);
                    return;
                }
                Some(c) if c == quote => {
                    if self.at(0) == Some(quote) {
                        self.bump();
                    } else {
                        self.push(TokenKind::Str, start, begin);
                        return;
                    }
                }
                Some(_) => {}
            }
        }
    }
}

/// Split source text into tokens. Never fails: malformed input becomes
/// `Invalid` tokens, and the stream always ends with a single `Eof`.
pub fn lex(src: &str) -> Vec<Token> {
    Lexer::new(src).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn assignment_statement() {
        assert_eq!(
            kinds("_a = 5;"),
            vec![
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn comparison_is_not_assignment() {
        let tokens = lex("_a == 5");
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[1].text, "==");
    }

    #[test]
    fn positions_are_one_based_and_inclusive() {
        let tokens = lex("x = 1;\n  _foo");
        let foo = &tokens[4];
        assert_eq!(foo.text, "_foo");
        assert_eq!(foo.span, Span::new(2, 3, 2, 6));
        assert_eq!(tokens[0].span, Span::new(1, 1, 1, 1));
    }

    #[test]
    fn tab_counts_as_one_column() {
        let tokens = lex("\t_a");
        assert_eq!(tokens[0].span.begin_column, 2);
    }

    #[test]
    fn string_with_doubled_quotes() {
        let tokens = lex(r#""say ""hi""" 'it''s'"#);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].string_value().unwrap(), r#"say "hi""#);
        assert_eq!(tokens[1].string_value().unwrap(), "it's");
    }

    #[test]
    fn multiline_string_spans_lines() {
        let tokens = lex("\"a\nb\"");
        assert_eq!(tokens[0].span, Span::new(1, 1, 2, 2));
    }

    #[test]
    fn numbers_in_all_forms() {
        let tokens = lex("1 2.5 .5 1e3 1.5E-2 0xFF $1f");
        let texts: Vec<&str> = tokens[..7].iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["1", "2.5", ".5", "1e3", "1.5E-2", "0xFF", "$1f"]);
        assert!(tokens[..7].iter().all(|t| t.kind == TokenKind::Number));
    }

    #[test]
    fn comment_attaches_to_next_token() {
        let tokens = lex("// the counter\n_count = 0;");
        let comment = tokens[0].comment.as_ref().expect("comment attached");
        assert_eq!(comment.text, "// the counter");
        assert!(tokens[1].comment.is_none());
    }

    #[test]
    fn only_first_of_several_comments_is_kept() {
        let tokens = lex("/* first */\n// second\n_a = 1;");
        assert_eq!(tokens[0].comment.as_ref().unwrap().text, "/* first */");
    }

    #[test]
    fn unterminated_string_is_invalid() {
        let tokens = lex("_a = \"oops");
        assert_eq!(tokens[2].kind, TokenKind::Invalid);
        assert_eq!(tokens[2].invalid_reason(), "unterminated string literal");
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn unterminated_block_comment_is_invalid() {
        let tokens = lex("/* never closed");
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(tokens[0].invalid_reason(), "unterminated block comment");
    }

    #[test]
    fn stray_character_is_invalid() {
        let tokens = lex("a ? b");
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(tokens[1].invalid_reason(), "unexpected character '?'");
    }

    #[test]
    fn identifier_is_case_folded() {
        let tokens = lex("_MyVar");
        assert_eq!(tokens[0].identifier(), "_myvar");
        assert_eq!(tokens[0].text, "_MyVar");
    }

    #[test]
    fn symbolic_operators() {
        let tokens = lex("a >> b # 0 : c && !d");
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ops, vec![">>", "#", ":", "&&", "!"]);
    }
}
