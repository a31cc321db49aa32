//! SQL Lexer - Splits statement text into a flat stream of tokens

use std::{fmt::Display, iter::Peekable, str::Chars};

/// Represents a single lexical token in the SQL input
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Any run of characters that is not a separator: keywords, names,
    /// numbers and operators alike
    Word(String),
    /// Content of a single- or double-quoted span, quotes stripped
    Quoted(String),
    OpenParen,
    CloseParen,
    Comma,
    Semicolon,
}

impl Token {
    /// Text of the token as the statement spelled it
    pub fn as_str(&self) -> &str {
        match self {
            Token::Word(w) => w,
            Token::Quoted(q) => q,
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Comma => ",",
            Token::Semicolon => ";",
        }
    }

    /// Case-insensitive keyword check; quoted tokens are never keywords
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL lexical analyzer
///
/// Never fails: an unterminated quote swallows the rest of the input.
pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan()
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given SQL text
    pub fn new(sql_text: &'a str) -> Self {
        Self {
            iter: sql_text.chars().peekable(),
        }
    }

    /// Consumes the next character if it satisfies the predicate
    fn next_if<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<char> {
        self.iter.peek().filter(|&c| predicate(*c))?;
        self.iter.next()
    }

    /// Consumes consecutive characters while they satisfy the predicate
    fn next_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<String> {
        let mut value = String::new();
        while let Some(c) = self.next_if(&predicate) {
            value.push(c);
        }
        Some(value).filter(|v| !v.is_empty())
    }

    /// Removes whitespace from the input stream
    fn erase_whitespace(&mut self) {
        self.next_while(|c| c.is_whitespace());
    }

    /// Scans and returns the next token
    fn scan(&mut self) -> Option<Token> {
        self.erase_whitespace();
        match self.iter.peek()? {
            '(' | ')' | ',' | ';' => self.scan_symbol(),
            _ => self.scan_word(),
        }
    }

    /// Scans a single-character punctuation token
    fn scan_symbol(&mut self) -> Option<Token> {
        Some(match self.iter.next()? {
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            ',' => Token::Comma,
            _ => Token::Semicolon,
        })
    }

    /// Scans a word. Text before a quote joins the quoted span, and the
    /// closing quote ends the token.
    fn scan_word(&mut self) -> Option<Token> {
        let mut val = self
            .next_while(|c| !is_separator(c) && c != '\'' && c != '"')
            .unwrap_or_default();

        match self.next_if(|c| c == '\'' || c == '"') {
            Some(quote) => {
                while let Some(c) = self.iter.next() {
                    if c == quote {
                        return Some(Token::Quoted(val));
                    }
                    val.push(c);
                }
                Some(Token::Quoted(val)).filter(|t| !t.as_str().is_empty())
            }
            None => Some(Token::Word(val)),
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ',' | ';')
}

#[cfg(test)]
mod tests {
    use super::{Lexer, Token};

    fn texts(sql: &str) -> Vec<String> {
        Lexer::new(sql).map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_lexer_insert_into() {
        assert_eq!(
            texts("INSERT INTO users VALUES (1, 'Alice', 25, TRUE)"),
            vec!["INSERT", "INTO", "users", "VALUES", "(", "1", ",", "Alice", ",", "25", ",", "TRUE", ")"]
        );
        let without_commas = Lexer::new("INSERT INTO users VALUES (1, 'Alice', 25, TRUE)")
            .filter(|t| *t != Token::Comma)
            .map(|t| t.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            without_commas,
            vec!["INSERT", "INTO", "users", "VALUES", "(", "1", "Alice", "25", "TRUE", ")"]
        );

        let tokens = Lexer::new("insert into tbl (id, name) values (100, \"db\");").collect::<Vec<_>>();
        assert_eq!(
            tokens,
            vec![
                Token::Word("insert".to_string()),
                Token::Word("into".to_string()),
                Token::Word("tbl".to_string()),
                Token::OpenParen,
                Token::Word("id".to_string()),
                Token::Comma,
                Token::Word("name".to_string()),
                Token::CloseParen,
                Token::Word("values".to_string()),
                Token::OpenParen,
                Token::Word("100".to_string()),
                Token::Comma,
                Token::Quoted("db".to_string()),
                Token::CloseParen,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_lexer_create_table() {
        assert_eq!(
            texts(
                "CREATE table tbl
                    (
                        id int primary key,
                        name VARCHAR(50) NOT NULL
                    );"
            ),
            vec![
                "CREATE", "table", "tbl", "(", "id", "int", "primary", "key", ",", "name", "VARCHAR",
                "(", "50", ")", "NOT", "NULL", ")", ";"
            ]
        );
    }

    #[test]
    fn test_lexer_quotes() {
        // spaces, commas and parens inside quotes are literal
        assert_eq!(
            Lexer::new("'a, (b) c'").collect::<Vec<_>>(),
            vec![Token::Quoted("a, (b) c".to_string())]
        );
        // the other quote kind is literal inside a quoted span
        assert_eq!(
            Lexer::new(r#""it's" 'say "hi"'"#).collect::<Vec<_>>(),
            vec![Token::Quoted("it's".to_string()), Token::Quoted("say \"hi\"".to_string())]
        );
        assert_eq!(Lexer::new("''").collect::<Vec<_>>(), vec![Token::Quoted(String::new())]);
        // unterminated quote consumes the rest of the input
        assert_eq!(
            Lexer::new("name = 'Bob ; x").collect::<Vec<_>>(),
            vec![
                Token::Word("name".to_string()),
                Token::Word("=".to_string()),
                Token::Quoted("Bob ; x".to_string()),
            ]
        );
        assert_eq!(texts("abc'def'"), vec!["abcdef"]);
    }

    #[test]
    fn test_lexer_operators_stay_attached() {
        assert_eq!(texts("age>=25"), vec!["age>=25"]);
        assert_eq!(texts("age >= 25;"), vec!["age", ">=", "25", ";"]);
        assert_eq!(texts("select * from t"), vec!["select", "*", "from", "t"]);
        assert!(texts("   \n\t").is_empty());
    }

    #[test]
    fn test_token_keyword() {
        assert!(Token::Word("values".to_string()).is_keyword("VALUES"));
        assert!(!Token::Quoted("VALUES".to_string()).is_keyword("VALUES"));
    }
}
