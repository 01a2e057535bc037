use crate::{
    error::LexicalError,
    token::{Token, TokenKind},
};

/// Turns source lines into tokens, one per call, on demand.
///
/// Every line ends with an [`TokenKind::EndOfLine`] token and the session ends
/// with a single [`TokenKind::EndOfStream`]. Asking for another token after
/// that is an error.
#[derive(Debug, Clone)]
pub struct Lexer {
    lines: Vec<Vec<char>>,
    line: usize,
    offset: usize,
    sent_last_eol: bool,
    finished: bool,
}

impl Lexer {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Lexer {
            lines: lines
                .into_iter()
                .map(|line| line.as_ref().chars().collect())
                .collect(),
            line: 0,
            offset: 0,
            sent_last_eol: false,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        if self.finished {
            return Err(LexicalError::ReadPastEnd);
        }
        if self.lines.is_empty() {
            self.finished = true;
            return Token::new(TokenKind::EndOfStream, "", 1, 1);
        }

        self.skip_whitespace();

        let token = match self.peek() {
            None => self.end_of_line()?,
            Some(ch) => {
                if let Some(kind) = TokenKind::from_punct(ch) {
                    let token = self.token(kind, ch.to_string(), self.offset)?;
                    self.offset += 1;
                    token
                } else if ch.is_ascii_digit() || ch == '.' {
                    self.number()?
                } else {
                    return Err(LexicalError::UnexpectedCharacter {
                        ch,
                        line: position(self.line),
                        column: position(self.offset),
                    });
                }
            }
        };

        tracing::trace!(%token, "lexed");
        Ok(token)
    }

    fn current(&self) -> &[char] {
        &self.lines[self.line]
    }

    fn peek(&self) -> Option<char> {
        self.current().get(self.offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.offset += 1;
        }
    }

    fn end_of_line(&mut self) -> Result<Token, LexicalError> {
        if self.sent_last_eol {
            self.finished = true;
            return self.token(TokenKind::EndOfStream, "", self.offset);
        }

        let token = self.token(TokenKind::EndOfLine, "", self.offset)?;
        if self.line + 1 == self.lines.len() {
            self.sent_last_eol = true;
        } else {
            self.line += 1;
            self.offset = 0;
        }
        Ok(token)
    }

    /// Scans `digits`, `digits.digits?` or `.digits?`. The text is exactly the
    /// consumed slice; a lone `.` is accepted here and rejected on evaluation.
    fn number(&mut self) -> Result<Token, LexicalError> {
        let start = self.offset;
        self.skip_digits();

        let kind = if self.peek() == Some('.') {
            self.offset += 1;
            self.skip_digits();
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };

        let text: String = self.current()[start..self.offset].iter().collect();
        self.token(kind, text, start)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.offset += 1;
        }
    }

    fn token(
        &self,
        kind: TokenKind,
        text: impl Into<String>,
        offset: usize,
    ) -> Result<Token, LexicalError> {
        Token::new(kind, text, position(self.line), position(offset))
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        Some(self.next_token())
    }
}

/// 0-based index to 1-based position.
fn position(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use quickcheck::{TestResult, quickcheck};

    use super::*;

    fn kinds(lines: &[&str]) -> Vec<TokenKind> {
        Lexer::new(lines)
            .map(|tok| tok.unwrap().kind())
            .collect()
    }

    #[test]
    fn single_line_expression() {
        use TokenKind::*;
        assert_eq!(
            kinds(&["2 + 3 * (4 - 1) ^ 2 / 7"]),
            vec![
                IntLiteral, Plus, IntLiteral, Times, LParen, IntLiteral, Minus, IntLiteral,
                RParen, Caret, IntLiteral, Divide, IntLiteral, EndOfLine, EndOfStream,
            ]
        );
    }

    #[test]
    fn every_line_gets_an_end_of_line() {
        use TokenKind::*;
        assert_eq!(
            kinds(&["1", "", "2"]),
            vec![IntLiteral, EndOfLine, EndOfLine, IntLiteral, EndOfLine, EndOfStream]
        );
    }

    #[test]
    fn empty_program_is_just_end_of_stream() {
        let empty: [&str; 0] = [];
        let mut lexer = Lexer::new(empty);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind(), TokenKind::EndOfStream);
        assert_eq!((tok.line(), tok.column()), (1, 1));
        assert!(lexer.is_finished());
    }

    #[test]
    fn reading_past_end_is_an_error() {
        let mut lexer = Lexer::new(["7"]);
        for _ in 0..3 {
            lexer.next_token().unwrap();
        }
        assert!(lexer.is_finished());
        assert_eq!(lexer.next_token(), Err(LexicalError::ReadPastEnd));
        assert_eq!(lexer.next_token(), Err(LexicalError::ReadPastEnd));
    }

    #[test]
    fn iterator_stops_after_end_of_stream() {
        let mut lexer = Lexer::new(["1 +"]);
        let tokens: Vec<Token> = lexer.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens.last().map(Token::kind), Some(TokenKind::EndOfStream));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn columns_are_one_based() {
        let tokens: Vec<Token> = Lexer::new(["  12 +x"])
            .take(2)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!((tokens[0].line(), tokens[0].column()), (1, 3));
        assert_eq!(tokens[0].text(), "12");
        assert_eq!((tokens[1].line(), tokens[1].column()), (1, 6));
    }

    #[test]
    fn end_markers_sit_one_past_the_line() {
        let tokens: Vec<Token> = Lexer::new(["1+2", "33  "])
            .collect::<Result<_, _>>()
            .unwrap();
        let eols: Vec<_> = tokens
            .iter()
            .filter(|tok| !tok.kind().is_literal() && tok.text().is_empty())
            .map(|tok| (tok.kind(), tok.line(), tok.column()))
            .collect();
        assert_eq!(
            eols,
            vec![
                (TokenKind::EndOfLine, 1, 4),
                (TokenKind::EndOfLine, 2, 5),
                (TokenKind::EndOfStream, 2, 5),
            ]
        );
    }

    #[test]
    fn number_forms() {
        let tokens: Vec<Token> = Lexer::new(["5 5. .5 5.5 . 007"])
            .collect::<Result<_, _>>()
            .unwrap();
        let lexemes: Vec<_> = tokens
            .iter()
            .filter(|tok| tok.kind().is_literal())
            .map(|tok| (tok.kind(), tok.text()))
            .collect();
        assert_eq!(
            lexemes,
            vec![
                (TokenKind::IntLiteral, "5"),
                (TokenKind::FloatLiteral, "5."),
                (TokenKind::FloatLiteral, ".5"),
                (TokenKind::FloatLiteral, "5.5"),
                (TokenKind::FloatLiteral, "."),
                (TokenKind::IntLiteral, "007"),
            ]
        );
    }

    #[test]
    fn second_dot_starts_a_new_literal() {
        let tokens: Vec<Token> = Lexer::new(["1.2.3"]).collect::<Result<_, _>>().unwrap();
        assert_eq!(tokens[0].text(), "1.2");
        assert_eq!(tokens[1].text(), ".3");
        assert_eq!(tokens[1].column(), 4);
    }

    #[test]
    fn right_paren_keeps_its_own_text() {
        let tokens: Vec<Token> = Lexer::new(["(1)"]).collect::<Result<_, _>>().unwrap();
        assert_eq!(tokens[2].kind(), TokenKind::RParen);
        assert_eq!(tokens[2].text(), ")");
    }

    #[test]
    fn unexpected_character_reports_position() {
        let mut lexer = Lexer::new(["1", "5 $ 3"]);
        let err = lexer.find_map(Result::err).unwrap();
        assert_eq!(
            err,
            LexicalError::UnexpectedCharacter {
                ch: '$',
                line: 2,
                column: 3
            }
        );
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let err = Lexer::new(["1 + é"]).find_map(Result::err).unwrap();
        assert_eq!(
            err,
            LexicalError::UnexpectedCharacter {
                ch: 'é',
                line: 1,
                column: 5
            }
        );
    }

    const ALPHABET: &[char] = &[
        '+', '-', '*', '/', '(', ')', '^', ' ', '\t', '0', '1', '9', '.',
    ];

    fn line_from(picks: &[u8]) -> String {
        picks
            .iter()
            .map(|&pick| ALPHABET[usize::from(pick) % ALPHABET.len()])
            .collect()
    }

    #[test]
    fn punct_text_matches_source_character() {
        fn prop(picks: Vec<u8>) -> bool {
            let line = line_from(&picks);
            let chars: Vec<char> = line.chars().collect();
            Lexer::new([line.as_str()]).all(|tok| {
                let tok = tok.unwrap();
                match tok.text().chars().next() {
                    Some(ch) if TokenKind::from_punct(ch).is_some() => {
                        tok.text().chars().count() == 1
                            && chars[tok.column() as usize - 1] == ch
                            && TokenKind::from_punct(ch) == Some(tok.kind())
                    }
                    _ => true,
                }
            })
        }
        quickcheck(prop as fn(Vec<u8>) -> bool);
    }

    #[test]
    fn exactly_one_end_of_stream_and_it_is_last() {
        fn prop(lines: Vec<Vec<u8>>) -> TestResult {
            if lines.len() > 20 {
                return TestResult::discard();
            }
            let lines: Vec<String> = lines.iter().map(|picks| line_from(picks)).collect();
            let tokens = match Lexer::new(&lines).collect::<Result<Vec<Token>, _>>() {
                Ok(tokens) => tokens,
                Err(_) => return TestResult::failed(),
            };
            let eos = tokens
                .iter()
                .filter(|tok| tok.kind() == TokenKind::EndOfStream)
                .count();
            let eol = tokens
                .iter()
                .filter(|tok| tok.kind() == TokenKind::EndOfLine)
                .count();
            TestResult::from_bool(
                eos == 1
                    && tokens.last().map(Token::kind) == Some(TokenKind::EndOfStream)
                    && eol == lines.len()
                    && tokens.iter().all(|tok| tok.line() >= 1 && tok.column() >= 1),
            )
        }
        quickcheck(prop as fn(Vec<Vec<u8>>) -> TestResult);
    }
}
