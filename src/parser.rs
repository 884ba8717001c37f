use tracing::debug;

use crate::ast::*;
use crate::column::ColumnDef;
use crate::error::{Error, Result};
use crate::tokenizer::{Token, Tokenizer};

/// Tokenizes and parses one statement.
pub fn parse(sql: &str) -> Result<Statement> {
    Parser::new(Tokenizer::new(sql).tokenize()).parse()
}

/// Turns a token sequence into a [Statement].
///
/// The grammar is positional: keywords are looked up at fixed offsets or found by a forward
/// scan, and every failure is reported as [Error::Syntax] without any partial result.
pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Classifies the statement by its leading keyword(s) and parses the rest.
    ///
    /// An unknown leading keyword is not an error here: it yields
    /// [Statement::Unrecognized] and the engine decides what to do with it.
    pub fn parse(&self) -> Result<Statement> {
        let Some(first) = self.tokens.first() else {
            return Ok(Statement::Unrecognized(String::new()));
        };
        let leading = first.to_string().to_lowercase();

        let statement = match leading.as_str() {
            "create" if self.keyword_at(1, "table") => self.parse_create_table()?,
            "insert" => self.parse_insert()?,
            "select" => self.parse_select()?,
            "drop" if self.keyword_at(1, "table") => self.parse_drop_table()?,
            "show" if self.keyword_at(1, "tables") => Statement::ShowTables,
            "describe" | "desc" => self.parse_describe()?,
            _ => Statement::Unrecognized(first.to_string()),
        };
        debug!(?statement, "parsed statement");
        Ok(statement)
    }

    // --- helpers ---

    fn keyword_at(&self, idx: usize, keyword: &str) -> bool {
        self.tokens.get(idx).is_some_and(|t| t.is_keyword(keyword))
    }

    /// Returns the word at `idx`, or a syntax error naming what was expected there.
    fn word_at(&self, idx: usize, expected: &str) -> Result<String> {
        match self.tokens.get(idx) {
            Some(Token::Word(word)) => Ok(word.clone()),
            Some(token) => Err(Error::syntax(format!(
                "expected {expected}, found '{token}'"
            ))),
            None => Err(Error::syntax(format!(
                "expected {expected}, found end of input"
            ))),
        }
    }

    /// Finds the first `(` at or after `from`.
    fn find_open_paren(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| self.tokens[i] == Token::LeftParen)
    }

    /// Finds the first occurrence of `keyword` at or after `from`.
    fn find_keyword(&self, from: usize, keyword: &str) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| self.tokens[i].is_keyword(keyword))
    }

    // --- statements ---

    /// `CREATE TABLE name ( col type [, col type]* )`
    fn parse_create_table(&self) -> Result<Statement> {
        if self.tokens.len() < 4 {
            return Err(Error::syntax(
                "invalid CREATE TABLE syntax, expected CREATE TABLE <name> (<column> <type>, ...)",
            ));
        }
        let name = self.word_at(2, "table name")?;
        let open = self
            .find_open_paren(3)
            .ok_or_else(|| Error::syntax("missing column definitions in CREATE TABLE"))?;

        let mut columns = vec![];
        let mut i = open + 1;
        loop {
            match self.tokens.get(i) {
                Some(Token::RightParen) => break,
                Some(Token::Comma) => i += 1,
                Some(Token::Word(column)) => match self.tokens.get(i + 1) {
                    Some(Token::Word(data_type)) => {
                        columns.push(ColumnDef::new(column.clone(), data_type.parse()?));
                        i += 2;
                    }
                    _ => {
                        return Err(Error::syntax(format!(
                            "column '{column}' has no type in CREATE TABLE"
                        )));
                    }
                },
                Some(Token::LeftParen) => {
                    return Err(Error::syntax("unexpected '(' in column definitions"));
                }
                None => return Err(Error::syntax("missing ')' in CREATE TABLE")),
            }
        }

        if columns.is_empty() {
            return Err(Error::syntax("CREATE TABLE needs at least one column"));
        }
        Ok(Statement::CreateTable(CreateTable { name, columns }))
    }

    /// `INSERT INTO name VALUES ( v [, v]* )`
    fn parse_insert(&self) -> Result<Statement> {
        if self.tokens.len() < 5 {
            return Err(Error::syntax(
                "invalid INSERT syntax, expected INSERT INTO <name> VALUES (<value>, ...)",
            ));
        }
        if !self.keyword_at(1, "into") {
            return Err(Error::syntax("expected 'INTO' after 'INSERT'"));
        }
        let table = self.word_at(2, "table name")?;
        if !self.keyword_at(3, "values") {
            return Err(Error::syntax("expected 'VALUES' in INSERT statement"));
        }
        let open = self
            .find_open_paren(4)
            .ok_or_else(|| Error::syntax("missing values in INSERT statement"))?;

        let mut values = vec![];
        for token in self.tokens.iter().skip(open + 1) {
            match token {
                Token::RightParen => {
                    return Ok(Statement::InsertInto(InsertInto { table, values }));
                }
                Token::Comma => continue,
                Token::Word(value) => values.push(unquote(value).to_string()),
                Token::LeftParen => {
                    return Err(Error::syntax("unexpected '(' in VALUES list"));
                }
            }
        }
        Err(Error::syntax("missing ')' in INSERT statement"))
    }

    /// `SELECT (* | col [, col]*) FROM name [WHERE col op value]`
    fn parse_select(&self) -> Result<Statement> {
        if self.tokens.len() < 4 {
            return Err(Error::syntax(
                "invalid SELECT syntax, expected SELECT <columns> FROM <name> [WHERE <condition>]",
            ));
        }
        let from = self
            .find_keyword(1, "from")
            .ok_or_else(|| Error::syntax("missing 'FROM' in SELECT statement"))?;

        let mut names = vec![];
        let mut star = false;
        for token in &self.tokens[1..from] {
            match token {
                Token::Comma => continue,
                Token::Word(word) if word == "*" => star = true,
                Token::Word(word) => names.push(word.clone()),
                _ => {
                    return Err(Error::syntax(format!(
                        "unexpected '{token}' in column list"
                    )));
                }
            }
        }
        // `*` anywhere in the list, or no list at all, selects every column.
        let columns = if star || names.is_empty() {
            ColumnsSelect::Star
        } else {
            ColumnsSelect::ColumnsNames(names)
        };

        let table = self.word_at(from + 1, "table name after 'FROM'")?;

        let where_clause = match self.find_keyword(from + 2, "where") {
            None => None,
            Some(pos) => Some(self.parse_where(pos)?),
        };

        Ok(Statement::Select(Select {
            columns,
            table,
            where_clause,
        }))
    }

    /// Parses the three tokens following the `WHERE` at `pos`.
    fn parse_where(&self, pos: usize) -> Result<Predicate> {
        let condition = &self.tokens[pos + 1..];
        match condition {
            [column, op, literal] => {
                let literal = literal.to_string();
                Predicate::from_parts(&column.to_string(), &op.to_string(), unquote(&literal))
            }
            [_, _, _, ..] => Err(Error::syntax(
                "only a single 'column operator value' condition is supported in WHERE",
            )),
            _ => Err(Error::syntax(
                "WHERE clause must be 'column operator value'",
            )),
        }
    }

    /// `DROP TABLE name`
    fn parse_drop_table(&self) -> Result<Statement> {
        if self.tokens.len() < 3 {
            return Err(Error::syntax("invalid DROP TABLE syntax, expected DROP TABLE <name>"));
        }
        let name = self.word_at(2, "table name")?;
        Ok(Statement::DropTable { name })
    }

    /// `DESCRIBE name` or `DESC name`
    fn parse_describe(&self) -> Result<Statement> {
        if self.tokens.len() < 2 {
            return Err(Error::syntax("invalid DESCRIBE syntax, expected DESCRIBE <name>"));
        }
        let name = self.word_at(1, "table name")?;
        Ok(Statement::Describe { name })
    }
}

/// Strips one layer of matching straight quotes wrapping the whole text.
fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;

    #[test]
    fn test_parse_create_table() {
        let statement = parse("CREATE TABLE users (id int, name string, age int)").unwrap();

        match statement {
            Statement::CreateTable(ct) => {
                assert_eq!(ct.name, "users");
                assert_eq!(
                    ct.columns,
                    vec![
                        ColumnDef::new("id", DataType::Int),
                        ColumnDef::new("name", DataType::String),
                        ColumnDef::new("age", DataType::Int),
                    ]
                );
            }
            _ => panic!("Expected CreateTable"),
        }
    }

    #[test]
    fn test_parse_create_table_case_and_aliases() {
        let statement = parse("create Table Items ( price DOUBLE , ok Boolean );").unwrap();

        assert_eq!(
            statement,
            Statement::CreateTable(CreateTable {
                name: "Items".into(),
                columns: vec![
                    ColumnDef::new("price", DataType::Double),
                    ColumnDef::new("ok", DataType::Bool),
                ],
            })
        );
    }

    #[test]
    fn test_create_table_errors() {
        // too short
        assert!(matches!(parse("CREATE TABLE t"), Err(Error::Syntax(_))));
        // no parenthesis
        assert!(matches!(parse("CREATE TABLE t id int"), Err(Error::Syntax(_))));
        // dangling column without a type
        assert!(matches!(
            parse("CREATE TABLE t (id int, name)"),
            Err(Error::Syntax(_))
        ));
        // unknown type
        assert!(matches!(
            parse("CREATE TABLE t (id uuid)"),
            Err(Error::Syntax(_))
        ));
        // unterminated
        assert!(matches!(
            parse("CREATE TABLE t (id int"),
            Err(Error::Syntax(_))
        ));
        // empty column list
        assert!(matches!(parse("CREATE TABLE t ( )"), Err(Error::Syntax(_))));
    }

    #[test]
    fn test_parse_insert() {
        let statement = parse("INSERT INTO users VALUES (1, 'Alice', \"x\", 30)").unwrap();

        assert_eq!(
            statement,
            Statement::InsertInto(InsertInto {
                table: "users".into(),
                values: vec!["1".into(), "Alice".into(), "x".into(), "30".into()],
            })
        );
    }

    #[test]
    fn test_insert_quotes_must_match() {
        let statement = parse("INSERT INTO t VALUES ('a\", \"b)").unwrap();

        assert_eq!(
            statement,
            Statement::InsertInto(InsertInto {
                table: "t".into(),
                values: vec!["'a\"".into(), "\"b".into()],
            })
        );
    }

    #[test]
    fn test_insert_errors() {
        assert!(matches!(parse("INSERT INTO t VALUES"), Err(Error::Syntax(_))));
        assert!(matches!(
            parse("INSERT t VALUES (1, 2)"),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(
            parse("INSERT INTO t (1, 2) VALUES"),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(
            parse("INSERT INTO t VALUES 1 2"),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(
            parse("INSERT INTO t VALUES (1, 2"),
            Err(Error::Syntax(_))
        ));
    }

    #[test]
    fn test_parse_select_star() {
        let statement = parse("SELECT * FROM users").unwrap();

        assert_eq!(
            statement,
            Statement::Select(Select {
                columns: ColumnsSelect::Star,
                table: "users".into(),
                where_clause: None,
            })
        );
    }

    #[test]
    fn test_parse_select_columns_and_where() {
        let statement = parse("select name, age from users where age >= 26").unwrap();

        assert_eq!(
            statement,
            Statement::Select(Select {
                columns: ColumnsSelect::ColumnsNames(vec!["name".into(), "age".into()]),
                table: "users".into(),
                where_clause: Some(Predicate {
                    column: "age".into(),
                    op: ComparisonOp::GtEq,
                    literal: "26".into(),
                }),
            })
        );
    }

    #[test]
    fn test_star_amid_names_selects_all() {
        let statement = parse("SELECT id, *, name FROM users").unwrap();

        assert!(matches!(
            statement,
            Statement::Select(Select {
                columns: ColumnsSelect::Star,
                ..
            })
        ));
    }

    #[test]
    fn test_where_literal_is_unquoted() {
        let Statement::Select(select) = parse("SELECT * FROM users WHERE name = 'Bob'").unwrap()
        else {
            panic!("Expected Select");
        };

        assert_eq!(select.where_clause.unwrap().literal, "Bob");
    }

    #[test]
    fn test_where_rejects_trailing_tokens() {
        for sql in [
            "SELECT * FROM cities WHERE name = 'New York'",
            "SELECT * FROM users WHERE age > 20 AND age < 30",
        ] {
            let err = parse(sql).unwrap_err();
            assert!(matches!(err, Error::Syntax(_)), "{sql}");
            assert!(err.to_string().contains("only a single"), "{sql}");
        }
    }

    #[test]
    fn test_select_errors() {
        assert!(matches!(parse("SELECT * FROM"), Err(Error::Syntax(_))));
        assert!(matches!(
            parse("SELECT id name users x"),
            Err(Error::Syntax(_))
        ));
        // incomplete condition
        assert!(matches!(
            parse("SELECT * FROM users WHERE age >"),
            Err(Error::Syntax(_))
        ));
        // compound conditions are not part of the grammar
        assert!(matches!(
            parse("SELECT * FROM users WHERE age > 1 AND id = 2"),
            Err(Error::Syntax(_))
        ));
        // unknown operator
        assert!(matches!(
            parse("SELECT * FROM users WHERE age ~ 1"),
            Err(Error::Syntax(_))
        ));
    }

    #[test]
    fn test_parse_drop_show_describe() {
        assert_eq!(
            parse("DROP TABLE users").unwrap(),
            Statement::DropTable {
                name: "users".into()
            }
        );
        assert_eq!(parse("show tables").unwrap(), Statement::ShowTables);
        assert_eq!(
            parse("DESC users").unwrap(),
            Statement::Describe {
                name: "users".into()
            }
        );
        assert_eq!(
            parse("describe users").unwrap(),
            Statement::Describe {
                name: "users".into()
            }
        );
        assert!(matches!(parse("DROP TABLE"), Err(Error::Syntax(_))));
        assert!(matches!(parse("DESCRIBE"), Err(Error::Syntax(_))));
    }

    #[test]
    fn test_unrecognized_statements() {
        assert_eq!(
            parse("UPDATE users SET a = 1").unwrap(),
            Statement::Unrecognized("UPDATE".into())
        );
        // a known keyword without its required second keyword
        assert_eq!(
            parse("CREATE INDEX idx").unwrap(),
            Statement::Unrecognized("CREATE".into())
        );
        assert_eq!(
            parse("SHOW users").unwrap(),
            Statement::Unrecognized("SHOW".into())
        );
        assert_eq!(parse("").unwrap(), Statement::Unrecognized(String::new()));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("'a\""), "'a\"");
    }
}
