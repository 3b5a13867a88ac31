//! SQL Parser implementation.

use serde_json::Number;

use super::error::ParseError;
use super::pratt::{
    binary_operator, infix_binding_power, is_postfix, prefix_operator, POSTFIX_BP,
};
use crate::ast::{
    AggrArgs, AggrFunc, ArrayAccess, ArrayLiteral, Assign, Ast, Case, CaseArm, Cast, Collate,
    Column, ColumnDefinition, ColumnRef, Columns, CreateStatement, Cte, DataType,
    DeleteStatement, DropStatement, Expr, ExprList, Extract, ExtractArgs, FulltextSearch,
    Function, InsertSource, InsertStatement, Interval, Limit, MapEntry, MapObject, NamedWindow,
    NamedWindows, OnDuplicateUpdate, OrderByItem, Over, Returning, SelectStatement, SetItem, ShowStatement,
    Statement, StructLiteral, TableExpr, TableOption, TextLiteral, Unnest, UpdateStatement, Var,
    WindowFunc,
};
use crate::dialect::Dialect;
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::references::References;

/// Function names parsed as aggregates when called with arguments.
const AGGREGATES: [&str; 8] = [
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "GROUP_CONCAT",
    "STRING_AGG",
    "ARRAY_AGG",
];

/// Function names parsed as window functions when followed by OVER.
const WINDOW_FUNCTIONS: [&str; 11] = [
    "ROW_NUMBER",
    "RANK",
    "DENSE_RANK",
    "NTILE",
    "LAG",
    "LEAD",
    "FIRST_VALUE",
    "LAST_VALUE",
    "NTH_VALUE",
    "PERCENT_RANK",
    "CUME_DIST",
];

/// Functions that may be called without parentheses.
const NILADIC: [&str; 7] = [
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_USER",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "SESSION_USER",
];

/// Bare words that end a clause and therefore never act as an implicit alias.
const NON_ALIAS_WORDS: [&str; 16] = [
    "natural", "window", "qualify", "final", "sample", "format", "settings", "rows", "row",
    "lock", "for", "straight_join", "ilike", "regexp", "rlike", "glob",
];

/// SQL Parser.
///
/// Besides the AST, the parser records every table and column it meets in a
/// [`References`] collector, tagged with the verb of the enclosing statement.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    dialect: Dialect,
    current: Token,
    previous: Token,
    references: References,
    /// Verb of the statement being parsed; subqueries switch it to `select`.
    verb: &'static str,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str, dialect: Dialect) -> Self {
        let mut lexer = Lexer::with_dialect(input, dialect);
        let current = lexer.next_token();
        Self {
            lexer,
            dialect,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
            references: References::new(),
            verb: "select",
        }
    }

    /// Returns the tables and columns seen so far.
    #[must_use]
    pub const fn references(&self) -> &References {
        &self.references
    }

    /// Consumes the parser, returning the collected references.
    #[must_use]
    pub fn into_references(self) -> References {
        self.references
    }

    /// Parses one or more `;`-separated statements.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not valid SQL.
    pub fn parse(&mut self) -> Result<Ast, ParseError> {
        let mut statements = Vec::new();
        loop {
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            if self.current.is_eof() {
                break;
            }
            statements.push(self.parse_statement()?);
            if !self.check(&TokenKind::Semicolon) && !self.current.is_eof() {
                return Err(self.unexpected("end of statement"));
            }
        }
        if statements.is_empty() {
            return Err(ParseError::unexpected_eof("statement", self.current.span));
        }
        Ok(Ast::from_statements(statements))
    }

    /// Parses a single SQL statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid SQL statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Select) => Ok(Statement::Select(self.parse_query()?)),
            TokenKind::Keyword(Keyword::With) => self.parse_with_statement(),
            TokenKind::Keyword(Keyword::Insert) => {
                Ok(Statement::Insert(self.parse_insert("insert")?))
            }
            TokenKind::Keyword(Keyword::Replace) => {
                Ok(Statement::Replace(self.parse_insert("replace")?))
            }
            TokenKind::Keyword(Keyword::Update) => Ok(Statement::Update(self.parse_update()?)),
            TokenKind::Keyword(Keyword::Delete) => Ok(Statement::Delete(self.parse_delete()?)),
            TokenKind::Keyword(Keyword::Create) => Ok(Statement::Create(self.parse_create()?)),
            TokenKind::Keyword(Keyword::Drop) => Ok(Statement::Drop(self.parse_drop()?)),
            TokenKind::Keyword(Keyword::Show) => Ok(Statement::Show(self.parse_show()?)),
            _ => Err(self.unexpected("SELECT, INSERT, REPLACE, UPDATE, DELETE, CREATE, DROP or SHOW")),
        }
    }

    // ------------------------------------------------------------------
    // SELECT
    // ------------------------------------------------------------------

    /// Parses a SELECT with any set-operation chain, as a `select` verb.
    fn parse_query(&mut self) -> Result<SelectStatement, ParseError> {
        let outer = core::mem::replace(&mut self.verb, "select");
        let query = self.parse_set_chain();
        self.verb = outer;
        query
    }

    fn parse_set_chain(&mut self) -> Result<SelectStatement, ParseError> {
        let with = if self.check_keyword(Keyword::With) {
            Some(self.parse_with()?)
        } else {
            None
        };
        let mut head = self.parse_select_core()?;
        head.with = with;
        if let Some(op) = self.parse_set_operator() {
            let next = self.parse_set_chain()?;
            head.set_op = Some(op);
            head.next = Some(Box::new(next));
        }
        Ok(head)
    }

    /// `UNION [ALL | DISTINCT]`, `INTERSECT`, `EXCEPT`
    fn parse_set_operator(&mut self) -> Option<String> {
        let op = match self.current.as_keyword()? {
            Keyword::Union => "union",
            Keyword::Intersect => "intersect",
            Keyword::Except => "except",
            _ => return None,
        };
        self.advance();
        let modifier = match self.current.as_keyword() {
            Some(Keyword::All) => " all",
            Some(Keyword::Distinct) => " distinct",
            _ => "",
        };
        if !modifier.is_empty() {
            self.advance();
        }
        Some(format!("{op}{modifier}"))
    }

    fn parse_select_core(&mut self) -> Result<SelectStatement, ParseError> {
        self.expect_keyword(Keyword::Select)?;

        // DISTINCT or ALL
        let distinct = if self.check_keyword(Keyword::Distinct) {
            self.advance();
            true
        } else {
            if self.check_keyword(Keyword::All) {
                self.advance();
            }
            false
        };

        let columns = self.parse_select_columns()?;

        // FROM clause (optional for expressions like SELECT 1+1)
        let from = if self.check_keyword(Keyword::From) {
            self.advance();
            Some(self.parse_from_list()?)
        } else {
            None
        };

        let where_clause = self.parse_where()?;

        let groupby = if self.check_keyword(Keyword::Group) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            Some(self.parse_expression_list()?)
        } else {
            None
        };

        let having = if self.check_keyword(Keyword::Having) {
            self.advance();
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };

        let window = self.parse_window_clause()?;
        let orderby = self.parse_order_by()?;
        let limit = self.parse_limit()?;

        Ok(SelectStatement {
            distinct,
            columns,
            from,
            where_clause,
            groupby,
            having,
            window,
            orderby,
            limit,
            ..SelectStatement::default()
        })
    }

    /// Parses a select list; a lone `*` is [`Columns::All`].
    fn parse_select_columns(&mut self) -> Result<Columns, ParseError> {
        let mut columns = Vec::new();
        if self.check(&TokenKind::Star) {
            self.advance();
            self.references.add_column(self.verb, None, "*");
            if !self.check(&TokenKind::Comma) {
                return Ok(Columns::All);
            }
            columns.push(Column::new(Expr::star()));
            self.advance();
        }
        loop {
            let expr = self.parse_expression(0)?;
            let alias = self.parse_alias()?;
            columns.push(Column { expr, alias });
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(Columns::List(columns))
    }

    /// `[AS] alias`
    fn parse_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.check_keyword(Keyword::As) {
            self.advance();
            return match &self.current.kind {
                TokenKind::String(name) | TokenKind::DoubleQuotedString(name) => {
                    let name = name.clone();
                    self.advance();
                    Ok(Some(name))
                }
                _ => self.expect_identifier().map(Some),
            };
        }
        let alias = match &self.current.kind {
            TokenKind::Identifier(name)
                if !NON_ALIAS_WORDS.iter().any(|w| name.eq_ignore_ascii_case(w)) =>
            {
                name.clone()
            }
            TokenKind::QuotedIdentifier(name) | TokenKind::DoubleQuotedString(name) => {
                name.clone()
            }
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(alias))
    }

    fn parse_where(&mut self) -> Result<Option<Box<Expr>>, ParseError> {
        if !self.check_keyword(Keyword::Where) {
            return Ok(None);
        }
        self.advance();
        Ok(Some(Box::new(self.parse_expression(0)?)))
    }

    /// `WITH [RECURSIVE] name [(cols)] AS (query), ..`
    fn parse_with(&mut self) -> Result<Vec<Cte>, ParseError> {
        self.expect_keyword(Keyword::With)?;
        let recursive = if self.check_keyword(Keyword::Recursive) {
            self.advance();
            true
        } else {
            false
        };
        let mut ctes = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            self.references.add_cte(&name);
            let columns = if self.check(&TokenKind::LeftParen) {
                Some(self.parse_paren_identifier_list()?)
            } else {
                None
            };
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen)?;
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            ctes.push(Cte {
                name,
                columns,
                stmt: Box::new(Expr::from(query)),
                recursive,
            });
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(ctes)
    }

    /// A WITH clause followed by SELECT, UPDATE or DELETE.
    fn parse_with_statement(&mut self) -> Result<Statement, ParseError> {
        let checkpoint = (self.lexer.clone(), self.current.clone(), self.previous.clone());
        let with = self.parse_with()?;
        match self.current.as_keyword() {
            Some(Keyword::Select) => {
                // Reparse as a query so the CTEs land on the head of the set chain.
                (self.lexer, self.current, self.previous) = checkpoint;
                Ok(Statement::Select(self.parse_query()?))
            }
            Some(Keyword::Update) => {
                let mut update = self.parse_update()?;
                update.with = Some(with);
                Ok(Statement::Update(update))
            }
            Some(Keyword::Delete) => {
                let mut delete = self.parse_delete()?;
                delete.with = Some(with);
                Ok(Statement::Delete(delete))
            }
            _ => Err(self.unexpected("SELECT, UPDATE or DELETE")),
        }
    }

    // ------------------------------------------------------------------
    // FROM
    // ------------------------------------------------------------------

    /// Parses a FROM list: comma-separated entries and joins.
    fn parse_from_list(&mut self) -> Result<Vec<TableExpr>, ParseError> {
        let mut tables = vec![self.parse_table_factor()?];
        loop {
            if self.check(&TokenKind::Comma) {
                self.advance();
                tables.push(self.parse_table_factor()?);
                continue;
            }
            let Some(join) = self.parse_join_keyword()? else {
                break;
            };
            let mut table = self.parse_table_factor()?;
            table.join = Some(join);
            if self.check_keyword(Keyword::On) {
                self.advance();
                table.on = Some(Box::new(self.parse_expression(0)?));
            } else if self.check_keyword(Keyword::Using) {
                self.advance();
                table.using = Some(self.parse_paren_identifier_list()?);
            }
            tables.push(table);
        }
        Ok(tables)
    }

    /// Parses a join keyword sequence, returning it uppercased.
    fn parse_join_keyword(&mut self) -> Result<Option<String>, ParseError> {
        let mut words = Vec::new();
        if self.current.is_word("natural") {
            words.push("NATURAL");
            self.advance();
        }
        match self.current.as_keyword() {
            Some(Keyword::Inner) => {
                words.push("INNER");
                self.advance();
            }
            Some(Keyword::Cross) => {
                words.push("CROSS");
                self.advance();
            }
            Some(kw @ (Keyword::Left | Keyword::Right | Keyword::Full)) => {
                words.push(kw.as_str());
                self.advance();
                if self.check_keyword(Keyword::Outer) {
                    words.push("OUTER");
                    self.advance();
                }
            }
            _ => {}
        }
        if !self.check_keyword(Keyword::Join) {
            if words.is_empty() {
                return Ok(None);
            }
            return Err(self.unexpected("JOIN"));
        }
        self.advance();
        words.push("JOIN");
        Ok(Some(words.join(" ")))
    }

    /// A table name, derived table, table function or `DUAL`.
    fn parse_table_factor(&mut self) -> Result<TableExpr, ParseError> {
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            let mut table = TableExpr::derived(Expr::from(query));
            table.alias = self.parse_alias()?;
            return Ok(table);
        }
        if self.current.is_word("dual") {
            self.advance();
            return Ok(TableExpr::dual());
        }

        let mut parts = vec![self.expect_identifier()?];
        while self.check(&TokenKind::Dot) {
            self.advance();
            parts.push(self.expect_identifier()?);
        }
        if self.check(&TokenKind::LeftParen) {
            let func = self.parse_function(parts.join("."))?;
            let mut table = TableExpr::derived(func);
            table.alias = self.parse_alias()?;
            return Ok(table);
        }

        let mut table = self.table_from_parts(parts);
        table.alias = self.parse_alias()?;
        if let (Some(alias), Some(name)) = (&table.alias, &table.table) {
            self.references.add_alias(alias, name);
        }
        Ok(table)
    }

    /// Parses a dotted table name without alias.
    fn parse_table_name(&mut self) -> Result<TableExpr, ParseError> {
        let mut parts = vec![self.expect_identifier()?];
        while self.check(&TokenKind::Dot) {
            self.advance();
            parts.push(self.expect_identifier()?);
        }
        Ok(self.table_from_parts(parts))
    }

    /// Builds a table entry from `[db.][schema.]table` and records it.
    fn table_from_parts(&mut self, mut parts: Vec<String>) -> TableExpr {
        let name = parts.pop().unwrap_or_default();
        let (db, schema) = match parts.len() {
            0 => (None, None),
            1 => (parts.pop(), None),
            _ => {
                let schema = parts.pop();
                (Some(parts.join(".")), schema)
            }
        };
        self.references.add_table(self.verb, db.as_deref(), &name);
        TableExpr {
            db,
            schema,
            table: Some(name),
            ..TableExpr::default()
        }
    }

    // ------------------------------------------------------------------
    // ORDER BY / LIMIT
    // ------------------------------------------------------------------

    fn parse_order_by(&mut self) -> Result<Option<Vec<OrderByItem>>, ParseError> {
        if !self.check_keyword(Keyword::Order) {
            return Ok(None);
        }
        self.advance();
        self.expect_keyword(Keyword::By)?;

        let mut items = Vec::new();
        loop {
            let mut item = OrderByItem::new(self.parse_expression(0)?);
            match self.current.as_keyword() {
                Some(Keyword::Asc) => {
                    self.advance();
                    item.direction = Some("ASC".to_string());
                }
                Some(Keyword::Desc) => {
                    self.advance();
                    item.direction = Some("DESC".to_string());
                }
                _ => {}
            }
            if self.check_keyword(Keyword::Nulls) {
                self.advance();
                let position = if self.current.is_word("first") || self.current.is_word("last") {
                    self.lexer.slice(self.current.span).to_uppercase()
                } else {
                    return Err(self.unexpected("FIRST or LAST"));
                };
                self.advance();
                item.nulls = Some(format!("NULLS {position}"));
            }
            items.push(item);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(Some(items))
    }

    /// `LIMIT n`, `LIMIT n OFFSET m`, `LIMIT m, n`, `OFFSET m [ROWS]` and
    /// `FETCH {FIRST | NEXT} n [PERCENT] ROWS {ONLY | WITH TIES}`.
    fn parse_limit(&mut self) -> Result<Option<Limit>, ParseError> {
        if self.check_keyword(Keyword::Limit) {
            self.advance();
            let first = self.parse_expression(0)?;
            if self.check(&TokenKind::Comma) {
                self.advance();
                let count = self.parse_expression(0)?;
                return Ok(Some(Limit::count(count).with_offset(first).with_comma()));
            }
            if self.check_keyword(Keyword::Offset) {
                self.advance();
                let offset = self.parse_expression(0)?;
                return Ok(Some(Limit::count(first).with_offset(offset)));
            }
            return Ok(Some(Limit::count(first)));
        }
        if self.check_keyword(Keyword::Offset) {
            self.advance();
            let mut limit = Limit::offset_only(self.parse_expression(0)?);
            if self.current.is_word("rows") || self.current.is_word("row") {
                self.advance();
            }
            if self.check_keyword(Keyword::Fetch) {
                let (count, suffix) = self.parse_fetch()?;
                limit.count = Some(count);
                limit = limit.with_fetch_suffix(suffix);
            }
            return Ok(Some(limit));
        }
        if self.check_keyword(Keyword::Fetch) {
            let (count, suffix) = self.parse_fetch()?;
            return Ok(Some(Limit::count(count).with_fetch_suffix(suffix)));
        }
        Ok(None)
    }

    /// Returns the count and the words that follow it.
    fn parse_fetch(&mut self) -> Result<(Expr, Vec<&'static str>), ParseError> {
        self.expect_keyword(Keyword::Fetch)?;
        self.expect_word(&["first", "next"])?;
        let count = self.parse_expression(0)?;
        let mut suffix = Vec::new();
        if self.current.is_word("percent") {
            self.advance();
            suffix.push("PERCENT");
        }
        self.expect_word(&["rows", "row"])?;
        suffix.push("ROWS");
        if self.check_keyword(Keyword::With) {
            self.advance();
            self.expect_word(&["ties"])?;
            suffix.extend(["WITH", "TIES"]);
        } else {
            self.expect_word(&["only"])?;
            suffix.push("ONLY");
        }
        Ok((count, suffix))
    }

    fn parse_returning(&mut self) -> Result<Option<Returning>, ParseError> {
        if !self.check_keyword(Keyword::Returning) || !self.dialect.supports_returning() {
            return Ok(None);
        }
        self.advance();
        Ok(Some(Returning {
            columns: self.parse_select_columns()?,
        }))
    }

    // ------------------------------------------------------------------
    // INSERT / UPDATE / DELETE
    // ------------------------------------------------------------------

    fn parse_insert(&mut self, verb: &'static str) -> Result<InsertStatement, ParseError> {
        self.verb = verb;
        self.advance();

        let prefix = if self.current.is_word("ignore") {
            self.advance();
            if self.check_keyword(Keyword::Into) {
                self.advance();
            }
            Some("ignore into".to_string())
        } else if self.check_keyword(Keyword::Into) {
            self.advance();
            None
        } else {
            Some(String::new())
        };

        let table = self.parse_table_name()?;
        let table_name = table.table.clone().unwrap_or_default();

        let columns = if self.check(&TokenKind::LeftParen)
            && !matches!(
                self.peek_kind(),
                TokenKind::Keyword(Keyword::Select | Keyword::With)
            ) {
            let columns = self.parse_paren_identifier_list()?;
            for column in &columns {
                self.references.add_column(verb, Some(&table_name), column);
            }
            Some(columns)
        } else {
            None
        };

        let values = match &self.current.kind {
            TokenKind::Keyword(Keyword::Values) => {
                self.advance();
                let mut rows = Vec::new();
                loop {
                    self.expect(&TokenKind::LeftParen)?;
                    let row = if self.check(&TokenKind::RightParen) {
                        Vec::new()
                    } else {
                        self.parse_expression_list()?
                    };
                    self.expect(&TokenKind::RightParen)?;
                    rows.push(Expr::list(row));
                    if !self.check(&TokenKind::Comma) {
                        break;
                    }
                    self.advance();
                }
                Some(InsertSource::Values(rows))
            }
            TokenKind::Keyword(Keyword::Select | Keyword::With) => {
                Some(InsertSource::Query(Box::new(Expr::from(self.parse_query()?))))
            }
            TokenKind::LeftParen => {
                self.advance();
                let mut query = self.parse_query()?;
                self.expect(&TokenKind::RightParen)?;
                query.parentheses = true;
                Some(InsertSource::Query(Box::new(Expr::from(query))))
            }
            _ => return Err(self.unexpected("VALUES or SELECT")),
        };

        let on_duplicate_update = if self.check_keyword(Keyword::On) {
            self.advance();
            self.expect_word(&["duplicate"])?;
            self.expect_keyword(Keyword::Key)?;
            self.expect_keyword(Keyword::Update)?;
            Some(OnDuplicateUpdate {
                set: self.parse_set_items()?,
            })
        } else {
            None
        };

        let returning = self.parse_returning()?;

        Ok(InsertStatement {
            table: vec![table],
            columns,
            values,
            prefix,
            on_duplicate_update,
            returning,
        })
    }

    fn parse_update(&mut self) -> Result<UpdateStatement, ParseError> {
        self.verb = "update";
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_from_list()?;
        self.expect_keyword(Keyword::Set)?;
        let set = self.parse_set_items()?;
        let from = if self.check_keyword(Keyword::From) {
            self.advance();
            Some(self.parse_from_list()?)
        } else {
            None
        };
        let where_clause = self.parse_where()?;
        let orderby = self.parse_order_by()?;
        let limit = self.parse_limit()?;
        let returning = self.parse_returning()?;

        Ok(UpdateStatement {
            with: None,
            table,
            set,
            from,
            where_clause,
            orderby,
            limit,
            returning,
        })
    }

    /// `col = expr, t.col = expr`
    fn parse_set_items(&mut self) -> Result<Vec<SetItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            let first = self.expect_identifier()?;
            let (table, column) = if self.check(&TokenKind::Dot) {
                self.advance();
                (Some(first), self.expect_identifier()?)
            } else {
                (None, first)
            };
            self.references
                .add_column(self.verb, table.as_deref(), &column);
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expression(0)?;
            items.push(SetItem {
                column,
                value,
                table,
            });
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(items)
    }

    /// `DELETE [targets] FROM tables ...`
    ///
    /// Without explicit targets, the FROM tables are repeated as targets
    /// flagged `addition`.
    fn parse_delete(&mut self) -> Result<DeleteStatement, ParseError> {
        self.verb = "delete";
        self.expect_keyword(Keyword::Delete)?;

        let mut targets = Vec::new();
        while !self.check_keyword(Keyword::From) {
            let mut parts = vec![self.expect_identifier()?];
            while self.check(&TokenKind::Dot) {
                self.advance();
                if self.check(&TokenKind::Star) {
                    self.advance();
                    break;
                }
                parts.push(self.expect_identifier()?);
            }
            targets.push(self.table_from_parts(parts));
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect_keyword(Keyword::From)?;
        let from = self.parse_from_list()?;

        let table = if targets.is_empty() {
            from.iter()
                .filter(|t| t.table.is_some())
                .map(|t| {
                    TableExpr {
                        db: t.db.clone(),
                        schema: t.schema.clone(),
                        table: t.table.clone(),
                        alias: t.alias.clone(),
                        ..TableExpr::default()
                    }
                    .addition()
                })
                .collect()
        } else {
            targets
        };

        let where_clause = self.parse_where()?;
        let orderby = self.parse_order_by()?;
        let limit = self.parse_limit()?;
        let returning = self.parse_returning()?;

        Ok(DeleteStatement {
            table: Some(table),
            from: Some(from),
            where_clause,
            orderby,
            limit,
            returning,
            ..DeleteStatement::default()
        })
    }

    // ------------------------------------------------------------------
    // CREATE / DROP / SHOW
    // ------------------------------------------------------------------

    fn parse_create(&mut self) -> Result<CreateStatement, ParseError> {
        self.verb = "create";
        self.expect_keyword(Keyword::Create)?;

        let or_replace = if self.check_keyword(Keyword::Or) {
            self.advance();
            self.expect_keyword(Keyword::Replace)?;
            true
        } else {
            false
        };
        let temporary = if self.check_keyword(Keyword::Temporary) || self.current.is_word("temp")
        {
            self.advance();
            true
        } else {
            false
        };

        let mut create = CreateStatement {
            keyword: String::new(),
            or_replace,
            temporary,
            if_not_exists: false,
            table: None,
            database: None,
            create_definitions: None,
            table_options: None,
            query_expr: None,
        };

        match self.current.as_keyword() {
            Some(Keyword::Table) => {
                self.advance();
                create.keyword = "table".to_string();
                create.if_not_exists = self.parse_if_not_exists()?;
                create.table = Some(vec![self.parse_table_name()?]);
                if self.check(&TokenKind::LeftParen) {
                    create.create_definitions = Some(self.parse_create_definitions()?);
                }
                let options = self.parse_table_options()?;
                if !options.is_empty() {
                    create.table_options = Some(options);
                }
                if self.check_keyword(Keyword::As) {
                    self.advance();
                    create.query_expr = Some(Box::new(Expr::from(self.parse_query()?)));
                }
            }
            Some(Keyword::View) => {
                self.advance();
                create.keyword = "view".to_string();
                create.if_not_exists = self.parse_if_not_exists()?;
                create.table = Some(vec![self.parse_table_name()?]);
                self.expect_keyword(Keyword::As)?;
                create.query_expr = Some(Box::new(Expr::from(self.parse_query()?)));
            }
            Some(kw @ (Keyword::Database | Keyword::Schema)) => {
                self.advance();
                create.keyword = kw.as_str().to_lowercase();
                create.if_not_exists = self.parse_if_not_exists()?;
                create.database = Some(self.expect_identifier()?);
            }
            _ => return Err(self.unexpected("TABLE, VIEW, DATABASE or SCHEMA")),
        }
        Ok(create)
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if !self.check_keyword(Keyword::If) {
            return Ok(false);
        }
        self.advance();
        self.expect_keyword(Keyword::Not)?;
        self.expect_keyword(Keyword::Exists)?;
        Ok(true)
    }

    /// `(col type constraints.., PRIMARY KEY (..), UNIQUE [KEY] [name] (..))`
    fn parse_create_definitions(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut definitions = Vec::new();
        loop {
            if self.current.is_word("constraint") {
                self.advance();
                self.expect_identifier()?;
            }
            let definition = match self.current.as_keyword() {
                Some(Keyword::Primary) => {
                    self.advance();
                    self.expect_keyword(Keyword::Key)?;
                    self.table_constraint("PRIMARY KEY")?
                }
                Some(Keyword::Unique) => {
                    self.advance();
                    if self.check_keyword(Keyword::Key) {
                        self.advance();
                    }
                    if !self.check(&TokenKind::LeftParen) {
                        self.expect_identifier()?;
                    }
                    self.table_constraint("UNIQUE")?
                }
                _ => Expr::ColumnDefinition(Box::new(self.parse_column_definition()?)),
            };
            definitions.push(definition);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(definitions)
    }

    /// A table-level constraint, kept as a call named after the constraint.
    fn table_constraint(&mut self, name: &str) -> Result<Expr, ParseError> {
        let columns = self.parse_paren_identifier_list()?;
        Ok(Expr::function(
            name,
            columns.into_iter().map(Expr::column).collect(),
        ))
    }

    fn parse_column_definition(&mut self) -> Result<ColumnDefinition, ParseError> {
        let name = self.expect_identifier()?;
        self.references.add_column(self.verb, None, &name);
        let data_type = self.parse_data_type()?;
        let mut def = ColumnDefinition::new(name, data_type);
        loop {
            match &self.current.kind {
                TokenKind::Keyword(Keyword::Not) => {
                    self.advance();
                    self.expect_keyword(Keyword::Null)?;
                    def.nullable = Some("not null".to_string());
                }
                TokenKind::Keyword(Keyword::Null) => {
                    self.advance();
                    def.nullable = Some("null".to_string());
                }
                TokenKind::Keyword(Keyword::Default) => {
                    self.advance();
                    // Above comparison strength, so a trailing NOT NULL is
                    // not read as NOT IN / NOT LIKE.
                    def.default_val = Some(Box::new(self.parse_expression(7)?));
                }
                TokenKind::Keyword(Keyword::Primary) => {
                    self.advance();
                    self.expect_keyword(Keyword::Key)?;
                    def.primary_key = Some("primary key".to_string());
                }
                TokenKind::Keyword(Keyword::Unique) => {
                    self.advance();
                    if self.check_keyword(Keyword::Key) {
                        self.advance();
                    }
                    def.unique = Some("unique".to_string());
                }
                TokenKind::Keyword(Keyword::Collate) => {
                    self.advance();
                    def.collate = Some(self.expect_identifier()?);
                }
                TokenKind::Identifier(word)
                    if word.eq_ignore_ascii_case("auto_increment")
                        || word.eq_ignore_ascii_case("autoincrement") =>
                {
                    def.auto_increment = Some(word.to_lowercase());
                    self.advance();
                }
                TokenKind::Identifier(word) if word.eq_ignore_ascii_case("comment") => {
                    self.advance();
                    def.comment = Some(Box::new(self.parse_primary()?));
                }
                _ => break,
            }
        }
        Ok(def)
    }

    /// Table options after the definitions, values kept as written:
    /// `ENGINE = MergeTree() ORDER BY id`.
    fn parse_table_options(&mut self) -> Result<Vec<TableOption>, ParseError> {
        let mut options = Vec::new();
        loop {
            let keyword = match &self.current.kind {
                TokenKind::Identifier(word) => {
                    let word = word.to_uppercase();
                    self.advance();
                    word
                }
                TokenKind::Keyword(Keyword::Default) => {
                    self.advance();
                    let next = self.expect_identifier()?;
                    format!("DEFAULT {}", next.to_uppercase())
                }
                TokenKind::Keyword(Keyword::Collate) => {
                    self.advance();
                    "COLLATE".to_string()
                }
                TokenKind::Keyword(kw @ (Keyword::Order | Keyword::Partition)) => {
                    let kw = *kw;
                    self.advance();
                    self.expect_keyword(Keyword::By)?;
                    format!("{} BY", kw.as_str())
                }
                TokenKind::Keyword(Keyword::Primary) => {
                    self.advance();
                    self.expect_keyword(Keyword::Key)?;
                    "PRIMARY KEY".to_string()
                }
                _ => break,
            };
            let symbol = if self.check(&TokenKind::Eq) {
                self.advance();
                Some("=".to_string())
            } else {
                None
            };
            let value = self.parse_raw_value()?;
            options.push(TableOption {
                keyword,
                symbol,
                value,
            });
            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }
        Ok(options)
    }

    /// Consumes one token plus an optional parenthesized group and returns
    /// the source text they cover.
    fn parse_raw_value(&mut self) -> Result<String, ParseError> {
        let start = self.current.span.start;
        if self.check(&TokenKind::LeftParen) {
            self.skip_group()?;
        } else if matches!(
            self.current.kind,
            TokenKind::Eof | TokenKind::Semicolon | TokenKind::Comma
        ) {
            return Err(self.unexpected("option value"));
        } else {
            self.advance();
            if self.check(&TokenKind::LeftParen) {
                self.skip_group()?;
            }
        }
        Ok(self
            .lexer
            .slice(Span::new(start, self.previous.span.end))
            .to_string())
    }

    /// Skips a balanced parenthesized group.
    fn skip_group(&mut self) -> Result<(), ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.current.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                TokenKind::Eof => return Err(self.unexpected(")")),
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    fn parse_drop(&mut self) -> Result<DropStatement, ParseError> {
        self.verb = "drop";
        self.expect_keyword(Keyword::Drop)?;
        let keyword = match self.current.as_keyword() {
            Some(
                kw @ (Keyword::Table | Keyword::View | Keyword::Database | Keyword::Schema),
            ) => kw.as_str().to_lowercase(),
            _ => return Err(self.unexpected("TABLE, VIEW, DATABASE or SCHEMA")),
        };
        self.advance();
        let if_exists = if self.check_keyword(Keyword::If) {
            self.advance();
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };
        let mut name = Vec::new();
        loop {
            name.push(self.parse_table_name()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(DropStatement {
            keyword,
            if_exists,
            name,
        })
    }

    fn parse_show(&mut self) -> Result<ShowStatement, ParseError> {
        self.verb = "show";
        self.expect_keyword(Keyword::Show)?;
        let keyword = match &self.current.kind {
            TokenKind::Identifier(word) => word.to_lowercase(),
            TokenKind::Keyword(kw) => kw.as_str().to_lowercase(),
            _ => return Err(self.unexpected("SHOW target")),
        };
        self.advance();
        Ok(ShowStatement { keyword })
    }

    // ------------------------------------------------------------------
    // Data types
    // ------------------------------------------------------------------

    /// Parses a type name, keeping it as written.
    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let mut name = match &self.current.kind {
            TokenKind::Identifier(_) | TokenKind::Keyword(_) => {
                self.lexer.slice(self.current.span).to_string()
            }
            TokenKind::QuotedIdentifier(name) => name.clone(),
            _ => return Err(self.unexpected("data type")),
        };
        self.advance();
        for (first, second) in [("double", "precision"), ("character", "varying")] {
            if name.eq_ignore_ascii_case(first) && self.current.is_word(second) {
                name.push(' ');
                name.push_str(self.lexer.slice(self.current.span));
                self.advance();
            }
        }

        let mut data_type = DataType::new(name);
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            if let TokenKind::Number(length) = &self.current.kind {
                data_type.length = length.parse().ok();
                self.advance();
                if self.check(&TokenKind::Comma) {
                    self.advance();
                    if let TokenKind::Number(scale) = &self.current.kind {
                        data_type.scale = scale.parse().ok();
                    }
                    self.advance();
                }
            } else {
                loop {
                    data_type.args.push(self.parse_type_argument()?);
                    if !self.check(&TokenKind::Comma) {
                        break;
                    }
                    self.advance();
                }
            }
            self.expect(&TokenKind::RightParen)?;
        }

        while self.check(&TokenKind::LeftBracket) && self.peek_kind() == TokenKind::RightBracket {
            self.advance();
            self.advance();
            data_type.array = true;
        }
        while ["unsigned", "signed", "zerofill"]
            .iter()
            .any(|w| self.current.is_word(w))
        {
            data_type.suffix.push(self.lexer.slice(self.current.span).to_lowercase());
            self.advance();
        }
        Ok(data_type)
    }

    /// A nested type (`MAP(VARCHAR, INT)`) or a struct field (`name VARCHAR`).
    fn parse_type_argument(&mut self) -> Result<Expr, ParseError> {
        let is_field = matches!(
            self.current.kind,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
        ) && matches!(
            self.peek_kind(),
            TokenKind::Identifier(_) | TokenKind::Keyword(_)
        );
        if is_field {
            let name = self.expect_identifier()?;
            let data_type = self.parse_data_type()?;
            return Ok(Expr::ColumnDefinition(Box::new(ColumnDefinition::new(
                name, data_type,
            ))));
        }
        if let TokenKind::String(value) = &self.current.kind {
            let value = value.clone();
            self.advance();
            return Ok(Expr::string(value));
        }
        Ok(Expr::Datatype(self.parse_data_type()?))
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Parses an expression using Pratt parsing.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if no valid expression starts here.
    pub fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            if is_postfix(&self.current.kind) {
                if POSTFIX_BP < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            let Some((l_bp, r_bp)) = infix_binding_power(&self.current) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            lhs = match &self.current.kind {
                TokenKind::Keyword(Keyword::Is) => {
                    self.advance();
                    let operator = if self.check_keyword(Keyword::Not) {
                        self.advance();
                        "IS NOT"
                    } else {
                        "IS"
                    };
                    let rhs = self.parse_expression(r_bp)?;
                    lhs.binary(operator, rhs)
                }
                TokenKind::Keyword(Keyword::Not) => {
                    let negatable = match self.peek_kind() {
                        TokenKind::Keyword(Keyword::In | Keyword::Between | Keyword::Like) => true,
                        TokenKind::Identifier(word) => ["ILIKE", "REGEXP", "RLIKE", "GLOB"]
                            .iter()
                            .any(|w| word.eq_ignore_ascii_case(w)),
                        _ => false,
                    };
                    if !negatable {
                        break;
                    }
                    self.advance();
                    self.parse_predicate(lhs, true, r_bp)?
                }
                TokenKind::Keyword(Keyword::In | Keyword::Between) => {
                    self.parse_predicate(lhs, false, r_bp)?
                }
                _ => {
                    let Some(op) = binary_operator(&self.current) else {
                        break;
                    };
                    // `<>` and `!=` share a token; keep the spelling.
                    let op = if self.current.kind == TokenKind::NotEq {
                        self.lexer.slice(self.current.span).to_string()
                    } else {
                        op.to_string()
                    };
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    lhs.binary(op, rhs)
                }
            };
        }

        Ok(lhs)
    }

    /// `IN (..)`, `BETWEEN a AND b`, `LIKE x` and friends, optionally negated.
    fn parse_predicate(&mut self, lhs: Expr, negated: bool, r_bp: u8) -> Result<Expr, ParseError> {
        let not = if negated { "NOT " } else { "" };
        match &self.current.kind {
            TokenKind::Keyword(Keyword::In) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let rhs = if matches!(
                    self.current.kind,
                    TokenKind::Keyword(Keyword::Select | Keyword::With)
                ) {
                    let mut query = self.parse_query()?;
                    query.parentheses = true;
                    Expr::from(query)
                } else {
                    Expr::ExprList(ExprList {
                        value: self.parse_expression_list()?,
                        separator: None,
                        parentheses: true,
                    })
                };
                self.expect(&TokenKind::RightParen)?;
                Ok(lhs.binary(format!("{not}IN"), rhs))
            }
            TokenKind::Keyword(Keyword::Between) => {
                self.advance();
                let low = self.parse_expression(r_bp)?;
                self.expect_keyword(Keyword::And)?;
                let high = self.parse_expression(r_bp)?;
                Ok(lhs.binary(format!("{not}BETWEEN"), Expr::list(vec![low, high])))
            }
            _ => {
                let Some(op) = binary_operator(&self.current) else {
                    return Err(self.unexpected("IN, BETWEEN or LIKE"));
                };
                self.advance();
                let rhs = self.parse_expression(r_bp)?;
                Ok(lhs.binary(format!("{not}{op}"), rhs))
            }
        }
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        if let Some((operator, bp)) = prefix_operator(&self.current.kind) {
            self.advance();
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::unary(operator, operand));
        }
        self.parse_primary()
    }

    /// `::type`, `[index]..` and `COLLATE name`.
    fn parse_postfix(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        match self.current.kind {
            TokenKind::DoubleColon => {
                self.advance();
                let target = self.parse_data_type()?;
                Ok(Expr::Cast(Cast {
                    keyword: "CAST".to_string(),
                    expr: Box::new(lhs),
                    symbol: "::".to_string(),
                    target,
                    parentheses: false,
                }))
            }
            TokenKind::LeftBracket => {
                let mut indices = Vec::new();
                while self.check(&TokenKind::LeftBracket) {
                    self.advance();
                    indices.push(self.parse_expression(0)?);
                    self.expect(&TokenKind::RightBracket)?;
                }
                Ok(Expr::ArrayAccess(ArrayAccess {
                    expr: Box::new(lhs),
                    indices,
                }))
            }
            _ => {
                self.expect_keyword(Keyword::Collate)?;
                let name = self.expect_identifier()?;
                Ok(Expr::Collate(Collate {
                    expr: Some(Box::new(lhs)),
                    name,
                    symbol: None,
                }))
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current.clone();
        match &token.kind {
            TokenKind::Number(text) => {
                self.advance();
                Ok(number_literal(text))
            }
            TokenKind::String(value) => {
                self.advance();
                Ok(Expr::string(value.clone()))
            }
            TokenKind::DoubleQuotedString(value) => {
                self.advance();
                Ok(Expr::DoubleQuoteString(TextLiteral::new(value.clone())))
            }
            TokenKind::HexString(digits) => {
                self.advance();
                Ok(Expr::HexString(TextLiteral::new(digits.clone())))
            }
            TokenKind::Variable(text) => {
                self.advance();
                Ok(Expr::Var(variable(text)))
            }
            TokenKind::Parameter(name) => {
                self.advance();
                Ok(Expr::param(name.clone()))
            }
            TokenKind::Question => {
                self.advance();
                Ok(Expr::origin("?"))
            }
            TokenKind::Star => {
                self.advance();
                Ok(Expr::star())
            }
            TokenKind::LeftParen => self.parse_parenthesized(),
            TokenKind::LeftBracket => {
                self.advance();
                let expr_list = self.parse_delimited_list(&TokenKind::RightBracket)?;
                Ok(Expr::Array(ArrayLiteral {
                    keyword: None,
                    brackets: true,
                    expr_list,
                }))
            }
            TokenKind::LeftBrace => self.parse_struct_literal(),
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::null())
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::boolean(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::boolean(false))
            }
            TokenKind::Keyword(Keyword::Default) => {
                self.advance();
                Ok(Expr::Default(TextLiteral::new("DEFAULT")))
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast(),
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let mut query = self.parse_query()?;
                self.expect(&TokenKind::RightParen)?;
                query.parentheses = true;
                Ok(Expr::unary("EXISTS", Expr::from(query)))
            }
            TokenKind::Keyword(Keyword::Interval) => {
                self.advance();
                let value = self.parse_prefix()?;
                let unit = match &self.current.kind {
                    TokenKind::Identifier(unit) => {
                        let unit = unit.to_uppercase();
                        self.advance();
                        unit
                    }
                    _ => String::new(),
                };
                Ok(Expr::Interval(Interval {
                    expr: Box::new(value),
                    unit,
                }))
            }
            TokenKind::Keyword(Keyword::Extract) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let field = self.expect_identifier()?.to_uppercase();
                self.expect_keyword(Keyword::From)?;
                let source = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::Extract(Extract {
                    args: ExtractArgs {
                        field,
                        source: Box::new(source),
                    },
                }))
            }
            TokenKind::Keyword(Keyword::Match) => self.parse_fulltext_search(),
            TokenKind::Keyword(
                Keyword::Replace | Keyword::Left | Keyword::Right | Keyword::If | Keyword::Insert,
            ) if self.peek_kind() == TokenKind::LeftParen => {
                let name = self.lexer.slice(token.span).to_string();
                self.advance();
                self.parse_function(name)
            }
            TokenKind::Keyword(kw) if is_unreserved(*kw) => self.parse_identifier_expr(),
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                self.parse_identifier_expr()
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `(subquery)`, `(expr)` or a tuple `(a, b)`.
    fn parse_parenthesized(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        if matches!(
            self.current.kind,
            TokenKind::Keyword(Keyword::Select | Keyword::With)
        ) {
            let mut query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            query.parentheses = true;
            return Ok(Expr::from(query));
        }
        let first = self.parse_expression(0)?;
        if self.check(&TokenKind::Comma) {
            let mut value = vec![first];
            while self.check(&TokenKind::Comma) {
                self.advance();
                value.push(self.parse_expression(0)?);
            }
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::ExprList(ExprList {
                value,
                separator: None,
                parentheses: true,
            }));
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(first.parenthesized())
    }

    /// A column reference, function call, or keyword-led literal.
    fn parse_identifier_expr(&mut self) -> Result<Expr, ParseError> {
        let quoted = matches!(self.current.kind, TokenKind::QuotedIdentifier(_));
        let name = self.expect_identifier()?;

        if !quoted {
            if self.check(&TokenKind::LeftParen) {
                return self.parse_function(name);
            }
            let upper = name.to_ascii_uppercase();
            if NILADIC.contains(&upper.as_str()) {
                return Ok(Expr::Function(Function {
                    name,
                    args: None,
                    over: None,
                    suffix: None,
                    parentheses: false,
                }));
            }
            if self.check(&TokenKind::LeftBracket) {
                if upper == "ARRAY" {
                    self.advance();
                    let expr_list = self.parse_delimited_list(&TokenKind::RightBracket)?;
                    return Ok(Expr::Array(ArrayLiteral {
                        keyword: Some(name),
                        brackets: true,
                        expr_list,
                    }));
                }
                if upper == "MAP" {
                    return self.parse_map_literal(name);
                }
            }
        }

        let mut parts = vec![name];
        while self.check(&TokenKind::Dot) {
            self.advance();
            if self.check(&TokenKind::Star) {
                self.advance();
                return Ok(self.column_ref(parts, None));
            }
            parts.push(self.expect_identifier()?);
        }
        if parts.len() > 1 && self.check(&TokenKind::LeftParen) {
            return self.parse_function(parts.join("."));
        }
        let column = parts.pop();
        Ok(self.column_ref(parts, column))
    }

    /// Builds a column reference from its qualifiers and records it.
    fn column_ref(&mut self, mut qualifiers: Vec<String>, column: Option<String>) -> Expr {
        let mut col = match &column {
            Some(name) => ColumnRef::new(name.clone()),
            None => ColumnRef::star(),
        };
        col.table = qualifiers.pop();
        match qualifiers.len() {
            0 => {}
            1 => col.db = qualifiers.pop(),
            _ => {
                col.schema = qualifiers.pop();
                col.db = Some(qualifiers.join("."));
            }
        }
        self.references.add_column(
            self.verb,
            col.table.as_deref(),
            column.as_deref().unwrap_or("*"),
        );
        Expr::ColumnRef(col)
    }

    /// Parses a call after its name; the current token is `(`.
    fn parse_function(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let upper = name.to_ascii_uppercase();

        if AGGREGATES.contains(&upper.as_str()) && !self.check(&TokenKind::RightParen) {
            let distinct = if self.check_keyword(Keyword::Distinct) {
                self.advance();
                true
            } else {
                false
            };
            let mut args = self.parse_expression_list()?;
            let orderby = self.parse_order_by()?;
            let separator = if self.current.is_word("separator") {
                self.advance();
                Some(Box::new(self.parse_primary()?))
            } else {
                None
            };
            self.expect(&TokenKind::RightParen)?;
            let expr = if args.len() == 1 {
                args.remove(0)
            } else {
                Expr::list(args)
            };
            let over = self.parse_over()?;
            return Ok(Expr::AggrFunc(AggrFunc {
                name,
                args: AggrArgs {
                    expr: Box::new(expr),
                    distinct,
                    orderby,
                    separator,
                },
                over,
                parentheses: false,
            }));
        }

        let args = if self.check(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };
        self.expect(&TokenKind::RightParen)?;
        let over = self.parse_over()?;

        if upper == "UNNEST" && args.len() == 1 && over.is_none() {
            let mut args = args;
            return Ok(Expr::Unnest(Unnest {
                expr: Box::new(args.remove(0)),
            }));
        }
        match over {
            Some(over) if WINDOW_FUNCTIONS.contains(&upper.as_str()) => {
                Ok(Expr::WindowFunc(WindowFunc {
                    name,
                    args: (!args.is_empty()).then(|| Box::new(Expr::list(args))),
                    over,
                }))
            }
            over => Ok(Expr::Function(Function {
                name,
                args: Some(Box::new(Expr::list(args))),
                over,
                suffix: None,
                parentheses: false,
            })),
        }
    }

    /// `OVER name` or `OVER ([PARTITION BY ..] [ORDER BY ..] [frame])`.
    fn parse_over(&mut self) -> Result<Option<Over>, ParseError> {
        if !self.check_keyword(Keyword::Over) {
            return Ok(None);
        }
        self.advance();
        self.parse_window_spec().map(Some)
    }

    /// `WINDOW name AS (..), ..`
    fn parse_window_clause(&mut self) -> Result<Option<NamedWindows>, ParseError> {
        if !self.current.is_word("window") {
            return Ok(None);
        }
        self.advance();
        let mut windows = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            self.expect_keyword(Keyword::As)?;
            windows.push(NamedWindow {
                name,
                spec: self.parse_window_spec()?,
            });
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(Some(NamedWindows { expr: windows }))
    }

    /// A window name or a parenthesized specification.
    fn parse_window_spec(&mut self) -> Result<Over, ParseError> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            return Ok(Over {
                name: Some(name),
                ..Over::default()
            });
        }
        self.expect(&TokenKind::LeftParen)?;
        let partitionby = if self.check_keyword(Keyword::Partition) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            Some(
                self.parse_expression_list()?
                    .into_iter()
                    .map(OrderByItem::new)
                    .collect(),
            )
        } else {
            None
        };
        let orderby = self.parse_order_by()?;
        let frame = if ["rows", "range", "groups"]
            .iter()
            .any(|w| self.current.is_word(w))
        {
            let start = self.current.span.start;
            while !self.check(&TokenKind::RightParen) && !self.current.is_eof() {
                self.advance();
            }
            Some(
                self.lexer
                    .slice(Span::new(start, self.previous.span.end))
                    .to_string(),
            )
        } else {
            None
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Over {
            name: None,
            partitionby,
            orderby,
            frame,
        })
    }

    fn parse_case(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Case)?;

        // Simple CASE: CASE expr WHEN ...
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression(0)?))
        };

        let mut args = Vec::new();
        while self.check_keyword(Keyword::When) {
            self.advance();
            let cond = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression(0)?;
            args.push(CaseArm::When { cond, result });
        }
        if args.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        if self.check_keyword(Keyword::Else) {
            self.advance();
            args.push(CaseArm::Else {
                result: self.parse_expression(0)?,
            });
        }
        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case(Case {
            expr: operand,
            args,
            parentheses: false,
        }))
    }

    fn parse_cast(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let target = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Cast(Cast {
            keyword: "CAST".to_string(),
            expr: Box::new(expr),
            symbol: "as".to_string(),
            target,
            parentheses: false,
        }))
    }

    /// `MATCH (cols) AGAINST (expr [mode])`
    fn parse_fulltext_search(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Match)?;
        self.expect(&TokenKind::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            match self.parse_identifier_expr()? {
                Expr::ColumnRef(col) => columns.push(col),
                _ => return Err(self.unexpected("column")),
            }
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightParen)?;
        self.expect_keyword(Keyword::Against)?;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_prefix()?;
        let mode = if self.check_keyword(Keyword::In) || self.check_keyword(Keyword::With) {
            let start = self.current.span.start;
            while !self.check(&TokenKind::RightParen) && !self.current.is_eof() {
                self.advance();
            }
            Some(
                self.lexer
                    .slice(Span::new(start, self.previous.span.end))
                    .to_lowercase(),
            )
        } else {
            None
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::FulltextSearch(FulltextSearch {
            match_keyword: Some("match".to_string()),
            columns,
            against: Some("against".to_string()),
            expr: Box::new(expr),
            mode,
        }))
    }

    /// `{'key': value, ..}`
    fn parse_struct_literal(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftBrace)?;
        let mut expr_list = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            let key = self.parse_primary()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_expression(0)?;
            expr_list.push(Expr::Assign(Assign {
                left: Box::new(key),
                symbol: ":".to_string(),
                right: Box::new(value),
            }));
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightBrace)?;
        Ok(Expr::Struct(StructLiteral {
            keyword: None,
            expr_list,
        }))
    }

    /// `MAP[k1, v1, k2, v2]`
    fn parse_map_literal(&mut self, keyword: String) -> Result<Expr, ParseError> {
        let start = self.current.span;
        self.expect(&TokenKind::LeftBracket)?;
        let items = self.parse_delimited_list(&TokenKind::RightBracket)?;
        if items.len() % 2 != 0 {
            return Err(ParseError::new(
                "Map literal needs an even number of items",
                start,
            ));
        }
        let mut entries = Vec::with_capacity(items.len() / 2);
        let mut items = items.into_iter();
        while let (Some(key), Some(value)) = (items.next(), items.next()) {
            entries.push(MapEntry { key, value });
        }
        Ok(Expr::MapObject(MapObject {
            keyword,
            expr: entries,
        }))
    }

    /// Parses `a, b, ..` up to and including `close`; may be empty.
    fn parse_delimited_list(&mut self, close: &TokenKind) -> Result<Vec<Expr>, ParseError> {
        let items = if self.check(close) {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };
        self.expect(close)?;
        Ok(items)
    }

    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expression(0)?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            exprs.push(self.parse_expression(0)?);
        }
        Ok(exprs)
    }

    /// `(a, b, c)`
    fn parse_paren_identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut names = vec![self.expect_identifier()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            names.push(self.expect_identifier()?);
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(names)
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn advance(&mut self) {
        self.previous = core::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Returns the kind of the token after the current one.
    fn peek_kind(&self) -> TokenKind {
        self.lexer.clone().next_token().kind
    }

    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.as_keyword() == Some(keyword)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("{kind:?}")))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Expects one of several bare words.
    fn expect_word(&mut self, words: &[&str]) -> Result<(), ParseError> {
        if words.iter().any(|w| self.current.is_word(w)) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&words.join(" or ").to_uppercase()))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => name.clone(),
            TokenKind::Keyword(kw) if is_unreserved(*kw) => {
                self.lexer.slice(self.current.span).to_string()
            }
            _ => return Err(self.unexpected("identifier")),
        };
        self.advance();
        Ok(name)
    }

    /// Builds an error for the current token, surfacing lexer errors as-is.
    fn unexpected(&self, expected: &str) -> ParseError {
        match &self.current.kind {
            TokenKind::Error(message) => ParseError::new(message.clone(), self.current.span),
            found => ParseError::unexpected(expected, found.clone(), self.current.span),
        }
    }
}

/// Keywords that may also name a column or table.
const fn is_unreserved(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::Key
            | Keyword::View
            | Keyword::Temporary
            | Keyword::Database
            | Keyword::Schema
            | Keyword::Show
            | Keyword::Nulls
            | Keyword::Recursive
    )
}

/// Integers that fit 64 bits become numbers, longer ones `bigint` text.
fn number_literal(text: &str) -> Expr {
    if let Ok(n) = text.parse::<i64>() {
        return Expr::number(n);
    }
    if let Ok(n) = text.parse::<u64>() {
        return Expr::number(n);
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        return Expr::Bigint(TextLiteral::new(text));
    }
    match text.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Expr::number(n),
        None => Expr::origin(text),
    }
}

/// Splits `@@session.sql_mode` into prefix, name and members.
fn variable(text: &str) -> Var {
    let name_start = text.find(|c| c != '@').unwrap_or(text.len());
    let (prefix, rest) = text.split_at(name_start);
    let mut parts = rest.split('.').map(str::to_string);
    let mut var = Var::new(parts.next().unwrap_or_default());
    var.prefix = Some(prefix.to_string());
    var.members = parts.collect();
    var
}
