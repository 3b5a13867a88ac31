//! Expression rendering.

use serde_json::Value;
use tracing::{trace, warn};

use super::column;
use super::registry::Capability;
use super::{connector, quote_string, wrap, RenderMode, Renderer};
use crate::ast::{
    AggrFunc, ArrayAccess, ArrayLiteral, BinaryExpr, Case, CaseArm, Cast, DataType, Expr,
    ExprList, Flatten, Function, JsonKeyValue, Lambda, MapObject, NamedWindows, OrderByItem,
    Over, StructLiteral, UnaryExpr, Var, WindowFunc,
};
use crate::{Error, Result};

/// Unary operators written without a following space.
const TIGHT_UNARY: [&str; 4] = ["-", "+", "~", "!"];

impl Renderer {
    /// Renders one expression.
    ///
    /// Unparenthesized expression lists render as their comma-joined members.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrenderableNode`] in strict mode for unknown kinds.
    pub fn expr(&self, expr: &Expr) -> Result<String> {
        match expr {
            Expr::Wrapped(inner) => self.expr(&inner.expr),
            Expr::ColumnRef(col) => match self.registry.resolve(Capability::ColumnRef) {
                Some(columns) => columns.column_ref(self, col),
                None => Ok(column::fallback_column_ref(self, col)),
            },
            Expr::FulltextSearch(search) => match self.registry.resolve(Capability::FullTextSearch)
            {
                Some(columns) => columns.fulltext_search(self, search),
                None => Ok(column::fallback_fulltext_search(search)),
            },
            Expr::ColumnDefinition(def) => {
                match self.registry.resolve(Capability::ColumnDefinition) {
                    Some(columns) => columns.column_definition(self, def),
                    None => Ok(column::fallback_column_definition(self, def)),
                }
            }
            Expr::BinaryExpr(binary) => self.binary(binary),
            Expr::UnaryExpr(unary) => self.unary(unary),
            Expr::Function(func) => self.function(func),
            Expr::AggrFunc(aggr) => self.aggregate(aggr),
            Expr::Cast(cast) => self.cast(cast),
            Expr::Case(case) => self.case(case),
            Expr::WindowFunc(window) => self.window_func(window),
            Expr::ArrayAccess(access) => self.array_access(access),
            Expr::ExprList(list) => self.list(list),
            Expr::Select(select) => self.select(select),
            Expr::Var(var) => Ok(Self::var(var)),
            Expr::MapObject(map) => self.map_object(map),
            Expr::Interval(interval) => {
                let value = self.expr(&interval.expr)?;
                if interval.unit.is_empty() {
                    Ok(format!("INTERVAL {value}"))
                } else {
                    Ok(format!("INTERVAL {value} {}", interval.unit.to_uppercase()))
                }
            }
            Expr::Extract(extract) => Ok(format!(
                "EXTRACT({} FROM {})",
                extract.args.field.to_uppercase(),
                self.expr(&extract.args.source)?
            )),
            Expr::Collate(collate) => {
                let expr = match &collate.expr {
                    Some(inner) => self.expr(inner)?,
                    None => String::new(),
                };
                let name = match &collate.symbol {
                    Some(symbol) => format!("{symbol} {}", collate.name),
                    None => collate.name.clone(),
                };
                Ok(super::join_fragments([expr, format!("COLLATE {name}")]))
            }
            Expr::Datatype(ty) => self.data_type(ty),
            Expr::Assign(assign) => {
                let left = self.expr(&assign.left)?;
                let right = self.expr(&assign.right)?;
                if assign.symbol == ":" {
                    Ok(format!("{left}: {right}"))
                } else {
                    Ok(format!("{left} {} {right}", assign.symbol))
                }
            }
            Expr::Array(array) => self.array(array),
            Expr::Struct(literal) => self.struct_literal(literal),
            Expr::Lambda(lambda) => self.lambda(lambda),
            Expr::Unnest(unnest) => Ok(format!("UNNEST({})", self.expr(&unnest.expr)?)),
            Expr::Json(json) => Ok(super::join_fragments([
                json.keyword.as_deref().map(str::to_uppercase).unwrap_or_default(),
                self.exprs(&json.expr_list)?.join(", "),
            ])),
            Expr::JsonVisitor(step) => Ok(format!("{}{}", step.symbol, self.expr(&step.expr)?)),
            Expr::JsonObjectArg(arg) => self.json_object_arg(&arg.expr),
            Expr::AnyValue(any) => {
                let mut sql = format!("ANY_VALUE({})", self.call_args(&any.args.expr)?);
                if let Some(over) = &any.over {
                    sql.push(' ');
                    sql.push_str(&self.over(over)?);
                }
                Ok(sql)
            }
            Expr::Flatten(flatten) => self.flatten(flatten),
            Expr::TableFunc(func) => {
                let mut sql = format!("{}({})", func.name, self.call_args(&func.args)?);
                if let Some(alias) = &func.alias {
                    sql.push_str(" AS ");
                    sql.push_str(&self.expr(alias)?);
                }
                Ok(sql)
            }
            Expr::FuncArg(arg) => Ok(format!(
                "{} {} {}",
                arg.value.name,
                arg.value.symbol,
                self.expr(&arg.value.expr)?
            )),
            Expr::Window(windows) => self.named_windows(windows),
            Expr::Show(show) => Ok(Self::show(show)),
            Expr::Insert(insert) => self.insert("INSERT", insert),
            Expr::Tables(list) => self.tables(&list.expr),
            Expr::Number(lit) => Ok(wrap(lit.value.to_string(), lit.parentheses)),
            Expr::Bigint(lit) | Expr::Origin(lit) => Ok(wrap(lit.value.clone(), lit.parentheses)),
            Expr::String(lit) => Ok(wrap(quote_string(&lit.value), lit.parentheses)),
            Expr::DoubleQuoteString(lit) => Ok(wrap(
                format!("\"{}\"", lit.value.replace('"', "\"\"")),
                lit.parentheses,
            )),
            Expr::BackticksQuoteString(lit) => Ok(wrap(
                format!("`{}`", lit.value.replace('`', "``")),
                lit.parentheses,
            )),
            Expr::HexString(lit) => Ok(wrap(format!("X'{}'", lit.value), lit.parentheses)),
            Expr::Param(lit) => Ok(wrap(format!(":{}", lit.value), lit.parentheses)),
            Expr::Default(lit) => Ok(wrap(lit.value.to_uppercase(), lit.parentheses)),
            Expr::Bool(lit) => Ok(wrap(
                if lit.value { "TRUE" } else { "FALSE" }.to_string(),
                lit.parentheses,
            )),
            Expr::Null(_) => Ok("NULL".to_string()),
            Expr::Star(_) => Ok("*".to_string()),
            Expr::Unknown(value) => self.unknown(value),
        }
    }

    /// Renders an expression in a comma context.
    ///
    /// An unparenthesized list without a custom separator yields its members;
    /// anything else yields a single entry.
    ///
    /// # Errors
    ///
    /// See [`Renderer::expr`].
    pub fn expr_list(&self, expr: &Expr) -> Result<Vec<String>> {
        match expr {
            Expr::ExprList(list) if !list.parentheses && list.separator.is_none() => {
                self.exprs(&list.value)
            }
            other => Ok(vec![self.expr(other)?]),
        }
    }

    /// Renders each expression of a slice.
    pub(crate) fn exprs(&self, exprs: &[Expr]) -> Result<Vec<String>> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    /// Renders the arguments between a call's parentheses.
    fn call_args(&self, args: &Expr) -> Result<String> {
        match args {
            Expr::ExprList(list) if list.separator.is_none() => {
                Ok(self.exprs(&list.value)?.join(", "))
            }
            other => self.expr(other),
        }
    }

    fn unknown(&self, value: &Value) -> Result<String> {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or("value");
        if self.config.mode == RenderMode::Strict {
            return Err(Error::UnrenderableNode(kind.to_string()));
        }
        if value.is_object() {
            warn!(kind, "No renderer for node kind, rendering as literal");
        }
        Ok(Self::literal(value))
    }

    /// Renders a raw JSON value as a literal.
    fn literal(value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => quote_string(s),
            Value::Array(items) => items.iter().map(Self::literal).collect::<Vec<_>>().join(", "),
            Value::Object(map) => map.get("value").map(Self::literal).unwrap_or_default(),
        }
    }

    fn binary(&self, binary: &BinaryExpr) -> Result<String> {
        let operator = keyword_upper(&binary.operator);
        let left = self.expr(&binary.left)?;
        let right = match (operator.as_str(), binary.right.as_ref()) {
            ("BETWEEN" | "NOT BETWEEN", Expr::ExprList(list)) if list.value.len() == 2 => {
                format!("{} AND {}", self.expr(&list.value[0])?, self.expr(&list.value[1])?)
            }
            ("IN" | "NOT IN", Expr::ExprList(list)) if !list.parentheses => {
                format!("({})", self.exprs(&list.value)?.join(", "))
            }
            ("IN" | "NOT IN", Expr::Select(select)) if !select.parentheses => {
                format!("({})", self.select(select)?)
            }
            (_, right) => self.expr(right)?,
        };
        Ok(wrap(format!("{left} {operator} {right}"), binary.parentheses))
    }

    fn unary(&self, unary: &UnaryExpr) -> Result<String> {
        let operator = keyword_upper(&unary.operator);
        let space = if TIGHT_UNARY.contains(&operator.as_str()) {
            ""
        } else {
            " "
        };
        let operand = self.expr(&unary.expr)?;
        Ok(wrap(format!("{operator}{space}{operand}"), unary.parentheses))
    }

    fn function(&self, func: &Function) -> Result<String> {
        let mut sql = match &func.args {
            None => func.name.clone(),
            Some(args) => format!("{}({})", func.name, self.call_args(args)?),
        };
        if let Some(suffix) = &func.suffix {
            sql.push(' ');
            sql.push_str(suffix);
        }
        if let Some(over) = &func.over {
            sql.push(' ');
            sql.push_str(&self.over(over)?);
        }
        Ok(wrap(sql, func.parentheses))
    }

    fn aggregate(&self, aggr: &AggrFunc) -> Result<String> {
        let args = &aggr.args;
        let inner = super::join_fragments([
            if args.distinct { "DISTINCT" } else { "" }.to_string(),
            self.call_args(&args.expr)?,
            self.order_by(args.orderby.as_deref())?,
            match &args.separator {
                Some(separator) => format!("SEPARATOR {}", self.expr(separator)?),
                None => String::new(),
            },
        ]);
        let mut sql = format!("{}({inner})", aggr.name.to_uppercase());
        if let Some(over) = &aggr.over {
            sql.push(' ');
            sql.push_str(&self.over(over)?);
        }
        Ok(wrap(sql, aggr.parentheses))
    }

    fn over(&self, over: &Over) -> Result<String> {
        Ok(format!("OVER {}", self.window_spec(over)?))
    }

    /// A window name, or `(<PARTITION BY ..> <ORDER BY ..> <frame>)`.
    fn window_spec(&self, over: &Over) -> Result<String> {
        if let Some(name) = &over.name {
            return Ok(name.clone());
        }
        let spec = super::join_fragments([
            self.partition_by(over.partitionby.as_deref())?,
            self.order_by(over.orderby.as_deref())?,
            over.frame.clone().unwrap_or_default(),
        ]);
        Ok(format!("({spec})"))
    }

    /// `w AS (..), w2 AS w`
    pub(crate) fn named_windows(&self, windows: &NamedWindows) -> Result<String> {
        let mut rendered = Vec::with_capacity(windows.expr.len());
        for window in &windows.expr {
            rendered.push(format!("{} AS {}", window.name, self.window_spec(&window.spec)?));
        }
        Ok(rendered.join(", "))
    }

    fn json_object_arg(&self, arg: &JsonKeyValue) -> Result<String> {
        let mut sql = format!("{} VALUE {}", self.expr(&arg.key)?, self.expr(&arg.value)?);
        if let Some(on) = &arg.on {
            sql.push_str(&format!(" {} ON NULL", self.expr(on)?.to_uppercase()));
        }
        Ok(sql)
    }

    fn flatten(&self, flatten: &Flatten) -> Result<String> {
        let named = [
            ("INPUT", &flatten.input),
            ("PATH", &flatten.path),
            ("OUTER", &flatten.outer),
            ("RECURSIVE", &flatten.recursive),
            ("MODE", &flatten.mode),
        ];
        let mut args = Vec::new();
        for (name, value) in named {
            if let Some(value) = value {
                args.push(format!("{name} => {}", self.expr(value)?));
            }
        }
        Ok(format!("FLATTEN({})", args.join(", ")))
    }

    fn window_func(&self, window: &WindowFunc) -> Result<String> {
        let args = match &window.args {
            Some(args) => self.call_args(args)?,
            None => String::new(),
        };
        Ok(format!(
            "{}({args}) {}",
            window.name.to_uppercase(),
            self.over(&window.over)?
        ))
    }

    fn cast(&self, cast: &Cast) -> Result<String> {
        let expr = self.expr(&cast.expr)?;
        let target = self.data_type(&cast.target)?;
        let sql = if cast.symbol == "::" {
            format!("{expr}::{target}")
        } else {
            format!("{}({expr} AS {target})", cast.keyword.to_uppercase())
        };
        Ok(wrap(sql, cast.parentheses))
    }

    fn case(&self, case: &Case) -> Result<String> {
        let mut parts = vec!["CASE".to_string()];
        if let Some(expr) = &case.expr {
            parts.push(self.expr(expr)?);
        }
        for arm in &case.args {
            match arm {
                CaseArm::When { cond, result } => {
                    parts.push(format!("WHEN {} THEN {}", self.expr(cond)?, self.expr(result)?));
                }
                CaseArm::Else { result } => parts.push(format!("ELSE {}", self.expr(result)?)),
            }
        }
        parts.push("END".to_string());
        Ok(wrap(parts.join(" "), case.parentheses))
    }

    fn array_access(&self, access: &ArrayAccess) -> Result<String> {
        // Subscripted columns are paths; the base name stays unquoted.
        let mut sql = match access.expr.as_ref() {
            Expr::ColumnRef(col) => col.column.text().unwrap_or_default(),
            other => self.expr(other)?,
        };
        for index in &access.indices {
            sql.push_str(&format!("[{}]", self.expr(index)?));
        }
        Ok(sql)
    }

    fn list(&self, list: &ExprList) -> Result<String> {
        let separator = list.separator.as_deref().unwrap_or(", ");
        let joined = self.exprs(&list.value)?.join(separator);
        Ok(wrap(joined, list.parentheses))
    }

    fn var(var: &Var) -> String {
        let mut name = var.name.clone();
        for member in &var.members {
            name.push('.');
            name.push_str(member);
        }
        let mut sql = format!("{}{name}", var.prefix.as_deref().unwrap_or_default());
        if let Some(suffix) = &var.suffix {
            sql.push_str(suffix);
        }
        match &var.quoted {
            Some(quote) => format!("{quote}{sql}{quote}"),
            None => sql,
        }
    }

    fn map_object(&self, map: &MapObject) -> Result<String> {
        let mut pairs = Vec::with_capacity(map.expr.len());
        for entry in &map.expr {
            pairs.push(format!("{}, {}", self.expr(&entry.key)?, self.expr(&entry.value)?));
        }
        Ok(format!("{}[{}]", map.keyword.to_uppercase(), pairs.join(", ")))
    }

    fn array(&self, array: &ArrayLiteral) -> Result<String> {
        let items = self.exprs(&array.expr_list)?.join(", ");
        let keyword = array.keyword.as_deref().map(str::to_uppercase).unwrap_or_default();
        if array.brackets || keyword.is_empty() {
            Ok(format!("{keyword}[{items}]"))
        } else {
            Ok(format!("{keyword}({items})"))
        }
    }

    fn struct_literal(&self, literal: &StructLiteral) -> Result<String> {
        let items = self.exprs(&literal.expr_list)?.join(", ");
        match &literal.keyword {
            Some(keyword) => Ok(format!("{}({items})", keyword.to_uppercase())),
            None => Ok(format!("{{{items}}}")),
        }
    }

    fn lambda(&self, lambda: &Lambda) -> Result<String> {
        let body = self.expr(&lambda.expr)?;
        match lambda.args.as_slice() {
            [single] => Ok(format!("{single} -> {body}")),
            args => Ok(format!("({}) -> {body}", args.join(", "))),
        }
    }

    /// Renders a data type; nested struct fields quote their names.
    pub(crate) fn data_type(&self, ty: &DataType) -> Result<String> {
        let mut sql = ty.name.clone();
        match (ty.length, ty.scale) {
            (Some(length), Some(scale)) => sql.push_str(&format!("({length}, {scale})")),
            (Some(length), None) => sql.push_str(&format!("({length})")),
            _ if !ty.args.is_empty() => {
                sql.push_str(&format!("({})", self.exprs(&ty.args)?.join(", ")));
            }
            _ => {}
        }
        if ty.array {
            sql.push_str("[]");
        }
        for suffix in &ty.suffix {
            sql.push(' ');
            sql.push_str(&suffix.to_uppercase());
        }
        Ok(sql)
    }

    /// `ORDER BY <expr> <direction> [NULLS ..], ..`; empty without items.
    pub(crate) fn order_by(&self, items: Option<&[OrderByItem]>) -> Result<String> {
        let Some(items) = items else {
            return Ok(String::new());
        };
        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            let direction = item
                .direction
                .as_deref()
                .map_or_else(|| "ASC".to_string(), str::to_uppercase);
            let nulls = item.nulls.as_deref().map(str::to_uppercase).unwrap_or_default();
            rendered.push(super::join_fragments([self.expr(&item.expr)?, direction, nulls]));
        }
        Ok(connector("ORDER BY", &rendered.join(", ")))
    }

    /// `PARTITION BY <expr>, ..`; directions are never printed.
    pub(crate) fn partition_by(&self, items: Option<&[OrderByItem]>) -> Result<String> {
        let Some(items) = items else {
            return Ok(String::new());
        };
        let rendered = items
            .iter()
            .map(|item| self.expr(&item.expr))
            .collect::<Result<Vec<_>>>()?;
        trace!(items = rendered.len(), "Rendered partition list");
        Ok(connector("PARTITION BY", &rendered.join(", ")))
    }
}

/// Uppercases word operators (`and`, `not in`, `is not`) and leaves symbols.
fn keyword_upper(operator: &str) -> String {
    if operator.chars().any(char::is_alphabetic) {
        operator.to_uppercase()
    } else {
        operator.to_string()
    }
}
