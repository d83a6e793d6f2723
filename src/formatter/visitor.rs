//! AST-walking renderer. One method per node category; each writes into the
//! shared output buffer at the current indentation level.

use super::config::FormatterConfig;
use super::error::FormatterError;
use crate::ast::{
    Block, CatchClause, ElifClause, Expression, ExpressionKind, FStringSegment, FunctionDecl,
    MatchArm, MatchArmBody, MatchPattern, Parameter, ParameterKind, PatternKind, SourceFile,
    Statement, StatementKind, TypeExpr, TypeKind, UnaryOperator, UpdateOperator, UseKind,
};

pub struct FormatterVisitor {
    config: FormatterConfig,
    out: String,
    indent: usize,
}

impl FormatterVisitor {
    pub fn new(config: FormatterConfig) -> Self {
        Self {
            config,
            out: String::new(),
            indent: 0,
        }
    }

    pub fn format_source_file(&mut self, ast: &SourceFile) -> Result<String, FormatterError> {
        for statement in &ast.statements {
            self.write_statement(statement)?;
            self.out.push('\n');
        }
        Ok(std::mem::take(&mut self.out))
    }

    fn push_indent(&mut self) {
        for _ in 0..(self.indent * self.config.indent_width) {
            self.out.push(' ');
        }
    }

    // --- Statements ---

    fn write_statement(&mut self, statement: &Statement) -> Result<(), FormatterError> {
        self.push_indent();
        match &statement.kind {
            StatementKind::VarDecl(decl) => {
                if decl.is_pub {
                    self.out.push_str("pub ");
                }
                self.out.push_str("var ");
                self.out.push_str(&decl.name);
                if let Some(ty) = &decl.ty {
                    self.out.push_str(": ");
                    self.write_type(ty);
                }
                if let Some(init) = &decl.init {
                    self.out.push_str(" = ");
                    self.write_expression(init)?;
                }
                self.out.push(';');
            }
            StatementKind::ConstDecl(decl) => {
                if decl.is_pub {
                    self.out.push_str("pub ");
                }
                self.out.push_str("const ");
                self.out.push_str(&decl.name);
                if let Some(ty) = &decl.ty {
                    self.out.push_str(": ");
                    self.write_type(ty);
                }
                self.out.push_str(" = ");
                self.write_expression(&decl.value)?;
                self.out.push(';');
            }
            StatementKind::FunctionDecl(decl) => self.write_function(decl)?,
            StatementKind::StructDecl(decl) => {
                if decl.is_pub {
                    self.out.push_str("pub ");
                }
                self.out.push_str("struct ");
                self.out.push_str(&decl.name);
                self.out.push(' ');
                if decl.fields.is_empty() {
                    self.out.push_str("{}");
                } else {
                    self.out.push_str("{\n");
                    self.indent += 1;
                    for field in &decl.fields {
                        self.push_indent();
                        if field.is_pub {
                            self.out.push_str("pub ");
                        }
                        self.out.push_str(&field.name);
                        self.out.push_str(": ");
                        self.write_type(&field.ty);
                        self.out.push_str(",\n");
                    }
                    self.indent -= 1;
                    self.push_indent();
                    self.out.push('}');
                }
            }
            StatementKind::EnumDecl(decl) => {
                if decl.is_pub {
                    self.out.push_str("pub ");
                }
                self.out.push_str("enum ");
                self.out.push_str(&decl.name);
                self.out.push(' ');
                if decl.variants.is_empty() {
                    self.out.push_str("{}");
                } else {
                    self.out.push_str("{\n");
                    self.indent += 1;
                    for variant in &decl.variants {
                        self.push_indent();
                        self.out.push_str(&variant.name);
                        if !variant.payload.is_empty() {
                            self.out.push('(');
                            for (i, ty) in variant.payload.iter().enumerate() {
                                if i > 0 {
                                    self.out.push_str(", ");
                                }
                                self.write_type(ty);
                            }
                            self.out.push(')');
                        }
                        self.out.push_str(",\n");
                    }
                    self.indent -= 1;
                    self.push_indent();
                    self.out.push('}');
                }
            }
            StatementKind::ImplBlock(block) => {
                self.out.push_str("impl ");
                self.out.push_str(&block.target);
                self.out.push(' ');
                if block.functions.is_empty() {
                    self.out.push_str("{}");
                } else {
                    self.out.push_str("{\n");
                    self.indent += 1;
                    for function in &block.functions {
                        self.push_indent();
                        self.write_function(function)?;
                        self.out.push('\n');
                    }
                    self.indent -= 1;
                    self.push_indent();
                    self.out.push('}');
                }
            }
            StatementKind::TypeAlias(alias) => {
                if alias.is_pub {
                    self.out.push_str("pub ");
                }
                self.out.push_str("type ");
                self.out.push_str(&alias.name);
                self.out.push_str(" = ");
                self.write_type(&alias.ty);
                self.out.push(';');
            }
            StatementKind::ModuleDecl(decl) => {
                self.out.push_str("mod ");
                self.out.push_str(&decl.name);
                match &decl.body {
                    None => self.out.push(';'),
                    Some(body) => {
                        self.out.push(' ');
                        self.write_block(body)?;
                    }
                }
            }
            StatementKind::Use(decl) => {
                match &decl.kind {
                    UseKind::Path(path) => {
                        self.out.push_str("use ");
                        self.out.push_str(&path.join("::"));
                    }
                    UseKind::From { module, names } => {
                        self.out.push_str("from ");
                        self.out.push_str(module);
                        self.out.push_str(" use ");
                        self.out.push_str(&names.join(", "));
                    }
                }
                if let Some(alias) = &decl.alias {
                    self.out.push_str(" as ");
                    self.out.push_str(alias);
                }
                self.out.push(';');
            }
            StatementKind::If(stmt) => {
                self.out.push_str("if ");
                self.write_expression(&stmt.condition)?;
                self.out.push(' ');
                self.write_block(&stmt.consequence)?;
                for ElifClause {
                    condition,
                    consequence,
                    ..
                } in &stmt.elif_clauses
                {
                    self.out.push_str(" elif ");
                    self.write_expression(condition)?;
                    self.out.push(' ');
                    self.write_block(consequence)?;
                }
                if let Some(else_clause) = &stmt.else_clause {
                    self.out.push_str(" else ");
                    self.write_block(else_clause)?;
                }
            }
            StatementKind::While(stmt) => {
                self.out.push_str("while ");
                self.write_expression(&stmt.condition)?;
                self.out.push(' ');
                self.write_block(&stmt.body)?;
            }
            StatementKind::For(stmt) => {
                self.out.push_str("for ");
                self.out.push_str(&stmt.binding);
                self.out.push_str(" in ");
                self.write_expression(&stmt.iterable)?;
                self.out.push(' ');
                self.write_block(&stmt.body)?;
            }
            StatementKind::Match(stmt) => {
                self.out.push_str("match ");
                self.write_expression(&stmt.value)?;
                self.out.push(' ');
                if stmt.arms.is_empty() {
                    self.out.push_str("{}");
                } else {
                    self.out.push_str("{\n");
                    self.indent += 1;
                    for arm in &stmt.arms {
                        self.write_match_arm(arm)?;
                    }
                    self.indent -= 1;
                    self.push_indent();
                    self.out.push('}');
                }
            }
            StatementKind::Try(stmt) => {
                self.out.push_str("try ");
                self.write_block(&stmt.body)?;
                for CatchClause { binding, body, .. } in &stmt.catch_clauses {
                    self.out.push_str(" catch ");
                    if let Some(binding) = binding {
                        self.out.push('(');
                        self.out.push_str(binding);
                        self.out.push_str(") ");
                    }
                    self.write_block(body)?;
                }
            }
            StatementKind::Return(value) => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.write_expression(value)?;
                }
                self.out.push(';');
            }
            StatementKind::Break => self.out.push_str("break;"),
            StatementKind::Continue => self.out.push_str("continue;"),
            StatementKind::Throw(value) => {
                self.out.push_str("throw ");
                self.write_expression(value)?;
                self.out.push(';');
            }
            StatementKind::Expr(expr) => {
                self.write_expression(expr)?;
                self.out.push(';');
            }
            StatementKind::Block(block) => self.write_block(block)?,
        }
        Ok(())
    }

    fn write_function(&mut self, decl: &FunctionDecl) -> Result<(), FormatterError> {
        if decl.is_pub {
            self.out.push_str("pub ");
        }
        self.out.push_str("fun ");
        self.out.push_str(&decl.name);
        self.out.push('(');
        for (i, Parameter { kind, .. }) in decl.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            match kind {
                ParameterKind::Receiver => self.out.push_str("self"),
                ParameterKind::Named { name, ty } => {
                    self.out.push_str(name);
                    self.out.push_str(": ");
                    self.write_type(ty);
                }
            }
        }
        self.out.push(')');
        if let Some(return_type) = &decl.return_type {
            self.out.push_str(" -> ");
            self.write_type(return_type);
        }
        self.out.push(' ');
        self.write_block(&decl.body)
    }

    fn write_match_arm(&mut self, arm: &MatchArm) -> Result<(), FormatterError> {
        self.push_indent();
        self.write_pattern(&arm.pattern)?;
        self.out.push_str(" => ");
        match &arm.body {
            MatchArmBody::Expr(expr) => self.write_expression(expr)?,
            MatchArmBody::Block(block) => self.write_block(block)?,
        }
        self.out.push_str(",\n");
        Ok(())
    }

    fn write_pattern(&mut self, pattern: &MatchPattern) -> Result<(), FormatterError> {
        match &pattern.kind {
            PatternKind::Wildcard => {
                self.out.push('_');
                Ok(())
            }
            PatternKind::Binding(name) => {
                self.out.push_str(name);
                Ok(())
            }
            PatternKind::Literal(expr) => self.write_expression(expr),
        }
    }

    fn write_block(&mut self, block: &Block) -> Result<(), FormatterError> {
        if block.statements.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push_str("{\n");
        self.indent += 1;
        for statement in &block.statements {
            self.write_statement(statement)?;
            self.out.push('\n');
        }
        self.indent -= 1;
        self.push_indent();
        self.out.push('}');
        Ok(())
    }

    // --- Expressions ---

    fn write_expression(&mut self, expr: &Expression) -> Result<(), FormatterError> {
        match &expr.kind {
            ExpressionKind::Identifier(name) => self.out.push_str(name),
            ExpressionKind::IntLiteral(value) => self.out.push_str(&value.to_string()),
            ExpressionKind::FloatLiteral(value) => {
                let text = format_float(*value);
                self.out.push_str(&text);
            }
            ExpressionKind::StringLiteral(text) => {
                self.out.push('"');
                escape_into(text, &mut self.out);
                self.out.push('"');
            }
            ExpressionKind::FString(segments) => {
                self.out.push_str("f\"");
                for segment in segments {
                    match segment {
                        FStringSegment::Text(text) => escape_into(text, &mut self.out),
                        FStringSegment::Expr(inner) => {
                            self.out.push('{');
                            self.write_expression(inner)?;
                            self.out.push('}');
                        }
                    }
                }
                self.out.push('"');
            }
            ExpressionKind::BoolLiteral(value) => {
                self.out.push_str(if *value { "true" } else { "false" })
            }
            ExpressionKind::NullLiteral => self.out.push_str("null"),
            ExpressionKind::SelfExpr => self.out.push_str("self"),
            ExpressionKind::Binary { op, left, right } => {
                self.write_expression(left)?;
                self.out.push(' ');
                self.out.push_str(op.as_ref());
                self.out.push(' ');
                self.write_expression(right)?;
            }
            ExpressionKind::Unary { op, operand } => {
                self.out.push_str(op.as_ref());
                if unary_needs_space(*op, operand) {
                    self.out.push(' ');
                }
                self.write_expression(operand)?;
            }
            ExpressionKind::Update {
                op,
                operand,
                prefix,
            } => {
                if *prefix {
                    self.out.push_str(op.as_ref());
                    self.write_expression(operand)?;
                } else {
                    self.write_expression(operand)?;
                    self.out.push_str(op.as_ref());
                }
            }
            ExpressionKind::Call { callee, arguments } => {
                self.write_expression(callee)?;
                self.out.push('(');
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_expression(argument)?;
                }
                self.out.push(')');
            }
            ExpressionKind::Index { object, index } => {
                self.write_expression(object)?;
                self.out.push('[');
                self.write_expression(index)?;
                self.out.push(']');
            }
            ExpressionKind::Member { object, property } => {
                self.write_expression(object)?;
                self.out.push('.');
                self.out.push_str(property);
            }
            ExpressionKind::Assignment { op, target, value } => {
                self.write_expression(target)?;
                self.out.push(' ');
                self.out.push_str(op.as_ref());
                self.out.push(' ');
                self.write_expression(value)?;
            }
            ExpressionKind::Ternary {
                condition,
                consequence,
                alternative,
            } => {
                self.write_expression(condition)?;
                self.out.push_str(" ? ");
                self.write_expression(consequence)?;
                self.out.push_str(" : ");
                self.write_expression(alternative)?;
            }
            ExpressionKind::Range {
                start,
                end,
                inclusive,
            } => {
                self.write_expression(start)?;
                self.out.push_str(if *inclusive { "..=" } else { ".." });
                self.write_expression(end)?;
            }
            ExpressionKind::ArrayLiteral(elements) => {
                self.out.push('[');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_expression(element)?;
                }
                self.out.push(']');
            }
            ExpressionKind::MapLiteral(entries) => {
                self.out.push('{');
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_expression(&entry.key)?;
                    self.out.push_str(": ");
                    self.write_expression(&entry.value)?;
                }
                self.out.push('}');
            }
            ExpressionKind::Paren(inner) => {
                self.out.push('(');
                self.write_expression(inner)?;
                self.out.push(')');
            }
            ExpressionKind::Error => return Err(FormatterError::ErrorNode),
        }
        Ok(())
    }

    // --- Types ---

    fn write_type(&mut self, ty: &TypeExpr) {
        match &ty.kind {
            TypeKind::Primitive(p) => self.out.push_str(p.as_ref()),
            TypeKind::Array(element) => {
                self.out.push_str("array<");
                self.write_type(element);
                self.out.push('>');
            }
            TypeKind::Map(key, value) => {
                self.out.push_str("map<");
                self.write_type(key);
                self.out.push_str(", ");
                self.write_type(value);
                self.out.push('>');
            }
            TypeKind::Named(name) => self.out.push_str(name),
        }
    }
}

/// `-` followed by another leading `-` (or `+` by `+`) would re-lex as an
/// update operator; keep a space between them.
fn unary_needs_space(op: UnaryOperator, operand: &Expression) -> bool {
    match op {
        UnaryOperator::Negate => matches!(
            &operand.kind,
            ExpressionKind::Unary {
                op: UnaryOperator::Negate,
                ..
            } | ExpressionKind::Update {
                op: UpdateOperator::Decrement,
                prefix: true,
                ..
            }
        ),
        UnaryOperator::Plus => matches!(
            &operand.kind,
            ExpressionKind::Unary {
                op: UnaryOperator::Plus,
                ..
            } | ExpressionKind::Update {
                op: UpdateOperator::Increment,
                prefix: true,
                ..
            }
        ),
        _ => false,
    }
}

/// Renders a float so it re-lexes as a float literal: a fraction is always
/// present, and an exponent-only rendering gains one.
fn format_float(value: f64) -> String {
    let mut text = format!("{:?}", value);
    if let Some(e) = text.find(['e', 'E']) {
        if !text[..e].contains('.') {
            text.insert_str(e, ".0");
        }
    } else if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Escapes string content for quoting; the known escape set only.
fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float_is_relexable() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.025), "0.025");
        assert_eq!(format_float(1e30), "1.0e30");
        assert_eq!(format_float(1500.0), "1500.0");
    }

    #[test]
    fn test_escape_round_trip_set() {
        let mut out = String::new();
        escape_into("a\"b\\c\nd\te", &mut out);
        assert_eq!(out, "a\\\"b\\\\c\\nd\\te");
    }
}
