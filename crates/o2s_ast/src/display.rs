// o2s_ast/display - Swift spelling of expressions and statements
//! `Display` renders expressions as single-line Swift. Statements nested in
//! blocks are joined with `; `; multi-line layout is the writer's job.

use crate::expression::{
    Constant, Expression, ExpressionKind, FunctionArgument, OptionalAccess, Postfix, SizeOfTarget,
};
use crate::statement::{CompoundStatement, Statement, VariableDeclaration};
use std::fmt;

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(value) => write!(f, "{}", value),
            Constant::Binary(value) => write!(f, "0b{:b}", value),
            Constant::Octal(value) => write!(f, "0o{:o}", value),
            Constant::Hexadecimal(value) => write!(f, "0x{:X}", value),
            Constant::Float(value) if value.fract() == 0.0 && value.is_finite() => {
                write!(f, "{:.1}", value)
            }
            Constant::Float(value) => write!(f, "{}", value),
            Constant::Boolean(value) => write!(f, "{}", value),
            Constant::String(value) => write!(f, "\"{}\"", escape_string(value)),
            Constant::Nil => f.write_str("nil"),
            Constant::Raw(text) => f.write_str(text),
        }
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Binding strength of an expression when it appears as an operand.
fn binding_power(expression: &Expression) -> u8 {
    match &expression.kind {
        ExpressionKind::Assignment { .. } => 1,
        ExpressionKind::Ternary { .. } => 1,
        ExpressionKind::Binary { op, .. } => op.precedence(),
        ExpressionKind::Cast { .. } => 4,
        ExpressionKind::Unary { .. } => 20,
        _ => 30,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expression, minimum: u8) -> fmt::Result {
    if binding_power(operand) < minimum {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

fn write_arguments(f: &mut fmt::Formatter<'_>, arguments: &[FunctionArgument]) -> fmt::Result {
    for (index, argument) in arguments.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        if let Some(label) = &argument.label {
            write!(f, "{}: ", label)?;
        }
        write!(f, "{}", argument.expression)?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Identifier(name) => f.write_str(name),
            ExpressionKind::Constant(constant) => write!(f, "{}", constant),
            ExpressionKind::Unary { op, operand } => {
                write!(f, "{}", op)?;
                write_operand(f, operand, 20)
            }
            ExpressionKind::Binary { lhs, op, rhs } => {
                let precedence = op.precedence();
                write_operand(f, lhs, precedence)?;
                write!(f, " {} ", op)?;
                write_operand(f, rhs, precedence + 1)
            }
            ExpressionKind::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                write_operand(f, condition, 2)?;
                f.write_str(" ? ")?;
                write_operand(f, if_true, 2)?;
                f.write_str(" : ")?;
                write_operand(f, if_false, 1)
            }
            ExpressionKind::Assignment { lhs, op, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            ExpressionKind::Postfix {
                receiver,
                op,
                optional_access,
            } => {
                write_operand(f, receiver, 30)?;
                match optional_access {
                    OptionalAccess::None => {}
                    OptionalAccess::SafeUnwrap => f.write_str("?")?,
                    OptionalAccess::ForceUnwrap => f.write_str("!")?,
                }
                match op {
                    Postfix::Member(name) => write!(f, ".{}", name),
                    Postfix::FunctionCall(arguments) => {
                        f.write_str("(")?;
                        write_arguments(f, arguments)?;
                        f.write_str(")")
                    }
                    Postfix::Subscript(index) => write!(f, "[{}]", index),
                }
            }
            ExpressionKind::Cast { expression, target } => {
                write_operand(f, expression, 5)?;
                write!(f, " as? {}", target)
            }
            ExpressionKind::SizeOf(SizeOfTarget::Expression(inner)) => {
                write!(f, "MemoryLayout.size(ofValue: {})", inner)
            }
            ExpressionKind::SizeOf(SizeOfTarget::Type(ty)) => {
                write!(f, "MemoryLayout<{}>.size", ty)
            }
            ExpressionKind::Parens(inner) => write!(f, "({})", inner),
            ExpressionKind::ArrayLiteral(elements) => {
                f.write_str("[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
            ExpressionKind::DictionaryLiteral(pairs) if pairs.is_empty() => f.write_str("[:]"),
            ExpressionKind::DictionaryLiteral(pairs) => {
                f.write_str("[")?;
                for (index, pair) in pairs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                f.write_str("]")
            }
            ExpressionKind::Block {
                parameters,
                return_type,
                body,
            } => {
                f.write_str("{ (")?;
                for (index, parameter) in parameters.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", parameter.name, parameter.ty)?;
                }
                write!(f, ") -> {} in", return_type)?;
                if !body.is_empty() {
                    write!(f, " {}", body)?;
                }
                f.write_str(" }")
            }
            ExpressionKind::Unknown(text) => write!(f, "/* {} */", text),
        }
    }
}

impl fmt::Display for CompoundStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, statement) in self.statements.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for VariableDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_constant { "let" } else { "var" };
        write!(f, "{} {}: {}", keyword, self.name, self.ty)?;
        if let Some(initialization) = &self.initialization {
            write!(f, " = {}", initialization)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Compound(body) => write!(f, "do {{ {} }}", body),
            Statement::If {
                condition,
                body,
                else_body,
            } => {
                write!(f, "if {} {{ {} }}", condition, body)?;
                if let Some(else_body) = else_body {
                    write!(f, " else {{ {} }}", else_body)?;
                }
                Ok(())
            }
            Statement::While { condition, body } => write!(f, "while {} {{ {} }}", condition, body),
            Statement::DoWhile { body, condition } => {
                write!(f, "repeat {{ {} }} while {}", body, condition)
            }
            Statement::ForIn {
                binding,
                sequence,
                body,
            } => write!(f, "for {} in {} {{ {} }}", binding, sequence, body),
            Statement::Return(None) => f.write_str("return"),
            Statement::Return(Some(value)) => write!(f, "return {}", value),
            Statement::Expressions(expressions) => {
                for (index, expression) in expressions.iter().enumerate() {
                    if index > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", expression)?;
                }
                Ok(())
            }
            Statement::VariableDeclarations(declarations) => {
                for (index, declaration) in declarations.iter().enumerate() {
                    if index > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", declaration)?;
                }
                Ok(())
            }
            Statement::Break => f.write_str("break"),
            Statement::Continue => f.write_str("continue"),
            Statement::Unknown(source) => write!(f, "/* {} */", source.text),
        }
    }
}
