// o2s_ast/operators - Swift operators and their categories
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operators usable in unary, binary and assignment expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwiftOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    // Compound assignment
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    Assign,
    // Logical
    Negate,
    And,
    Or,
    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseNot,
    ShiftLeft,
    ShiftRight,
    // Comparison
    Equals,
    Unequals,
    Identical,
    NotIdentical,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    // Null safety
    NullCoalesce,
    // Ranges
    OpenRange,
    ClosedRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Arithmetic,
    Logical,
    Bitwise,
    Comparison,
    NullCoalesce,
    Range,
    Assignment,
}

impl SwiftOperator {
    pub fn category(self) -> OperatorCategory {
        use SwiftOperator::*;
        match self {
            Add | Subtract | Multiply | Divide | Mod => OperatorCategory::Arithmetic,
            Negate | And | Or => OperatorCategory::Logical,
            BitwiseAnd | BitwiseOr | BitwiseXor | BitwiseNot | ShiftLeft | ShiftRight => {
                OperatorCategory::Bitwise
            }
            Equals | Unequals | Identical | NotIdentical | LessThan | LessThanOrEqual
            | GreaterThan | GreaterThanOrEqual => OperatorCategory::Comparison,
            NullCoalesce => OperatorCategory::NullCoalesce,
            OpenRange | ClosedRange => OperatorCategory::Range,
            AddAssign | SubtractAssign | MultiplyAssign | DivideAssign | ModAssign
            | BitwiseAndAssign | BitwiseOrAssign | BitwiseXorAssign | ShiftLeftAssign
            | ShiftRightAssign | Assign => OperatorCategory::Assignment,
        }
    }

    pub fn as_str(self) -> &'static str {
        use SwiftOperator::*;
        match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Mod => "%",
            AddAssign => "+=",
            SubtractAssign => "-=",
            MultiplyAssign => "*=",
            DivideAssign => "/=",
            ModAssign => "%=",
            BitwiseAndAssign => "&=",
            BitwiseOrAssign => "|=",
            BitwiseXorAssign => "^=",
            ShiftLeftAssign => "<<=",
            ShiftRightAssign => ">>=",
            Assign => "=",
            Negate => "!",
            And => "&&",
            Or => "||",
            BitwiseAnd => "&",
            BitwiseOr => "|",
            BitwiseXor => "^",
            BitwiseNot => "~",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Equals => "==",
            Unequals => "!=",
            Identical => "===",
            NotIdentical => "!==",
            LessThan => "<",
            LessThanOrEqual => "<=",
            GreaterThan => ">",
            GreaterThanOrEqual => ">=",
            NullCoalesce => "??",
            OpenRange => "..<",
            ClosedRange => "...",
        }
    }

    /// Looks an operator up by its Swift spelling.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        use SwiftOperator::*;
        const ALL: [SwiftOperator; 36] = [
            Add,
            Subtract,
            Multiply,
            Divide,
            Mod,
            AddAssign,
            SubtractAssign,
            MultiplyAssign,
            DivideAssign,
            ModAssign,
            BitwiseAndAssign,
            BitwiseOrAssign,
            BitwiseXorAssign,
            ShiftLeftAssign,
            ShiftRightAssign,
            Assign,
            Negate,
            And,
            Or,
            BitwiseAnd,
            BitwiseOr,
            BitwiseXor,
            BitwiseNot,
            ShiftLeft,
            ShiftRight,
            Equals,
            Unequals,
            Identical,
            NotIdentical,
            LessThan,
            LessThanOrEqual,
            GreaterThan,
            GreaterThanOrEqual,
            NullCoalesce,
            OpenRange,
            ClosedRange,
        ];
        ALL.into_iter().find(|op| op.as_str() == symbol)
    }

    /// Plain operator applied by a compound assignment (`+=` → `+`).
    pub fn compound_base(self) -> Option<SwiftOperator> {
        use SwiftOperator::*;
        match self {
            AddAssign => Some(Add),
            SubtractAssign => Some(Subtract),
            MultiplyAssign => Some(Multiply),
            DivideAssign => Some(Divide),
            ModAssign => Some(Mod),
            BitwiseAndAssign => Some(BitwiseAnd),
            BitwiseOrAssign => Some(BitwiseOr),
            BitwiseXorAssign => Some(BitwiseXor),
            ShiftLeftAssign => Some(ShiftLeft),
            ShiftRightAssign => Some(ShiftRight),
            _ => None,
        }
    }

    /// Binding strength used when printing; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self.category() {
            OperatorCategory::Assignment => 1,
            OperatorCategory::NullCoalesce => 5,
            OperatorCategory::Range => 6,
            OperatorCategory::Comparison => 4,
            OperatorCategory::Logical => match self {
                SwiftOperator::Or => 2,
                _ => 3,
            },
            OperatorCategory::Bitwise => match self {
                SwiftOperator::BitwiseOr | SwiftOperator::BitwiseXor => 7,
                _ => 9,
            },
            OperatorCategory::Arithmetic => match self {
                SwiftOperator::Add | SwiftOperator::Subtract => 7,
                _ => 8,
            },
        }
    }
}

impl fmt::Display for SwiftOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
