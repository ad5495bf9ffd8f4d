// o2s_passes/passes/ast_rewriting - Idiom rewrites inside function bodies
use crate::context::IntentionPassContext;
use crate::pass::IntentionPass;
use o2s_ast::{
    walk_compound_mut, walk_expression_mut, Expression, FunctionArgument, Matcher,
    OptionalAccess, Postfix, PostfixChain, PostfixChainEntry, Statement, SyntaxVisitorMut,
};
use o2s_intentions::{IntentionCollection, IntentionError};
use o2s_typesystem::{KnownMember, TypeSystem};
use tracing::debug;

/// Rewrites Objective-C idioms in bodies into their Swift spelling, then
/// re-resolves the types of every body it touched.
///
/// Message sends arrive as method calls, so `[[Foo alloc] initWithX:a y:b]`
/// is `Foo.alloc().initWithX(a, y: b)` and folds to `Foo(x: a, y: b)`.
/// An `if` whose only statement calls the block it nil-checks becomes an
/// optional call, `block?(args)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstRewritingPass;

impl AstRewritingPass {
    pub const NAME: &'static str = "ast-rewriting";
}

impl IntentionPass for AstRewritingPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(
        &self,
        collection: &mut IntentionCollection,
        context: &mut IntentionPassContext,
    ) -> Result<(), IntentionError> {
        let mut touched = Vec::new();
        for owner in collection.function_body_owners() {
            let mut rewriter = BodyRewriter::new(context.type_system());
            for body in collection.bodies_mut(owner) {
                walk_compound_mut(&mut rewriter, body);
            }
            if let Some(initializer) = collection.initializer_mut(owner) {
                walk_expression_mut(&mut rewriter, initializer);
            }
            if rewriter.rewrites > 0 {
                debug!(%owner, rewrites = rewriter.rewrites, "rewrote body");
                touched.push(owner);
            }
        }
        for owner in touched {
            context.resolve_expressions_in(collection, owner)?;
        }
        Ok(())
    }
}

struct BodyRewriter<'a> {
    type_system: &'a dyn TypeSystem,
    alloc_init: Matcher<Expression>,
    rewrites: usize,
}

impl<'a> BodyRewriter<'a> {
    fn new(type_system: &'a dyn TypeSystem) -> Self {
        Self {
            type_system,
            alloc_init: alloc_init_matcher(),
            rewrites: 0,
        }
    }
}

impl SyntaxVisitorMut for BodyRewriter<'_> {
    fn exit_expression_mut(&mut self, expression: &mut Expression) {
        if !self.alloc_init.matches(expression) {
            return;
        }
        if let Some(mut folded) = fold_alloc_init(expression) {
            folded.source = expression.source.take();
            *expression = folded;
            self.rewrites += 1;
        }
    }

    fn exit_statement_mut(&mut self, statement: &mut Statement) {
        if let Some(call) = optional_block_call(statement, self.type_system) {
            *statement = Statement::expression(call);
            self.rewrites += 1;
        }
    }
}

/// `Type.alloc().init...(...)` on a type name.
fn alloc_init_matcher() -> Matcher<Expression> {
    let type_name = Matcher::<Expression>::predicate(|expression| {
        expression
            .as_identifier()
            .is_some_and(|name| name != "self" && name != "super")
    });
    Matcher::<Expression>::inverted(
        Matcher::<PostfixChain>::root(type_name)
            .and(Matcher::<PostfixChain>::entry_count(2))
            .and(Matcher::<PostfixChain>::entry(
                1,
                Matcher::<PostfixChainEntry>::method_call("alloc", vec![]),
            ))
            .and(Matcher::<PostfixChain>::entry(
                2,
                Matcher::<PostfixChainEntry>::method_call_where(is_initializer_name),
            )),
    )
}

fn is_initializer_name(name: &str) -> bool {
    name == "init"
        || name
            .strip_prefix("initWith")
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn fold_alloc_init(expression: &Expression) -> Option<Expression> {
    let chain = PostfixChain::invert(expression);
    let type_name = chain.root.as_identifier()?;
    let initializer = chain.entry_at(2)?;
    let selector = initializer.member_name()?;
    let mut arguments = initializer.arguments()?.to_vec();

    if let (Some(rest), Some(first)) = (selector.strip_prefix("initWith"), arguments.first_mut()) {
        if first.label.is_none() {
            first.label = Some(lower_first(rest));
        }
    }
    Some(Expression::identifier(type_name).call(arguments))
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `if (block != nil) { block(args); }` in any nil-check spelling, with no
/// else branch, as `block?(args)`.
fn optional_block_call(statement: &Statement, type_system: &dyn TypeSystem) -> Option<Expression> {
    let Statement::If {
        condition,
        body,
        else_body: None,
    } = statement
    else {
        return None;
    };
    let [Statement::Expressions(expressions)] = body.statements.as_slice() else {
        return None;
    };
    let [call] = expressions.as_slice() else {
        return None;
    };
    let (callee, Postfix::FunctionCall(arguments)) = call.as_postfix()? else {
        return None;
    };
    if !may_be_block(callee, type_system) {
        return None;
    }
    let checks_callee = Matcher::<Expression>::nil_check(Matcher::equals(callee.clone()));
    if !checks_callee.matches(condition) {
        return None;
    }

    let arguments: Vec<FunctionArgument> = arguments.clone();
    let mut rewritten = callee
        .clone()
        .call(arguments)
        .with_optional_access(OptionalAccess::SafeUnwrap);
    rewritten.source = call.source.clone();
    Some(rewritten)
}

/// Callees whose type is known and not a block are left alone, and so are
/// member callees naming a method: the resolver types those as closures but
/// they can never be nil.
fn may_be_block(callee: &Expression, type_system: &dyn TypeSystem) -> bool {
    if names_method(callee, type_system) {
        return false;
    }
    match &callee.resolved_type {
        Some(ty) if !ty.is_unknown() => ty.deep_unwrapped().is_block(),
        _ => !callee.is_postfix() || callee.as_postfix().is_some_and(|(_, op)| op.as_member().is_some()),
    }
}

fn names_method(callee: &Expression, type_system: &dyn TypeSystem) -> bool {
    let Some((target, op)) = callee.as_postfix() else {
        return false;
    };
    let (Some(member), Some(target_type)) = (op.as_member(), target.resolved_type.as_ref()) else {
        return false;
    };
    if target_type.is_unknown() {
        return false;
    }
    matches!(
        type_system.lookup_member(target_type, member, false),
        Some(KnownMember::Method(_))
    )
}
