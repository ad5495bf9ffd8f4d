// o2s_cli/pipeline/signature - Swift signatures for Objective-C selectors
use o2s_ast::SwiftType;
use o2s_intentions::{FunctionSignature, ParameterSignature};
use o2s_objc::{FunctionParameter, KeywordDeclarator, MethodDefinition, MethodSelector, ObjcType};
use o2s_typesystem::{TypeMapper, TypeMappingContext};

/// Builds Swift signatures from method and function declarations.
///
/// - `- (R)name` is `name() -> R`
/// - `- (void)insert:(T)x atIndex:(U)i` is `insert(_ x: T, atIndex i: U)`
/// - `- (id)initWithFrame:(CGRect)frame` is `init(frame: CGRect)`
/// - `+` methods are static
pub struct SignatureGenerator<'a> {
    mapper: &'a TypeMapper,
    in_nonnull_region: bool,
    /// Type `instancetype` stands for, when known.
    owner_type: Option<&'a str>,
}

impl<'a> SignatureGenerator<'a> {
    pub fn new(mapper: &'a TypeMapper, in_nonnull_region: bool) -> Self {
        Self {
            mapper,
            in_nonnull_region,
            owner_type: None,
        }
    }

    pub fn with_owner_type(mut self, owner_type: Option<&'a str>) -> Self {
        self.owner_type = owner_type;
        self
    }

    pub fn method_signature(&self, method: &MethodDefinition) -> FunctionSignature {
        let return_type = self.map_return_type(&method.return_type);
        let is_static = method.is_class_method;

        match &method.selector {
            MethodSelector::Simple(name) => {
                let name = if is_initializer_keyword(name) { "init" } else { name.as_str() };
                FunctionSignature::new(name, Vec::new(), return_type, is_static)
            }
            MethodSelector::Keywords(keywords) => {
                let first_keyword = keywords
                    .first()
                    .and_then(|part| part.keyword.as_deref())
                    .unwrap_or("");
                let (name, first_label) = if is_initializer_keyword(first_keyword) {
                    ("init".to_string(), initializer_label(first_keyword))
                } else {
                    (first_keyword.to_string(), None)
                };
                let parameters = keywords
                    .iter()
                    .enumerate()
                    .map(|(index, part)| {
                        let label = if index == 0 {
                            first_label.clone()
                        } else {
                            keyword_label(part)
                        };
                        ParameterSignature::new(label.as_deref(), part.name.clone(), self.map(&part.ty))
                    })
                    .collect();
                FunctionSignature::new(name, parameters, return_type, is_static)
            }
        }
    }

    /// C functions keep positional parameters: every label is `_`.
    pub fn function_signature(
        &self,
        name: &str,
        return_type: &ObjcType,
        parameters: &[FunctionParameter],
    ) -> FunctionSignature {
        let parameters = parameters
            .iter()
            .filter(|parameter| !matches!(parameter.ty.base(), ObjcType::Void))
            .map(|parameter| ParameterSignature::unlabeled(parameter.name.clone(), self.map(&parameter.ty)))
            .collect();
        FunctionSignature::new(name, parameters, self.map(return_type), false)
    }

    fn map(&self, ty: &ObjcType) -> SwiftType {
        self.mapper.swift_type(
            ty,
            &TypeMappingContext::empty().in_nonnull_region(self.in_nonnull_region),
        )
    }

    fn map_return_type(&self, ty: &ObjcType) -> SwiftType {
        let mapped = self.map(ty);
        match (ty.base(), self.owner_type) {
            (ObjcType::Struct(name), Some(owner)) if name == "instancetype" => {
                SwiftType::named(owner).with_same_optionality_as(&mapped)
            }
            _ => mapped,
        }
    }
}

/// `init` or `initWith<Name>`; `initialize` and friends are plain methods.
fn is_initializer_keyword(keyword: &str) -> bool {
    keyword == "init"
        || keyword
            .strip_prefix("initWith")
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn initializer_label(keyword: &str) -> Option<String> {
    keyword
        .strip_prefix("initWith")
        .filter(|rest| !rest.is_empty())
        .map(lower_first)
}

fn keyword_label(part: &KeywordDeclarator) -> Option<String> {
    part.keyword
        .as_deref()
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
