//! Renders indexed items back to Rust declaration snippets.
//!
//! Every item page shows the item's declaration with implementations
//! omitted: signatures, fields, variants and bounds, but no bodies. The
//! snippets are built from the rustdoc JSON item graph and later normalized
//! through rustfmt.

use rustdoc_types::{
    Abi, AssocItemConstraint, AssocItemConstraintKind, Crate, FunctionHeader, FunctionPointer,
    FunctionSignature, GenericArg, GenericArgs, GenericBound, GenericParamDef,
    GenericParamDefKind, Generics, Id, Item, ItemEnum, Path, PolyTrait, StructKind, Term,
    TraitBoundModifier, Type, VariantKind, Visibility, WherePredicate,
};

use crate::keywords::is_reserved_word;

/// Leading visibility qualifier for an item.
pub(crate) fn vis(item: &Item) -> &'static str {
    match &item.visibility {
        Visibility::Public => "pub ",
        _ => "",
    }
}

/// Item name with raw-identifier escaping applied.
pub(crate) fn name(item: &Item) -> String {
    item.name.as_deref().map_or_else(
        || "?".to_string(),
        |n| {
            if is_reserved_word(n) {
                format!("r#{n}")
            } else {
                n.to_string()
            }
        },
    )
}

/// Build the declaration snippet for an item, if the item kind has one.
pub(crate) fn declaration(item: &Item, krate: &Crate) -> Option<String> {
    match &item.inner {
        ItemEnum::Struct(_) => Some(struct_decl(item, krate)),
        ItemEnum::Enum(_) => Some(enum_decl(item, krate)),
        ItemEnum::Trait(_) => Some(trait_decl(item, krate)),
        ItemEnum::Function(_) => Some(function_decl(item)),
        ItemEnum::Constant { .. } => Some(constant_decl(item)),
        ItemEnum::Static(_) => Some(static_decl(item)),
        ItemEnum::TypeAlias(_) => Some(type_alias_decl(item)),
        ItemEnum::Macro(source) => Some(source.clone()),
        _ => None,
    }
}

fn struct_decl(item: &Item, krate: &Crate) -> String {
    let ItemEnum::Struct(struct_) = &item.inner else {
        return String::new();
    };
    let generics = generics_string(&struct_.generics);
    let where_clause = where_string(&struct_.generics);

    match &struct_.kind {
        StructKind::Unit => format!("{}struct {}{generics}{where_clause};", vis(item), name(item)),
        StructKind::Tuple(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|field| match field {
                    Some(id) => tuple_field(id, krate),
                    // Private tuple fields are stripped from the JSON but
                    // keep their position.
                    None => "_".to_string(),
                })
                .collect();
            format!(
                "{}struct {}{generics}({}){where_clause};",
                vis(item),
                name(item),
                fields.join(", ")
            )
        }
        StructKind::Plain { fields, has_stripped_fields } => {
            let mut out = format!(
                "{}struct {}{generics}{where_clause} {{\n",
                vis(item),
                name(item)
            );
            for field in fields {
                out.push_str(&named_field(field, krate));
            }
            if *has_stripped_fields {
                out.push_str("    // some fields omitted\n");
            }
            out.push('}');
            out
        }
    }
}

fn tuple_field(id: &Id, krate: &Crate) -> String {
    match krate.index.get(id) {
        Some(field) => {
            if let ItemEnum::StructField(ty) = &field.inner {
                format!("{}{}", vis(field), type_string(ty))
            } else {
                "_".to_string()
            }
        }
        None => "_".to_string(),
    }
}

fn named_field(id: &Id, krate: &Crate) -> String {
    match krate.index.get(id) {
        Some(field) => {
            if let ItemEnum::StructField(ty) = &field.inner {
                format!("    {}{}: {},\n", vis(field), name(field), type_string(ty))
            } else {
                String::new()
            }
        }
        None => String::new(),
    }
}

fn enum_decl(item: &Item, krate: &Crate) -> String {
    let ItemEnum::Enum(enum_) = &item.inner else {
        return String::new();
    };
    let generics = generics_string(&enum_.generics);
    let where_clause = where_string(&enum_.generics);

    let mut out = format!(
        "{}enum {}{generics}{where_clause} {{\n",
        vis(item),
        name(item)
    );
    for variant_id in &enum_.variants {
        if let Some(variant) = krate.index.get(variant_id) {
            out.push_str(&variant_decl(variant, krate));
        }
    }
    if enum_.has_stripped_variants {
        out.push_str("    // some variants omitted\n");
    }
    out.push('}');
    out
}

fn variant_decl(variant: &Item, krate: &Crate) -> String {
    let ItemEnum::Variant(inner) = &variant.inner else {
        return String::new();
    };

    let fields = match &inner.kind {
        VariantKind::Plain => String::new(),
        VariantKind::Tuple(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|field| match field {
                    Some(id) => tuple_field(id, krate),
                    None => "_".to_string(),
                })
                .collect();
            format!("({})", fields.join(", "))
        }
        VariantKind::Struct { fields, .. } => {
            let fields: Vec<String> = fields
                .iter()
                .filter_map(|id| {
                    let field = krate.index.get(id)?;
                    if let ItemEnum::StructField(ty) = &field.inner {
                        Some(format!("{}: {}", name(field), type_string(ty)))
                    } else {
                        None
                    }
                })
                .collect();
            format!(" {{ {} }}", fields.join(", "))
        }
    };

    let discriminant = inner
        .discriminant
        .as_ref()
        .map(|d| format!(" = {}", d.expr))
        .unwrap_or_default();

    format!("    {}{fields}{discriminant},\n", name(variant))
}

fn trait_decl(item: &Item, krate: &Crate) -> String {
    let ItemEnum::Trait(trait_) = &item.inner else {
        return String::new();
    };

    let unsafety = if trait_.is_unsafe { "unsafe " } else { "" };
    let auto = if trait_.is_auto { "auto " } else { "" };
    let generics = generics_string(&trait_.generics);
    let bounds = if trait_.bounds.is_empty() {
        String::new()
    } else {
        format!(": {}", bounds_string(&trait_.bounds))
    };
    let where_clause = where_string(&trait_.generics);

    let mut out = format!(
        "{}{unsafety}{auto}trait {}{generics}{bounds}{where_clause} {{\n",
        vis(item),
        name(item)
    );
    for assoc_id in &trait_.items {
        if let Some(assoc) = krate.index.get(assoc_id) {
            out.push_str(&assoc_item_decl(assoc));
        }
    }
    out.push('}');
    out
}

fn assoc_item_decl(item: &Item) -> String {
    match &item.inner {
        ItemEnum::Function(function) => {
            format!("    {};\n", function_signature(item, &function.sig, &function.generics, &function.header))
        }
        ItemEnum::AssocConst { type_, value } => {
            let default = value
                .as_ref()
                .map(|v| format!(" = {v}"))
                .unwrap_or_default();
            format!("    const {}: {}{default};\n", name(item), type_string(type_))
        }
        ItemEnum::AssocType { bounds, type_, .. } => {
            let bounds = if bounds.is_empty() {
                String::new()
            } else {
                format!(": {}", bounds_string(bounds))
            };
            let default = type_
                .as_ref()
                .map(|ty| format!(" = {}", type_string(ty)))
                .unwrap_or_default();
            format!("    type {}{bounds}{default};\n", name(item))
        }
        _ => String::new(),
    }
}

fn function_decl(item: &Item) -> String {
    let ItemEnum::Function(function) = &item.inner else {
        return String::new();
    };
    function_signature(item, &function.sig, &function.generics, &function.header)
}

fn function_signature(
    item: &Item,
    sig: &FunctionSignature,
    generics: &Generics,
    header: &FunctionHeader,
) -> String {
    let mut out = String::from(vis(item));
    if header.is_const {
        out.push_str("const ");
    }
    if header.is_async {
        out.push_str("async ");
    }
    if header.is_unsafe {
        out.push_str("unsafe ");
    }
    if let Abi::C { .. } = header.abi {
        out.push_str("extern \"C\" ");
    }

    out.push_str(&format!(
        "fn {}{}({}){}{}",
        name(item),
        generics_string(generics),
        args_string(sig),
        return_string(sig),
        where_string(generics)
    ));
    out
}

fn constant_decl(item: &Item) -> String {
    let ItemEnum::Constant { type_, const_ } = &item.inner else {
        return String::new();
    };
    format!(
        "{}const {}: {} = {};",
        vis(item),
        name(item),
        type_string(type_),
        const_.expr
    )
}

fn static_decl(item: &Item) -> String {
    let ItemEnum::Static(static_) = &item.inner else {
        return String::new();
    };
    let mutability = if static_.is_mutable { "mut " } else { "" };
    let expr = if static_.expr.is_empty() {
        "_"
    } else {
        static_.expr.as_str()
    };
    format!(
        "{}static {mutability}{}: {} = {expr};",
        vis(item),
        name(item),
        type_string(&static_.type_)
    )
}

fn type_alias_decl(item: &Item) -> String {
    let ItemEnum::TypeAlias(alias) = &item.inner else {
        return String::new();
    };
    format!(
        "{}type {}{}{} = {};",
        vis(item),
        name(item),
        generics_string(&alias.generics),
        where_string(&alias.generics),
        type_string(&alias.type_)
    )
}

/// Angle-bracketed generic parameter list, or empty.
pub(crate) fn generics_string(generics: &Generics) -> String {
    let params: Vec<String> = generics.params.iter().filter_map(param_string).collect();
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}

fn param_string(param: &GenericParamDef) -> Option<String> {
    match &param.kind {
        GenericParamDefKind::Lifetime { outlives } => {
            if outlives.is_empty() {
                Some(param.name.clone())
            } else {
                Some(format!("{}: {}", param.name, outlives.join(" + ")))
            }
        }
        GenericParamDefKind::Type {
            bounds,
            default,
            is_synthetic,
        } => {
            if *is_synthetic {
                return None;
            }
            let bounds = if bounds.is_empty() {
                String::new()
            } else {
                format!(": {}", bounds_string(bounds))
            };
            let default = default
                .as_ref()
                .map(|ty| format!(" = {}", type_string(ty)))
                .unwrap_or_default();
            Some(format!("{}{bounds}{default}", param.name))
        }
        GenericParamDefKind::Const { type_, default } => {
            let default = default
                .as_ref()
                .map(|expr| format!(" = {expr}"))
                .unwrap_or_default();
            Some(format!(
                "const {}: {}{default}",
                param.name,
                type_string(type_)
            ))
        }
    }
}

/// Trailing where clause, or empty.
pub(crate) fn where_string(generics: &Generics) -> String {
    let predicates: Vec<String> = generics
        .where_predicates
        .iter()
        .filter_map(predicate_string)
        .collect();
    if predicates.is_empty() {
        String::new()
    } else {
        format!(" where {}", predicates.join(", "))
    }
}

fn predicate_string(pred: &WherePredicate) -> Option<String> {
    match pred {
        WherePredicate::BoundPredicate {
            type_,
            bounds,
            generic_params,
        } => {
            // Synthetic impl-Trait parameters surface as where predicates;
            // they are already shown inline in the signature.
            if matches!(type_, Type::Generic(_))
                && generic_params.iter().any(|param| {
                    matches!(&param.kind, GenericParamDefKind::Type { is_synthetic, .. } if *is_synthetic)
                })
            {
                return None;
            }

            let hrtb = if generic_params.is_empty() {
                String::new()
            } else {
                let params: Vec<String> =
                    generic_params.iter().filter_map(param_string).collect();
                if params.is_empty() {
                    String::new()
                } else {
                    format!("for<{}> ", params.join(", "))
                }
            };

            Some(format!(
                "{hrtb}{}: {}",
                type_string(type_),
                bounds_string(bounds)
            ))
        }
        WherePredicate::LifetimePredicate { lifetime, outlives } => {
            if outlives.is_empty() {
                Some(lifetime.clone())
            } else {
                Some(format!("{lifetime}: {}", outlives.join(" + ")))
            }
        }
        WherePredicate::EqPredicate { lhs, rhs } => {
            Some(format!("{} = {}", type_string(lhs), term_string(rhs)))
        }
    }
}

/// A `+`-joined bound list.
pub(crate) fn bounds_string(bounds: &[GenericBound]) -> String {
    bounds
        .iter()
        .map(bound_string)
        .collect::<Vec<_>>()
        .join(" + ")
}

pub(crate) fn bound_string(bound: &GenericBound) -> String {
    match bound {
        GenericBound::TraitBound {
            trait_,
            generic_params,
            modifier,
        } => {
            let poly_trait = PolyTrait {
                trait_: trait_.clone(),
                generic_params: generic_params.clone(),
            };
            match modifier {
                TraitBoundModifier::None => poly_trait_string(&poly_trait),
                TraitBoundModifier::Maybe => format!("?{}", poly_trait_string(&poly_trait)),
                TraitBoundModifier::MaybeConst => {
                    format!("~const {}", poly_trait_string(&poly_trait))
                }
            }
        }
        GenericBound::Outlives(lifetime) => lifetime.clone(),
        // Precise capturing is not stabilized in rustdoc JSON yet.
        GenericBound::Use(_) => "use<...>".to_string(),
    }
}

fn poly_trait_string(poly_trait: &PolyTrait) -> String {
    let binder = if poly_trait.generic_params.is_empty() {
        String::new()
    } else {
        let params: Vec<String> = poly_trait
            .generic_params
            .iter()
            .filter_map(param_string)
            .collect();
        if params.is_empty() {
            String::new()
        } else {
            format!("for<{}> ", params.join(", "))
        }
    };
    format!("{binder}{}", path_string(&poly_trait.trait_))
}

pub(crate) fn path_string(path: &Path) -> String {
    let args = path
        .args
        .as_ref()
        .map(|args| generic_args_string(args))
        .unwrap_or_default();
    format!("{}{args}", path.path.replace("$crate::", ""))
}

fn generic_args_string(args: &GenericArgs) -> String {
    match args {
        GenericArgs::AngleBracketed { args, constraints } => {
            if args.is_empty() && constraints.is_empty() {
                return String::new();
            }
            let mut parts: Vec<String> = args.iter().map(generic_arg_string).collect();
            parts.extend(constraints.iter().map(constraint_string));
            format!("<{}>", parts.join(", "))
        }
        GenericArgs::Parenthesized { inputs, output } => {
            let inputs = inputs
                .iter()
                .map(type_string)
                .collect::<Vec<_>>()
                .join(", ");
            let output = output
                .as_ref()
                .map(|ty| format!(" -> {}", type_string(ty)))
                .unwrap_or_default();
            format!("({inputs}){output}")
        }
        GenericArgs::ReturnTypeNotation => String::new(),
    }
}

fn generic_arg_string(arg: &GenericArg) -> String {
    match arg {
        GenericArg::Lifetime(lifetime) => lifetime.clone(),
        GenericArg::Type(ty) => type_string(ty),
        GenericArg::Const(constant) => constant.expr.clone(),
        GenericArg::Infer => "_".to_string(),
    }
}

fn constraint_string(constraint: &AssocItemConstraint) -> String {
    match &constraint.binding {
        AssocItemConstraintKind::Equality(term) => {
            format!("{} = {}", constraint.name, term_string(term))
        }
        AssocItemConstraintKind::Constraint(bounds) => {
            format!("{}: {}", constraint.name, bounds_string(bounds))
        }
    }
}

fn term_string(term: &Term) -> String {
    match term {
        Term::Type(ty) => type_string(ty),
        Term::Constant(constant) => constant.expr.clone(),
    }
}

/// Render a type reference.
pub(crate) fn type_string(ty: &Type) -> String {
    type_string_inner(ty, false)
}

fn type_string_inner(ty: &Type, nested: bool) -> String {
    match ty {
        Type::ResolvedPath(path) => path_string(path),
        Type::DynTrait(dyn_trait) => {
            let traits = dyn_trait
                .traits
                .iter()
                .map(poly_trait_string)
                .collect::<Vec<_>>()
                .join(" + ");
            let lifetime = dyn_trait
                .lifetime
                .as_ref()
                .map(|lt| format!(" + {lt}"))
                .unwrap_or_default();
            let rendered = format!("dyn {traits}{lifetime}");
            // Compound dyn types need parentheses when they appear inside
            // another type.
            if nested && (dyn_trait.lifetime.is_some() || dyn_trait.traits.len() > 1) {
                format!("({rendered})")
            } else {
                rendered
            }
        }
        Type::Generic(name) => name.clone(),
        Type::Primitive(name) => name.clone(),
        Type::FunctionPointer(pointer) => function_pointer_string(pointer),
        Type::Tuple(types) => {
            let inner = types
                .iter()
                .map(|ty| type_string_inner(ty, true))
                .collect::<Vec<_>>()
                .join(", ");
            format!("({inner})")
        }
        Type::Slice(ty) => format!("[{}]", type_string_inner(ty, true)),
        Type::Array { type_, len } => format!("[{}; {len}]", type_string_inner(type_, true)),
        Type::ImplTrait(bounds) => format!("impl {}", bounds_string(bounds)),
        Type::Infer => "_".to_string(),
        Type::RawPointer { is_mutable, type_ } => {
            let mutability = if *is_mutable { "mut" } else { "const" };
            format!("*{mutability} {}", type_string_inner(type_, true))
        }
        Type::BorrowedRef {
            lifetime,
            is_mutable,
            type_,
        } => {
            let lifetime = lifetime
                .as_ref()
                .map(|lt| format!("{lt} "))
                .unwrap_or_default();
            let mutability = if *is_mutable { "mut " } else { "" };
            format!("&{lifetime}{mutability}{}", type_string_inner(type_, true))
        }
        Type::QualifiedPath {
            name,
            args,
            self_type,
            trait_,
        } => {
            let self_type = type_string_inner(self_type, true);
            let args = args
                .as_ref()
                .map(|args| generic_args_string(args))
                .unwrap_or_default();
            match trait_ {
                Some(trait_) if !trait_.path.is_empty() => {
                    format!("<{self_type} as {}>::{name}{args}", path_string(trait_))
                }
                _ => format!("{self_type}::{name}{args}"),
            }
        }
        Type::Pat { .. } => "/* pattern */".to_string(),
    }
}

fn function_pointer_string(pointer: &FunctionPointer) -> String {
    let args = args_string(&pointer.sig);
    format!("fn({args}){}", return_string(&pointer.sig))
}

fn args_string(sig: &FunctionSignature) -> String {
    sig.inputs
        .iter()
        .map(|(name, ty)| {
            if name == "self" {
                self_arg_string(ty)
            } else {
                format!("{name}: {}", type_string(ty))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn self_arg_string(ty: &Type) -> String {
    match ty {
        Type::BorrowedRef { is_mutable, .. } => {
            if *is_mutable {
                "&mut self".to_string()
            } else {
                "&self".to_string()
            }
        }
        Type::ResolvedPath(path) if path.path == "Self" && path.args.is_none() => {
            "self".to_string()
        }
        Type::Generic(name) if name == "Self" => "self".to_string(),
        _ => format!("self: {}", type_string(ty)),
    }
}

fn return_string(sig: &FunctionSignature) -> String {
    match &sig.output {
        Some(ty) => format!(" -> {}", type_string(ty)),
        None => String::new(),
    }
}
