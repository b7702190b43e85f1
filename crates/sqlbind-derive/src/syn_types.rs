//! Type helper utilities for syn type analysis.

/// Extract the inner type T from a single-argument generic path type whose
/// last segment is `ident`.
fn generic_inner<'a>(ty: &'a syn::Type, ident: &str) -> Option<&'a syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != ident {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    let syn::GenericArgument::Type(inner) = args.args.first()? else {
        return None;
    };
    Some(inner)
}

/// Extract the inner type T from Option<T>, or return None if not an Option.
///
/// Recognizes `Option<T>`, `std::option::Option<T>`, and
/// `core::option::Option<T>`.
pub fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    generic_inner(ty, "Option")
}

/// Extract the inner type T from Vec<T>, or return None if not a Vec.
pub fn vec_inner(ty: &syn::Type) -> Option<&syn::Type> {
    generic_inner(ty, "Vec")
}

/// Extract the inner type T from Nullable<T>, or return None if not a
/// Nullable. Recognizes `Nullable<T>` and `sqlbind::Nullable<T>`.
pub fn nullable_inner(ty: &syn::Type) -> Option<&syn::Type> {
    generic_inner(ty, "Nullable")
}

/// How a field's value participates in bindings, decided from its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `T`: always bound
    Scalar,
    /// `Vec<T>`: always bound as a list
    List,
    /// `Option<T>`: bound when Some
    OptionScalar,
    /// `Option<Vec<T>>`: bound as a list when Some
    OptionList,
    /// `Option<Option<T>>`: tri-state, inner None binds SQL NULL
    NestedOption,
    /// `Nullable<T>`: tri-state
    Nullable,
}

fn is_u8(ty: &syn::Type) -> bool {
    matches!(ty, syn::Type::Path(p) if p.path.is_ident("u8"))
}

pub fn classify(ty: &syn::Type) -> FieldKind {
    if nullable_inner(ty).is_some() {
        return FieldKind::Nullable;
    }
    if let Some(inner) = option_inner(ty) {
        if option_inner(inner).is_some() {
            return FieldKind::NestedOption;
        }
        // Vec<u8> is bytea, a scalar, not a list of values
        if vec_inner(inner).is_some_and(|t| !is_u8(t)) {
            return FieldKind::OptionList;
        }
        return FieldKind::OptionScalar;
    }
    if vec_inner(ty).is_some_and(|t| !is_u8(t)) {
        return FieldKind::List;
    }
    FieldKind::Scalar
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn classifies_field_types() {
        let ty: syn::Type = parse_quote!(String);
        assert_eq!(classify(&ty), FieldKind::Scalar);

        let ty: syn::Type = parse_quote!(Vec<i32>);
        assert_eq!(classify(&ty), FieldKind::List);

        let ty: syn::Type = parse_quote!(Option<String>);
        assert_eq!(classify(&ty), FieldKind::OptionScalar);

        let ty: syn::Type = parse_quote!(Option<Vec<String>>);
        assert_eq!(classify(&ty), FieldKind::OptionList);

        let ty: syn::Type = parse_quote!(Option<Option<uuid::Uuid>>);
        assert_eq!(classify(&ty), FieldKind::NestedOption);

        let ty: syn::Type = parse_quote!(Nullable<String>);
        assert_eq!(classify(&ty), FieldKind::Nullable);

        let ty: syn::Type = parse_quote!(sqlbind::Nullable<String>);
        assert_eq!(classify(&ty), FieldKind::Nullable);
    }

    #[test]
    fn bytea_is_a_scalar() {
        let ty: syn::Type = parse_quote!(Vec<u8>);
        assert_eq!(classify(&ty), FieldKind::Scalar);

        let ty: syn::Type = parse_quote!(Option<Vec<u8>>);
        assert_eq!(classify(&ty), FieldKind::OptionScalar);
    }

    #[test]
    fn qualified_paths_are_recognized() {
        let ty: syn::Type = parse_quote!(std::option::Option<i32>);
        assert_eq!(classify(&ty), FieldKind::OptionScalar);

        let ty: syn::Type = parse_quote!(std::vec::Vec<i32>);
        assert_eq!(classify(&ty), FieldKind::List);
    }
}
