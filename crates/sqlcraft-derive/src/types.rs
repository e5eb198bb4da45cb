//! Type helper utilities for syn type analysis.

/// Whether `ty` is `Option<T>` (also `std::option::Option<T>` / `core::option::Option<T>`).
pub(crate) fn is_option(ty: &syn::Type) -> bool {
    let syn::Type::Path(type_path) = ty else {
        return false;
    };
    let Some(seg) = type_path.path.segments.last() else {
        return false;
    };
    if seg.ident != "Option" {
        return false;
    }
    matches!(&seg.arguments, syn::PathArguments::AngleBracketed(args) if args.args.len() == 1)
}

/// Compact textual form of a type, e.g. `Option<String>`.
pub(crate) fn type_name(ty: &syn::Type) -> String {
    quote::quote!(#ty).to_string().replace(' ', "")
}

/// Map a `naming = "..."` value to the `NamingStrategy` variant name.
pub(crate) fn naming_variant(value: &str) -> Option<&'static str> {
    Some(match value {
        "normal" => "Normal",
        "lower" => "Lower",
        "upper" => "Upper",
        "lower_camel" => "LowerCamel",
        "upper_camel" => "UpperCamel",
        "lower_underscore" => "LowerUnderscore",
        "upper_underscore" => "UpperUnderscore",
        _ => return None,
    })
}
