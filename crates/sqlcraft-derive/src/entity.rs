//! Entity derive macro implementation

use crate::attrs::{field_attr, struct_attr};
use crate::types::{is_option, naming_variant, type_name};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let entity_name = name.unraw().to_string();
    let attr = struct_attr(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let table = attr.table.as_ref().map(|table| quote! { .table(#table) });
    let naming = match &attr.naming {
        Some(lit) => {
            let variant = naming_variant(&lit.value()).ok_or_else(|| {
                syn::Error::new_spanned(
                    lit,
                    "naming must be one of: normal, lower, upper, lower_camel, upper_camel, \
                     lower_underscore, upper_underscore",
                )
            })?;
            let variant = syn::Ident::new(variant, Span::call_site());
            Some(quote! { .naming(::sqlcraft::NamingStrategy::#variant) })
        }
        None => None,
    };

    let mut columns = Vec::with_capacity(fields.len());
    let mut version_fields = 0usize;
    for field in fields.iter() {
        let field_attr = field_attr(field)?;
        if field_attr.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let property = ident.unraw().to_string();
        let ty = type_name(&field.ty);

        let mut def = quote! { ::sqlcraft::ColumnDef::new(#property, #ty) };
        if field_attr.is_id {
            def = quote! { #def.id() };
        }
        if field_attr.is_version {
            version_fields += 1;
            if version_fields > 1 {
                return Err(syn::Error::new_spanned(
                    field,
                    "Entity allows at most one #[entity(version)] field",
                ));
            }
            def = quote! { #def.version() };
        }
        if is_option(&field.ty) {
            def = quote! { #def.nullable() };
        }
        if let Some(column) = &field_attr.column {
            def = quote! { #def.rename(#column) };
        }
        columns.push(quote! { .column(#def) });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::sqlcraft::Entity for #name #ty_generics #where_clause {
            fn entity_name() -> &'static str {
                #entity_name
            }

            fn table_info() -> ::sqlcraft::CraftResult<::sqlcraft::TableInfo> {
                ::sqlcraft::TableInfo::builder(#entity_name)
                    #table
                    #naming
                    #(#columns)*
                    .build()
            }
        }
    })
}
