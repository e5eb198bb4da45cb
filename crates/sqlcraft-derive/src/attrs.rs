//! Attribute parsing for the Entity derive macro.
//!
//! Handles struct-level and field-level `#[entity(...)]` attributes.

use syn::{Attribute, Result};

/// Struct-level `#[entity(table = "...", naming = "...")]`.
#[derive(Default)]
pub(crate) struct StructAttr {
    pub table: Option<String>,
    pub naming: Option<syn::LitStr>,
}

impl syn::parse::Parse for StructAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = StructAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            let _: syn::Token![=] = input.parse()?;
            let value: syn::LitStr = input.parse()?;

            if ident == "table" {
                attr.table = Some(value.value());
            } else if ident == "naming" {
                attr.naming = Some(value);
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unknown entity attribute `{ident}`"),
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// Field-level `#[entity(id, version, skip, column = "...")]`.
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub is_id: bool,
    pub is_version: bool,
    pub skip: bool,
    pub column: Option<String>,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "id" {
                attr.is_id = true;
            } else if ident == "version" {
                attr.is_version = true;
            } else if ident == "skip" {
                attr.skip = true;
            } else if ident == "column" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.column = Some(value.value());
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unknown entity field attribute `{ident}`"),
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// Merge every `#[entity(...)]` attribute on a struct.
pub(crate) fn struct_attr(attrs: &[Attribute]) -> Result<StructAttr> {
    let mut merged = StructAttr::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("entity")) {
        let parsed: StructAttr = attr.parse_args()?;
        if parsed.table.is_some() {
            merged.table = parsed.table;
        }
        if parsed.naming.is_some() {
            merged.naming = parsed.naming;
        }
    }
    Ok(merged)
}

/// Merge every `#[entity(...)]` attribute on a field.
pub(crate) fn field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("entity")) {
        let parsed: FieldAttr = attr.parse_args()?;
        merged.is_id |= parsed.is_id;
        merged.is_version |= parsed.is_version;
        merged.skip |= parsed.skip;
        if parsed.column.is_some() {
            merged.column = parsed.column;
        }
    }
    Ok(merged)
}
