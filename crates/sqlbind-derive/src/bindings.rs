//! Bindings derive macro implementation.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

use crate::sql_ident::parse_sql_ident;
use crate::syn_types::{classify, FieldKind};

/// Per-field `#[bind(...)]` attributes.
struct FieldAttrs {
    skip: bool,
    exclude_on_insert: bool,
    column: Option<String>,
}

impl syn::parse::Parse for FieldAttrs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attrs = FieldAttrs {
            skip: false,
            exclude_on_insert: false,
            column: None,
        };

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            let key = ident.to_string();

            match key.as_str() {
                "skip" => attrs.skip = true,
                "exclude_on_insert" => attrs.exclude_on_insert = true,
                "column" => {
                    let _: syn::Token![=] = input.parse()?;
                    let value: syn::LitStr = input.parse()?;
                    attrs.column = Some(parse_sql_ident(&value.value(), value.span(), "column")?);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown bind attribute '{other}'"),
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attrs)
    }
}

fn get_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut merged = FieldAttrs {
        skip: false,
        exclude_on_insert: false,
        column: None,
    };

    for attr in &field.attrs {
        if !attr.path().is_ident("bind") {
            continue;
        }
        if let syn::Meta::List(meta_list) = &attr.meta {
            let parsed = syn::parse2::<FieldAttrs>(meta_list.tokens.clone())?;
            merged.skip |= parsed.skip;
            merged.exclude_on_insert |= parsed.exclude_on_insert;
            if parsed.column.is_some() {
                merged.column = parsed.column;
            }
        }
    }

    Ok(merged)
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                // A unit struct carries no bindings; still a valid impl.
                return Ok(quote! {
                    impl #impl_generics sqlbind::Bindings for #name #ty_generics #where_clause {
                        fn bindings(&self) -> ::std::vec::Vec<sqlbind::FieldBinding> {
                            ::std::vec::Vec::new()
                        }
                    }
                });
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Bindings can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Bindings can only be derived for structs",
            ));
        }
    };

    let mut seen = HashSet::<String>::new();
    let mut entries: Vec<TokenStream> = Vec::new();

    for field in fields {
        let attrs = get_field_attrs(field)?;
        if attrs.skip {
            continue;
        }

        let ident = field.ident.as_ref().expect("named field");
        let column = match attrs.column {
            Some(column) => column,
            None => parse_sql_ident(&ident.to_string(), ident.span(), "field name")?,
        };
        if !seen.insert(column.clone()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate column '{column}' in bindings"),
            ));
        }

        let value = match classify(&field.ty) {
            FieldKind::Scalar => quote! {
                sqlbind::FieldValue::one(self.#ident.clone())
            },
            FieldKind::List => quote! {
                sqlbind::FieldValue::many(self.#ident.clone())
            },
            FieldKind::OptionScalar => quote! {
                sqlbind::FieldValue::from_option(&self.#ident)
            },
            FieldKind::OptionList => quote! {
                sqlbind::FieldValue::from_option_list(&self.#ident)
            },
            FieldKind::NestedOption => quote! {
                sqlbind::FieldValue::from_nested_option(&self.#ident)
            },
            FieldKind::Nullable => quote! {
                sqlbind::FieldValue::from_nullable(&self.#ident)
            },
        };

        let entry = if attrs.exclude_on_insert {
            quote! {
                sqlbind::FieldBinding::new(#column, #value).exclude_on_insert()
            }
        } else {
            quote! {
                sqlbind::FieldBinding::new(#column, #value)
            }
        };
        entries.push(entry);
    }

    Ok(quote! {
        impl #impl_generics sqlbind::Bindings for #name #ty_generics #where_clause {
            fn bindings(&self) -> ::std::vec::Vec<sqlbind::FieldBinding> {
                ::std::vec![
                    #(#entries),*
                ]
            }
        }
    })
}
